//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.querygate.toml` in current directory
//! 4. `~/.config/querygate/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! log_level = "warn"
//!
//! [check]
//! baseline = ".querygate.json"
//! tolerance = 0
//!
//! [analyze]
//! threshold = 2
//! preview_len = 80
//!
//! [output]
//! color = true
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `QUERYGATE_BASELINE` | Baseline snapshot path |
//! | `QUERYGATE_TOLERANCE` | Allowed slack above the baseline |
//! | `QUERYGATE_THRESHOLD` | N+1 repetition threshold |
//! | `QUERYGATE_LOG` | Log filter (`debug`, `querygate=trace`, ...) |
//! | `NO_COLOR` | Disable colored output when set |

use std::{env, fs, path::PathBuf, str::FromStr};

use serde::Deserialize;

use crate::{
    baseline::DEFAULT_BASELINE_PATH,
    error::{AppResult, config_error},
    nplus1::DEFAULT_THRESHOLD
};

/// Default number of characters shown from an example query.
pub const DEFAULT_PREVIEW_LEN: usize = 80;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub check:     CheckConfig,
    #[serde(default)]
    pub analyze:   AnalyzeConfig,
    #[serde(default)]
    pub output:    OutputConfig
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            check:     CheckConfig::default(),
            analyze:   AnalyzeConfig::default(),
            output:    OutputConfig::default()
        }
    }
}

fn default_log_level() -> String {
    String::from("warn")
}

/// Settings for the `check` and `baseline` commands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub baseline:  PathBuf,
    pub tolerance: u64
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            baseline:  PathBuf::from(DEFAULT_BASELINE_PATH),
            tolerance: 0
        }
    }
}

/// Settings for the `analyze` command
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub threshold:   usize,
    pub preview_len: usize
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            threshold:   DEFAULT_THRESHOLD,
            preview_len: DEFAULT_PREVIEW_LEN
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub color: bool
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.querygate.toml)
    /// 3. Config file in home directory (~/.config/querygate/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("querygate")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".querygate.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &std::path::Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override settings from environment variables
    ///
    /// `lookup` returns the value of a variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>
    {
        if let Some(path) = lookup("QUERYGATE_BASELINE") {
            self.check.baseline = PathBuf::from(path);
        }

        if let Some(raw) = lookup("QUERYGATE_TOLERANCE") {
            self.check.tolerance = parse_env("QUERYGATE_TOLERANCE", &raw)?;
        }

        if let Some(raw) = lookup("QUERYGATE_THRESHOLD") {
            self.analyze.threshold = parse_env("QUERYGATE_THRESHOLD", &raw)?;
        }

        if let Some(level) = lookup("QUERYGATE_LOG") {
            self.log_level = level;
        }

        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            self.output.color = false;
        }

        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim().parse().map_err(|_| {
        config_error(format!(
            "Invalid value for {}: '{}' (expected a non-negative integer)",
            key, raw
        ))
    })
}
