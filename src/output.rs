use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::{
    config::DEFAULT_PREVIEW_LEN,
    nplus1::{Nplus1Report, Severity},
    regression::{RegressionReport, RegressionResult}
};

const PASS: &str = "\u{2713}";
const FAIL: &str = "\u{2717}";
const NEW: &str = "\u{25cf}";
const IMPROVED: &str = "\u{2b07}";

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:      OutputFormat,
    pub colored:     bool,
    /// Characters of an example query shown in text output
    pub preview_len: usize
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:      OutputFormat::Text,
            colored:     true,
            preview_len: DEFAULT_PREVIEW_LEN
        }
    }
}

/// Baseline save confirmation for serialization
#[derive(Debug, Serialize)]
pub struct BaselineSaved<'a> {
    pub path:  &'a str,
    pub tests: usize
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value).unwrap_or_default()),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value).unwrap_or_default()),
        OutputFormat::Text => None
    }
}

fn paint(text: &str, opts: &OutputOptions, style: fn(&str) -> colored::ColoredString) -> String {
    if opts.colored {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

fn green(s: &str) -> colored::ColoredString {
    s.green()
}

fn red(s: &str) -> colored::ColoredString {
    s.red()
}

fn yellow(s: &str) -> colored::ColoredString {
    s.yellow()
}

fn cyan(s: &str) -> colored::ColoredString {
    s.cyan()
}

fn bold_red(s: &str) -> colored::ColoredString {
    s.red().bold()
}

fn bold_green(s: &str) -> colored::ColoredString {
    s.green().bold()
}

/// Format the result of a `check` run
///
/// Baseline tests absent from the results are only part of the JSON and YAML
/// documents; the text form has one line per result plus the summary.
pub fn format_check_report(report: &RegressionReport, opts: &OutputOptions) -> String {
    if let Some(serialized) = serialize(report, opts.format) {
        return serialized;
    }

    let mut output = String::new();
    for outcome in &report.outcomes {
        let (glyph, suffix) = match outcome.result {
            RegressionResult::Pass {
                ..
            } => (paint(PASS, opts, green), String::new()),
            RegressionResult::New {
                ..
            } => (paint(NEW, opts, cyan), String::new()),
            RegressionResult::Fail {
                expected,
                delta,
                ..
            } => (
                paint(FAIL, opts, red),
                format!(" (expected <={}, +{})", expected, delta)
            ),
            RegressionResult::Improved {
                expected, ..
            } => (paint(IMPROVED, opts, green), format!(" (was {})", expected))
        };
        output.push_str(&format!(
            "  {} {}: {} queries{}\n",
            glyph,
            outcome.test_id,
            outcome.result.current(),
            suffix
        ));
    }

    output.push('\n');
    let failures = report.failure_count();
    if failures > 0 {
        let summary = format!(
            "{} {} regression(s) detected. Gate BLOCKED.",
            FAIL, failures
        );
        output.push_str(&paint(&summary, opts, bold_red));
    } else {
        let summary = format!(
            "{} All {} test(s) passed query gate.",
            PASS,
            report.outcomes.len()
        );
        output.push_str(&paint(&summary, opts, bold_green));
    }
    output
}

/// Format the confirmation of a `baseline` run
pub fn format_baseline_saved(tests: usize, path: &Path, opts: &OutputOptions) -> String {
    let path = path.display().to_string();
    let saved = BaselineSaved {
        path: &path,
        tests
    };
    if let Some(serialized) = serialize(&saved, opts.format) {
        return serialized;
    }
    format!(
        "{} Baseline saved: {} test(s) -> {}",
        paint(PASS, opts, green),
        tests,
        path
    )
}

/// Format the result of an `analyze` run
pub fn format_nplus1_report(report: &Nplus1Report, opts: &OutputOptions) -> String {
    if let Some(serialized) = serialize(report, opts.format) {
        return serialized;
    }

    if !report.has_violations() {
        let summary = format!("{} No N+1 patterns in {} queries.", PASS, report.queries_count);
        return paint(&summary, opts, bold_green);
    }

    let mut output = String::new();
    for violation in &report.violations {
        let severity = violation.severity.to_string();
        let severity = match violation.severity {
            Severity::Critical => paint(&severity, opts, red),
            Severity::Warning => paint(&severity, opts, yellow)
        };
        output.push_str(&format!(
            "  {} N+1: {}x [{}] {}\n",
            paint(FAIL, opts, red),
            violation.count,
            severity,
            preview(&violation.example, opts.preview_len)
        ));
    }
    output.push('\n');
    let summary = format!(
        "{} {} N+1 pattern(s) found in {} queries.",
        FAIL,
        report.violations.len(),
        report.queries_count
    );
    output.push_str(&paint(&summary, opts, bold_red));
    output
}

/// First `max_chars` characters of `sql`
pub fn preview(sql: &str, max_chars: usize) -> &str {
    match sql.char_indices().nth(max_chars) {
        Some((idx, _)) => &sql[..idx],
        None => sql
    }
}
