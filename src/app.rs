//! Application logic for the QueryGate CLI.
//!
//! This module contains the command implementations separated from the main
//! entry point to enable testing. Every command returns the text to print and
//! the process exit code instead of printing or exiting itself.

use std::path::PathBuf;

use tracing::info;

use crate::{
    baseline::Baseline,
    cli::{Commands, Format},
    config::Config,
    document::{load_queries, load_results},
    error::AppResult,
    gate::QueryLog,
    nplus1::Nplus1Report,
    output::{
        OutputFormat, OutputOptions, format_baseline_saved, format_check_report,
        format_nplus1_report
    },
    regression::RegressionReport
};

/// Parameters for the check command
#[derive(Debug, Clone)]
pub struct CheckParams {
    pub results_path:  PathBuf,
    pub baseline_path: PathBuf,
    pub tolerance:     u64,
    pub output:        OutputOptions
}

/// Parameters for the baseline command
#[derive(Debug, Clone)]
pub struct BaselineParams {
    pub results_path:  PathBuf,
    pub baseline_path: PathBuf,
    pub output:        OutputOptions
}

/// Parameters for the analyze command
#[derive(Debug, Clone)]
pub struct AnalyzeParams {
    pub queries_path: PathBuf,
    pub threshold:    usize,
    pub output:       OutputOptions
}

/// Result of running a command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code for the process (0=pass, 1=gate blocked)
    pub exit_code: i32,
    /// Text to print to stdout
    pub stdout:    String
}

/// Convert CLI format to internal OutputFormat
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

fn output_options(format: Format, no_color: bool, config: &Config) -> OutputOptions {
    OutputOptions {
        format:      convert_format(format),
        colored:     !no_color && config.output.color,
        preview_len: config.analyze.preview_len
    }
}

/// Compare a results document against the baseline.
///
/// Exit code is 1 when at least one test regressed.
pub fn run_check(params: &CheckParams) -> AppResult<CommandOutput> {
    let baseline = Baseline::load(&params.baseline_path)?;
    let results = load_results(&params.results_path)?;
    let report = RegressionReport::compare(&baseline, &results, params.tolerance);
    info!(
        tests = report.outcomes.len(),
        failures = report.failure_count(),
        tolerance = params.tolerance,
        "checked results against baseline"
    );
    Ok(CommandOutput {
        exit_code: i32::from(report.is_blocked()),
        stdout:    format_check_report(&report, &params.output)
    })
}

/// Replace the baseline with a results document.
pub fn run_baseline(params: &BaselineParams) -> AppResult<CommandOutput> {
    let results = load_results(&params.results_path)?;
    let baseline = Baseline::from(results);
    baseline.save(&params.baseline_path)?;
    info!(
        tests = baseline.len(),
        path = %params.baseline_path.display(),
        "baseline written"
    );
    Ok(CommandOutput {
        exit_code: 0,
        stdout:    format_baseline_saved(baseline.len(), &params.baseline_path, &params.output)
    })
}

/// Look for N+1 patterns in a queries document.
///
/// Exit code is 1 when at least one pattern was found.
pub fn run_analyze(params: &AnalyzeParams) -> AppResult<CommandOutput> {
    let log: QueryLog = load_queries(&params.queries_path)?.into_iter().collect();
    let report = Nplus1Report::new(&log, params.threshold);
    info!(
        queries = report.queries_count,
        violations = report.violations.len(),
        critical = report.critical_count(),
        "analyzed query log"
    );
    Ok(CommandOutput {
        exit_code: i32::from(report.has_violations()),
        stdout:    format_nplus1_report(&report, &params.output)
    })
}

/// Resolve flags against configuration and run the command
pub fn run_command(command: Commands, config: &Config) -> AppResult<CommandOutput> {
    match command {
        Commands::Check {
            results,
            baseline,
            tolerance,
            format,
            no_color
        } => run_check(&CheckParams {
            results_path:  results,
            baseline_path: baseline.unwrap_or_else(|| config.check.baseline.clone()),
            tolerance:     tolerance.unwrap_or(config.check.tolerance),
            output:        output_options(format, no_color, config)
        }),
        Commands::Baseline {
            results,
            baseline,
            format,
            no_color
        } => run_baseline(&BaselineParams {
            results_path:  results,
            baseline_path: baseline.unwrap_or_else(|| config.check.baseline.clone()),
            output:        output_options(format, no_color, config)
        }),
        Commands::Analyze {
            queries,
            threshold,
            format,
            no_color
        } => run_analyze(&AnalyzeParams {
            queries_path: queries,
            threshold:    threshold.unwrap_or(config.analyze.threshold),
            output:       output_options(format, no_color, config)
        })
    }
}
