//! # QueryGate
//!
//! CI gate against database query-count regressions and N+1 query patterns.
//!
//! The test suite of an application reports how many SQL queries each test
//! issued. `querygate` compares those numbers with a committed baseline and
//! fails the build when a test suddenly needs more queries than before. It
//! can also inspect a raw list of captured SQL statements and point out
//! statement shapes that are executed over and over, the usual symptom of an
//! N+1 access pattern.
//!
//! # Quick Start
//!
//! ```bash
//! # Record the current counts as the expectation
//! querygate baseline results.json
//!
//! # Later, in CI: fail when a test issues more queries than recorded
//! querygate check results.json --tolerance 1
//!
//! # Look for N+1 patterns in a captured query log
//! querygate analyze queries.json --threshold 2
//! ```
//!
//! # Documents
//!
//! | File | Shape |
//! |------|-------|
//! | results / baseline | `{"test_id": query_count}` |
//! | queries | `["SELECT ...", ...]` |
//!
//! # Exit Codes
//!
//! - `0` - Gate passed
//! - `1` - Regression or N+1 pattern found, missing subcommand, or a fatal
//!   error such as an unreadable or malformed input file
//! - `2` - Invalid command-line arguments

use std::process;

use clap::{CommandFactory, Parser};
use querygate::{
    app::run_command,
    cli::Cli,
    config::Config,
    error::{AppError, AppResult}
};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config.log_level);

    let Some(command) = cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| AppError::internal(format!("Failed to print help: {}", e)))?;
        println!();
        return Ok(1);
    };

    let output = run_command(command, &config)?;
    println!("{}", output.stdout);
    Ok(output.exit_code)
}
