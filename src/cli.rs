use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// QueryGate - N+1 & query regression gate for CI
#[derive(Parser, Debug)]
#[command(name = "querygate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check results against baseline
    Check {
        /// JSON {test_id: query_count}
        results: PathBuf,

        /// Baseline snapshot [default: .querygate.json]
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// Allowed queries above the baseline [default: 0]
        #[arg(short, long)]
        tolerance: Option<u64>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Save current results as baseline
    Baseline {
        /// JSON {test_id: query_count}
        results: PathBuf,

        /// Baseline snapshot [default: .querygate.json]
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },

    /// Detect N+1 in raw SQL list
    Analyze {
        /// JSON list of SQL strings
        queries: PathBuf,

        /// Repetitions allowed per query shape [default: 2]
        #[arg(short, long)]
        threshold: Option<usize>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
