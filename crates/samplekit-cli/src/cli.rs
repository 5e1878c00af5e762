//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use samplekit_core::{FailurePolicy, Filter, LogFormat, RunOptions};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "samplekit")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run the bundled example programs", long_about = None)]
pub struct Cli {
    /// Only run examples whose name contains this text (case-insensitive)
    pub filter: Option<String>,

    /// JSON settings file layered over the built-in defaults
    #[arg(long, env = "SAMPLEKIT_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Stop at the first failing example instead of continuing
    #[arg(long)]
    pub fail_fast: bool,

    /// Time limit for a single example, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the selected example names without running them
    #[arg(long)]
    pub list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit JSON log lines and a JSON run report; example output moves to stderr
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn filter(&self) -> Filter {
        Filter::from_arg(self.filter.as_deref())
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            failure_policy: if self.fail_fast {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Continue
            },
            timeout: self
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::from_json_flag(self.json)
    }

    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        }
    }
}
