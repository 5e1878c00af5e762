//! samplekit - run the bundled example programs
//!
//! ```text
//! samplekit                 # run every example
//! samplekit template        # only examples whose name contains "template"
//! samplekit --list inline   # show what would run
//! ```
//!
//! Ctrl+C cancels the example in flight and stops the run. With `--json`,
//! stdout carries only the run report.

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use samplekit_cli::samples::{build_registry, DryRunCollaborator};
use samplekit_cli::settings::load_settings;
use samplekit_cli::{execute, list, Cli, Console};
use samplekit_core::{init_tracing, install_interrupt_handler, new_signal};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format(), cli.log_level());

    let console = Console::for_output(cli.json);
    let signal = new_signal();
    let notice = console.clone();
    let _interrupts = install_interrupt_handler(signal.clone(), move || notice.line("Canceling..."));

    let registry = build_registry(Arc::new(DryRunCollaborator::default()), &console)
        .context("failed to register examples")?;

    if cli.list {
        return list(&cli, &registry, io::stdout());
    }

    let settings = load_settings(cli.settings.as_deref())?;
    let report = execute(&cli, registry, settings, &signal, io::stdout()).await?;

    if report.has_failures() {
        anyhow::bail!("{} example(s) failed", report.failed_count());
    }
    Ok(())
}
