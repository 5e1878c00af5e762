//! samplekit CLI - runs the bundled example programs
//!
//! The binary is a thin wrapper around [`execute`]; everything it does is
//! reachable from here so it can be driven from tests with an in-memory
//! writer and a hand-made registry.

pub mod cli;
pub mod console;
pub mod reporter;
pub mod samples;
pub mod settings;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use samplekit_core::{CancellationSignal, Coordinator, ExampleRegistry, NullSink, RunReport, Settings};

pub use cli::Cli;
pub use console::Console;
pub use reporter::ConsoleReporter;

/// Print the names the filter selects, one per line.
pub fn list<W: Write>(cli: &Cli, registry: &ExampleRegistry, mut out: W) -> Result<()> {
    for unit in registry.select(&cli.filter()) {
        writeln!(out, "{}", unit.name()).context("failed to write example list")?;
    }
    Ok(())
}

/// Run the selected examples and write progress (or the JSON report) to `out`.
pub async fn execute<W: Write>(
    cli: &Cli,
    registry: ExampleRegistry,
    settings: Settings,
    signal: &CancellationSignal,
    mut out: W,
) -> Result<RunReport> {
    let coordinator = Coordinator::new(Arc::new(registry), Arc::new(settings))
        .with_options(cli.run_options());
    let filter = cli.filter();

    if cli.json {
        let report = coordinator.run(&filter, signal, &mut NullSink).await;
        serde_json::to_writer_pretty(&mut out, &report).context("failed to write run report")?;
        writeln!(out).context("failed to write run report")?;
        return Ok(report);
    }

    let mut reporter = ConsoleReporter::new(out);
    let report = coordinator.run(&filter, signal, &mut reporter).await;
    reporter.summary(&report);
    Ok(report)
}
