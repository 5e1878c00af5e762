//! Human-readable progress lines for a run.

use std::io::Write;

use samplekit_core::{ExampleReport, ExecutionOutcome, OutcomeSink, RunReport};

/// Writes one line per transition to the wrapped writer.
///
/// Write errors are dropped; losing progress output must not change the
/// outcome of the run.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Closing summary after the run returns.
    pub fn summary(&mut self, report: &RunReport) {
        let line = format!(
            "{} completed, {} skipped, {} failed",
            report.completed_count(),
            report.skipped_count(),
            report.failed_count()
        );
        writeln!(self.out, "{line}").ok();
        if report.stopped_by_cancellation && report.not_started() > 0 {
            writeln!(
                self.out,
                "Run cancelled; {} example(s) not started.",
                report.not_started()
            )
            .ok();
        }
        if report.aborted_on_failure && report.not_started() > 0 {
            writeln!(
                self.out,
                "Run aborted after failure; {} example(s) not started.",
                report.not_started()
            )
            .ok();
        }
    }
}

impl<W: Write> OutcomeSink for ConsoleReporter<W> {
    fn started(&mut self, name: &str) {
        writeln!(self.out, "Running {name}...").ok();
    }

    fn finished(&mut self, report: &ExampleReport) {
        let name = &report.name;
        let written = match &report.outcome {
            ExecutionOutcome::Completed => writeln!(self.out, "== DONE =="),
            ExecutionOutcome::SkippedMissingConfiguration { reason } => {
                writeln!(self.out, "{reason}. Skipping example {name}.")
            }
            ExecutionOutcome::Cancelled => writeln!(self.out, "{name} cancelled."),
            ExecutionOutcome::Failed { cause } => writeln!(self.out, "{name} failed: {cause}"),
        };
        written.ok();
        self.out.flush().ok();
    }
}
