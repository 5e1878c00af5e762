//! Sequential execution of selected examples.
//!
//! The coordinator walks the filtered registry in order and drives one
//! example at a time. Each invocation is raced against the shared
//! [`CancellationSignal`] (and an optional timeout), then classified:
//!
//! - `Ok(())` → [`ExecutionOutcome::Completed`]
//! - [`ExampleError::ConfigurationMissing`] → skipped, run continues
//! - cancellation observed → [`ExecutionOutcome::Cancelled`], run stops
//! - anything else, including a panic → [`ExecutionOutcome::Failed`];
//!   whether the run continues is decided by [`FailurePolicy`]
//!
//! Outcomes are handed to an [`OutcomeSink`] as soon as they are known.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::FutureExt;
use samplekit_settings::Settings;
use tracing::{debug, info, instrument, warn};

use crate::cancellation::CancellationSignal;
use crate::error::{ExampleError, ExampleResult};
use crate::outcome::{ExampleReport, ExecutionOutcome, RunReport};
use crate::registry::{EntryPoint, ExampleContext, ExampleRegistry, ExampleUnit, Filter};

/// What to do after an example fails with an unclassified error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the failure and move on to the next example.
    #[default]
    Continue,
    /// Report the failure and start no further examples.
    Abort,
}

/// Options for a coordinator run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub failure_policy: FailurePolicy,

    /// Upper bound for a single example of any shape; exceeding it is a
    /// failure.
    pub timeout: Option<Duration>,
}

/// Receives per-example notifications while a run is in progress.
pub trait OutcomeSink {
    /// Called right before an example is invoked.
    fn started(&mut self, _name: &str) {}

    /// Called once the example's outcome is classified.
    fn finished(&mut self, report: &ExampleReport);
}

/// Sink that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutcomeSink for NullSink {
    fn finished(&mut self, _report: &ExampleReport) {}
}

impl OutcomeSink for Vec<ExampleReport> {
    fn finished(&mut self, report: &ExampleReport) {
        self.push(report.clone());
    }
}

/// Drives examples from a registry one at a time.
pub struct Coordinator {
    registry: Arc<ExampleRegistry>,
    settings: Arc<Settings>,
    options: RunOptions,
}

impl Coordinator {
    pub fn new(registry: Arc<ExampleRegistry>, settings: Arc<Settings>) -> Self {
        Self {
            registry,
            settings,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Run every example selected by `filter`, in registry order.
    ///
    /// Returns once all selected examples have been processed, or early when
    /// cancellation is observed or a failure aborts the run. Examples that
    /// were never started do not appear in the report.
    #[instrument(skip_all, fields(filter = %filter))]
    pub async fn run(
        &self,
        filter: &Filter,
        cancellation: &CancellationSignal,
        sink: &mut dyn OutcomeSink,
    ) -> RunReport {
        let start = Instant::now();
        let selected = self.registry.select(filter);
        let mut report = RunReport::new(selected.len());

        info!(
            run_id = %report.run_id,
            selected = selected.len(),
            "Starting example run"
        );

        for unit in selected {
            if cancellation.is_cancelled() {
                info!(next = %unit.name(), "Cancellation requested, not starting remaining examples");
                report.stopped_by_cancellation = true;
                break;
            }

            sink.started(unit.name());
            info!(example = %unit.name(), entry = ?unit.entry(), "Running example");

            let unit_start = Instant::now();
            let outcome = self.invoke(&unit, cancellation).await;
            let example = ExampleReport {
                name: unit.name().to_string(),
                outcome,
                duration_ms: unit_start.elapsed().as_millis() as u64,
            };
            log_outcome(&example);
            sink.finished(&example);

            let stop = match &example.outcome {
                ExecutionOutcome::Cancelled => {
                    report.stopped_by_cancellation = true;
                    true
                }
                ExecutionOutcome::Failed { .. } => match self.options.failure_policy {
                    FailurePolicy::Continue => {
                        report.continued_after_failure = true;
                        false
                    }
                    FailurePolicy::Abort => {
                        report.aborted_on_failure = true;
                        true
                    }
                },
                _ => false,
            };
            report.outcomes.push(example);
            if stop {
                break;
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %report.run_id,
            started = report.outcomes.len(),
            completed = report.completed_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            cancelled = report.stopped_by_cancellation,
            "Example run finished"
        );
        report
    }

    /// Invoke one example and classify what happened.
    async fn invoke(&self, unit: &ExampleUnit, cancellation: &CancellationSignal) -> ExecutionOutcome {
        let call = self.call(unit.entry(), cancellation);
        let guarded = AssertUnwindSafe(call).catch_unwind();

        let timeout = self.options.timeout;
        let bounded = async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, guarded).await.ok(),
                None => Some(guarded.await),
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!(example = %unit.name(), "Abandoning example at suspension point");
                return ExecutionOutcome::Cancelled;
            }
            result = bounded => result,
        };

        // A unit that returns after the signal flipped still counts as cancelled.
        if cancellation.is_cancelled() {
            return ExecutionOutcome::Cancelled;
        }

        match result {
            None => ExecutionOutcome::Failed {
                cause: format!(
                    "timed out after {}s",
                    timeout.unwrap_or_default().as_secs_f64()
                ),
            },
            Some(Err(panic)) => ExecutionOutcome::Failed {
                cause: format!("panicked: {}", panic_message(panic.as_ref())),
            },
            Some(Ok(result)) => classify(result),
        }
    }

    /// Build the invocation future for the entry point's shape.
    ///
    /// Every shape is wrapped in an async block so that panics raised while
    /// constructing the inner future are caught together with the rest.
    /// Blocking closures run on the blocking pool; a panic there is re-raised
    /// on this task so it is classified like any other. When the timeout or
    /// the signal wins, the join handle is dropped and the closure finishes
    /// detached.
    fn call(
        &self,
        entry: &EntryPoint,
        cancellation: &CancellationSignal,
    ) -> BoxFuture<'static, ExampleResult<()>> {
        let settings = Arc::clone(&self.settings);
        match entry {
            EntryPoint::Blocking(f) => {
                let f = Arc::clone(f);
                async move {
                    let handle = tokio::task::spawn_blocking(move || f(settings.as_ref()));
                    match handle.await {
                        Ok(result) => result,
                        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                        Err(e) => Err(ExampleError::failed(e)),
                    }
                }
                .boxed()
            }
            EntryPoint::Async(f) => {
                let f = Arc::clone(f);
                async move { f(settings).await }.boxed()
            }
            EntryPoint::Cancellable(f) => {
                let f = Arc::clone(f);
                let ctx = ExampleContext::new(settings, cancellation.clone());
                async move { f(ctx).await }.boxed()
            }
        }
    }
}

fn classify(result: ExampleResult<()>) -> ExecutionOutcome {
    match result {
        Ok(()) => ExecutionOutcome::Completed,
        Err(ExampleError::ConfigurationMissing(e)) => {
            ExecutionOutcome::SkippedMissingConfiguration { reason: e.message }
        }
        Err(ExampleError::Cancelled) => ExecutionOutcome::Cancelled,
        Err(ExampleError::Failed(e)) => ExecutionOutcome::Failed {
            cause: format!("{e:#}"),
        },
    }
}

fn log_outcome(report: &ExampleReport) {
    match &report.outcome {
        ExecutionOutcome::Completed => {
            info!(example = %report.name, duration_ms = report.duration_ms, "Example completed")
        }
        ExecutionOutcome::SkippedMissingConfiguration { reason } => {
            warn!(example = %report.name, reason = %reason, "Skipping example, configuration missing")
        }
        ExecutionOutcome::Cancelled => info!(example = %report.name, "Example cancelled"),
        ExecutionOutcome::Failed { cause } => {
            warn!(example = %report.name, cause = %cause, "Example failed")
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
