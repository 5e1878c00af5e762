//! Per-example outcomes and the aggregate run report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classified result of running one example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Completed,
    SkippedMissingConfiguration { reason: String },
    Cancelled,
    Failed { cause: String },
}

impl ExecutionOutcome {
    /// Short label for logs and console output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::SkippedMissingConfiguration { .. } => "skipped",
            Self::Cancelled => "cancelled",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one example together with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ExecutionOutcome,
    pub duration_ms: u64,
}

/// Result of a complete run, in the order examples were started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    /// How many examples the filter selected.
    pub selected: usize,

    /// One entry per example that was started.
    pub outcomes: Vec<ExampleReport>,

    /// The run ended early because cancellation was observed.
    pub stopped_by_cancellation: bool,

    /// At least one example failed and the run moved on past it.
    pub continued_after_failure: bool,

    /// The run ended early on a failure (strict-abort policy).
    pub aborted_on_failure: bool,

    pub duration_ms: u64,
}

impl RunReport {
    pub fn new(selected: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            selected,
            outcomes: Vec::new(),
            stopped_by_cancellation: false,
            continued_after_failure: false,
            aborted_on_failure: false,
            duration_ms: 0,
        }
    }

    /// `(name, outcome)` pairs in emission order.
    pub fn pairs(&self) -> Vec<(&str, &ExecutionOutcome)> {
        self.outcomes
            .iter()
            .map(|r| (r.name.as_str(), &r.outcome))
            .collect()
    }

    pub fn completed_count(&self) -> usize {
        self.count(|o| matches!(o, ExecutionOutcome::Completed))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, ExecutionOutcome::SkippedMissingConfiguration { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(ExecutionOutcome::is_failure)
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Selected examples that were never started.
    pub fn not_started(&self) -> usize {
        self.selected.saturating_sub(self.outcomes.len())
    }

    fn count(&self, pred: impl Fn(&ExecutionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|r| pred(&r.outcome)).count()
    }
}
