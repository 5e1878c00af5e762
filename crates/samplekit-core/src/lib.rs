//! samplekit core - discovery and sequential execution of example programs
//!
//! Provides:
//! - A static registry of examples discovered by name prefix
//! - A process-wide cancellation signal wired to the OS interrupt
//! - A coordinator that filters, runs and classifies each example in turn

pub mod cancellation;
pub mod coordinator;
pub mod error;
pub mod outcome;
pub mod registry;
pub mod telemetry;

pub use cancellation::{install_interrupt_handler, new_signal, CancellationSignal};
pub use coordinator::{Coordinator, FailurePolicy, NullSink, OutcomeSink, RunOptions};
pub use error::{ExampleError, ExampleResult, RegistryError};
pub use outcome::{ExampleReport, ExecutionOutcome, RunReport};
pub use registry::{EntryPoint, ExampleContext, ExampleRegistry, ExampleUnit, Filter, DEFAULT_PREFIX};
pub use telemetry::{init_tracing, LogFormat};

pub use samplekit_settings::{ConfigurationNotFound, Settings};
