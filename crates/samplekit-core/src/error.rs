//! Error taxonomy for example invocations and registry construction.

use samplekit_settings::ConfigurationNotFound;

/// Errors an example entry point may return.
///
/// The coordinator classifies each variant exactly once:
/// `ConfigurationMissing` skips the example, `Cancelled` ends the run,
/// `Failed` is isolated to the example that raised it.
#[derive(Debug, thiserror::Error)]
pub enum ExampleError {
    #[error(transparent)]
    ConfigurationMissing(#[from] ConfigurationNotFound),

    #[error("example cancelled")]
    Cancelled,

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl ExampleError {
    /// Wrap any displayable cause as an unclassified failure.
    pub fn failed(cause: impl std::fmt::Display) -> Self {
        Self::Failed(anyhow::anyhow!("{cause}"))
    }
}

/// Result type for example entry points.
pub type ExampleResult<T> = std::result::Result<T, ExampleError>;

/// Errors produced while building the example registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("example {name} is registered more than once")]
    DuplicateName { name: String },

    #[error("example name must not be empty")]
    EmptyName,
}
