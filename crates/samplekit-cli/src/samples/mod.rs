//! The example programs bundled with the binary.
//!
//! Each example resolves the settings it needs up front, so a missing
//! credential surfaces as a skip before any service is contacted. Service
//! work goes through the [`Collaborator`] seam; the binary wires in
//! [`DryRunCollaborator`], which only logs what would be sent. Printed
//! output goes through the [`Console`] each example is built with.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use samplekit_core::{ExampleRegistry, ExampleResult, RegistryError};
use tracing::info;

use crate::console::Console;

pub mod combine_prompts;
pub mod inline_function;
pub mod settings_summary;
pub mod template_language;

/// One opaque call to an external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    /// Service identifier, e.g. a model or deployment name.
    pub service: String,
    /// Operation to run on the service.
    pub operation: String,
    pub input: String,
}

impl ServiceRequest {
    pub fn new(
        service: impl Into<String>,
        operation: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            operation: operation.into(),
            input: input.into(),
        }
    }
}

/// External service boundary used by the examples.
#[async_trait]
pub trait Collaborator: Send + Sync {
    async fn invoke(&self, request: ServiceRequest) -> ExampleResult<String>;
}

/// Collaborator that performs no I/O: it logs the request, waits for
/// `latency` and echoes the operation back.
#[derive(Debug, Clone, Default)]
pub struct DryRunCollaborator {
    pub latency: Duration,
}

impl DryRunCollaborator {
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Collaborator for DryRunCollaborator {
    async fn invoke(&self, request: ServiceRequest) -> ExampleResult<String> {
        info!(
            service = %request.service,
            operation = %request.operation,
            "dry-run service call"
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(format!("[dry-run {}] {}", request.operation, request.input))
    }
}

/// Register every bundled example.
pub fn register_all(
    registry: &mut ExampleRegistry,
    collaborator: Arc<dyn Collaborator>,
    console: &Console,
) -> Result<(), RegistryError> {
    registry
        .register(
            combine_prompts::NAME,
            combine_prompts::entry(Arc::clone(&collaborator), console.clone()),
        )?
        .register(
            inline_function::NAME,
            inline_function::entry(Arc::clone(&collaborator), console.clone()),
        )?
        .register(
            template_language::NAME,
            template_language::entry(collaborator, console.clone()),
        )?
        .register(settings_summary::NAME, settings_summary::entry(console.clone()))?;
    Ok(())
}

/// Registry holding the bundled examples.
pub fn build_registry(
    collaborator: Arc<dyn Collaborator>,
    console: &Console,
) -> Result<ExampleRegistry, RegistryError> {
    let mut registry = ExampleRegistry::new();
    register_all(&mut registry, collaborator, console)?;
    Ok(registry)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry_lists_examples_in_name_order() {
        let registry = build_registry(Arc::new(DryRunCollaborator::default()), &Console::buffer())
            .expect("registry");
        let names: Vec<String> = registry
            .list_all()
            .iter()
            .map(|u| u.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Example04_CombineLLMPromptsAndNativeCode",
                "Example05_InlineFunctionDefinition",
                "Example06_TemplateLanguage",
                "Example07_SettingsSummary",
            ]
        );
    }

    #[test]
    fn test_registering_twice_fails() {
        let console = Console::buffer();
        let mut registry =
            build_registry(Arc::new(DryRunCollaborator::default()), &console).expect("registry");
        let err = register_all(&mut registry, Arc::new(DryRunCollaborator::default()), &console)
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
    }

    #[tokio::test]
    async fn test_dry_run_echoes_operation() {
        let reply = DryRunCollaborator::default()
            .invoke(ServiceRequest::new("gpt", "Summarize", "text"))
            .await
            .expect("dry run");
        assert_eq!(reply, "[dry-run Summarize] text");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dry_run_latency_is_a_suspension_point() {
        let collaborator = DryRunCollaborator::with_latency(Duration::from_secs(5));
        let signal = samplekit_core::CancellationSignal::new();
        let canceller = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.request_cancellation();
        });

        let result = signal
            .run_until_cancelled(collaborator.invoke(ServiceRequest::new("gpt", "Complete", "")))
            .await;
        assert!(matches!(result, Err(samplekit_core::ExampleError::Cancelled)));
    }
}
