//! Web search answer, then the same answer piped through two summarizers.

use std::sync::Arc;

use samplekit_core::{EntryPoint, ExampleContext, ExampleResult};
use samplekit_settings::{AzureOpenAiSettings, BingSettings};

use super::{Collaborator, ServiceRequest};
use crate::console::Console;

pub const NAME: &str = "Example04_CombineLLMPromptsAndNativeCode";

const ASK: &str = "What's the tallest building in South America";

pub fn entry(collaborator: Arc<dyn Collaborator>, console: Console) -> EntryPoint {
    EntryPoint::cancellable(move |ctx| run(Arc::clone(&collaborator), console.clone(), ctx))
}

async fn run(
    collaborator: Arc<dyn Collaborator>,
    console: Console,
    ctx: ExampleContext,
) -> ExampleResult<()> {
    console.line("======== LLMPrompts ========");

    // Authenticates with the ambient identity; no Azure key needed.
    let azure = AzureOpenAiSettings::resolve_for_ambient_credential(&ctx.settings)?;
    BingSettings::resolve(&ctx.settings)?;
    let cancel = &ctx.cancellation;

    let search = ServiceRequest::new("bing", "Search", ASK);
    let answer = cancel
        .run_until_cancelled(collaborator.invoke(search))
        .await??;

    // Each pipeline re-runs the search before handing the result on.
    let mut pipelines = Vec::new();
    for step in ["SummarizeSkill.Summarize", "SummarizeSkill.Notegen"] {
        cancel.ensure_active()?;
        let searched = cancel
            .run_until_cancelled(collaborator.invoke(ServiceRequest::new("bing", "Search", ASK)))
            .await??;
        let request = ServiceRequest::new(azure.deployment_name.as_str(), step, searched);
        let output = cancel
            .run_until_cancelled(collaborator.invoke(request))
            .await??;
        pipelines.push(output);
    }

    console.line(format_args!("{ASK}\n"));
    console.line(format_args!("Bing Answer: {answer}\n"));
    console.line(format_args!("Summary: {}\n", pipelines[0]));
    console.line(format_args!("Notes: {}\n", pipelines[1]));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::testing::RecordingCollaborator;
    use samplekit_core::{CancellationSignal, ExampleError, Settings};

    fn complete_settings() -> Arc<Settings> {
        Arc::new(
            Settings::builder()
                .add_value("AzureOpenAI:DeploymentName", "gpt-35-turbo")
                .add_value("AzureOpenAI:Endpoint", "https://example.invalid")
                .add_value("Bing:ApiKey", "bing-key")
                .build(),
        )
    }

    #[tokio::test]
    async fn test_runs_search_then_both_pipelines() {
        let collaborator = Arc::new(RecordingCollaborator::default());
        let console = Console::buffer();
        let ctx = ExampleContext::new(complete_settings(), CancellationSignal::new());

        run(collaborator.clone(), console.clone(), ctx)
            .await
            .expect("example runs");

        assert_eq!(
            collaborator.operations(),
            vec![
                "Search",
                "Search",
                "SummarizeSkill.Summarize",
                "Search",
                "SummarizeSkill.Notegen",
            ]
        );
        assert!(console.contents().starts_with("======== LLMPrompts ========\n"));
        assert!(console.contents().contains("Bing Answer: reply"));
    }

    #[tokio::test]
    async fn test_runs_without_azure_api_key() {
        let collaborator = Arc::new(RecordingCollaborator::default());
        let ctx = ExampleContext::new(complete_settings(), CancellationSignal::new());
        assert!(ctx.settings.get("AzureOpenAI:ApiKey").is_none());

        run(collaborator.clone(), Console::buffer(), ctx)
            .await
            .expect("ambient credential is enough");
        assert_eq!(collaborator.operations().len(), 5);
    }

    #[tokio::test]
    async fn test_missing_bing_key_skips_before_any_call() {
        let collaborator = Arc::new(RecordingCollaborator::default());
        let settings = Settings::builder()
            .add_value("AzureOpenAI:DeploymentName", "gpt-35-turbo")
            .add_value("AzureOpenAI:Endpoint", "https://example.invalid")
            .add_value("AzureOpenAI:ApiKey", "azure-key")
            .build();
        let ctx = ExampleContext::new(Arc::new(settings), CancellationSignal::new());

        let err = run(collaborator.clone(), Console::buffer(), ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ExampleError::ConfigurationMissing(ref e) if e.key == "Bing:ApiKey"));
        assert!(collaborator.operations().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_signal_stops_before_search() {
        let collaborator = Arc::new(RecordingCollaborator::default());
        let signal = CancellationSignal::new();
        signal.request_cancellation();

        let err = run(
            collaborator.clone(),
            Console::buffer(),
            ExampleContext::new(complete_settings(), signal),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ExampleError::Cancelled));
        assert!(collaborator.operations().is_empty());
    }
}
