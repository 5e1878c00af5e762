//! Renders a prompt that calls a native function, then sends it.
//!
//! Written against the plain async shape: the example never sees the
//! cancellation signal, the runner abandons it at its next await instead.

use std::sync::Arc;

use samplekit_core::{EntryPoint, ExampleResult, Settings};
use samplekit_settings::OpenAiSettings;

use super::{Collaborator, ServiceRequest};
use crate::console::Console;

pub const NAME: &str = "Example06_TemplateLanguage";

pub fn entry(collaborator: Arc<dyn Collaborator>, console: Console) -> EntryPoint {
    EntryPoint::asynchronous(move |settings| {
        run(Arc::clone(&collaborator), console.clone(), settings)
    })
}

async fn run(
    collaborator: Arc<dyn Collaborator>,
    console: Console,
    settings: Arc<Settings>,
) -> ExampleResult<()> {
    console.line("======== TemplateLanguage ========");

    let openai = OpenAiSettings::resolve(&settings)?;

    let rendered = collaborator
        .invoke(ServiceRequest::new("native", "Render", "time.Date"))
        .await?;
    console.line(format_args!("--- Rendered Prompt\n{rendered}"));

    let reply = collaborator
        .invoke(ServiceRequest::new(openai.model_id.as_str(), "Complete", rendered))
        .await?;
    console.line(format_args!("--- Completion\n{reply}"));
    Ok(())
}
