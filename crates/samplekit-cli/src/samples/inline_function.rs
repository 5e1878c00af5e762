//! A function defined inline and invoked for several inputs.

use std::sync::Arc;

use samplekit_core::{EntryPoint, ExampleContext, ExampleResult};
use samplekit_settings::OpenAiSettings;

use super::{Collaborator, ServiceRequest};
use crate::console::Console;

pub const NAME: &str = "Example05_InlineFunctionDefinition";

const FUNCTION: &str = "TestFunction";

const INPUTS: [&str; 2] = [
    "I missed the F1 final race",
    "sorry I forgot your birthday",
];

pub fn entry(collaborator: Arc<dyn Collaborator>, console: Console) -> EntryPoint {
    EntryPoint::cancellable(move |ctx| run(Arc::clone(&collaborator), console.clone(), ctx))
}

async fn run(
    collaborator: Arc<dyn Collaborator>,
    console: Console,
    ctx: ExampleContext,
) -> ExampleResult<()> {
    console.line("======== Inline Function Definition ========");

    let openai = OpenAiSettings::resolve(&ctx.settings)?;

    for input in INPUTS {
        ctx.cancellation.ensure_active()?;
        let request = ServiceRequest::new(openai.model_id.as_str(), FUNCTION, input);
        let reply = ctx
            .cancellation
            .run_until_cancelled(collaborator.invoke(request))
            .await??;
        console.line(reply);
    }

    Ok(())
}
