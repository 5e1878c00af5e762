//! Prints which service sections are configured. Never prints values.

use samplekit_core::{EntryPoint, ExampleResult, Settings};
use samplekit_settings::{AzureOpenAiSettings, BingSettings, OpenAiSettings};

use crate::console::Console;

pub const NAME: &str = "Example07_SettingsSummary";

pub fn entry(console: Console) -> EntryPoint {
    EntryPoint::blocking(move |settings| run(&console, settings))
}

fn run(console: &Console, settings: &Settings) -> ExampleResult<()> {
    console.line("======== Settings Summary ========");
    for line in summarize(settings) {
        console.line(line);
    }
    Ok(())
}

fn summarize(settings: &Settings) -> Vec<String> {
    let status = |ready: bool| if ready { "ready" } else { "incomplete" };
    vec![
        format!("{} keys loaded", settings.len()),
        format!(
            "{}: {}",
            OpenAiSettings::SECTION,
            status(OpenAiSettings::resolve(settings).is_ok())
        ),
        format!(
            "{}: {}",
            AzureOpenAiSettings::SECTION,
            status(AzureOpenAiSettings::resolve(settings).is_ok())
        ),
        format!(
            "{}: {}",
            BingSettings::SECTION,
            status(BingSettings::resolve(settings).is_ok())
        ),
    ]
}
