//! Shared helpers for command handlers.

use std::fs;
use std::path::Path;

use miette::IntoDiagnostic;
use serde_json::Value;
use tracing::info;

use plover_task::format::parse_task_json;
use plover_task::Task;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => miette::bail!("Unknown output format: {other}. Use 'text' or 'json'."),
    }
}

/// Read, parse and validate a JSON task file.
pub(crate) fn load_task(path: &Path) -> miette::Result<Task> {
    let source = fs::read_to_string(path)
        .map_err(|e| miette::miette!("Cannot read task file {}: {e}", path.display()))?;
    let task = parse_task_json(&source)
        .map_err(|e| miette::miette!("Invalid task file {}: {e}", path.display()))?;
    info!(
        "Loaded {}: {} variables, {} operators",
        path.display(),
        task.num_variables(),
        task.num_operators()
    );
    Ok(task)
}

pub(crate) fn write_json_artifact(path: &Path, value: &Value) -> miette::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(value).into_diagnostic()?).into_diagnostic()?;
    Ok(())
}
