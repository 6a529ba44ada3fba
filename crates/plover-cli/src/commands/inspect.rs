// Command handler for: Inspect

use std::path::PathBuf;

use miette::IntoDiagnostic;
use serde::Serialize;

use plover_task::{CausalGraph, Task, VariableId};

use super::helpers::{load_task, parse_output_format, OutputFormat};

#[derive(Debug, Serialize)]
struct VariableSummary {
    id: VariableId,
    name: String,
    domain_size: usize,
    predecessors: Vec<VariableId>,
    successors: Vec<VariableId>,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    file: String,
    num_operators: usize,
    variables: Vec<VariableSummary>,
    goal: Vec<String>,
    goal_variables: Vec<VariableId>,
}

fn inspect_task(task: &Task, file: String) -> InspectReport {
    let graph = CausalGraph::new(task);
    let variables = task
        .variables
        .iter()
        .enumerate()
        .map(|(id, var)| VariableSummary {
            id,
            name: var.name.clone(),
            domain_size: var.domain_size,
            predecessors: graph.predecessors(id),
            successors: graph.successors(id),
        })
        .collect();
    let goal = task
        .goal
        .iter()
        .map(|fact| {
            let var = &task.variables[fact.var];
            format!("{} = {}", var.name, var.value_name(fact.value))
        })
        .collect();
    InspectReport {
        file,
        num_operators: task.num_operators(),
        variables,
        goal,
        goal_variables: task.goal_variables(),
    }
}

fn render_inspect_text(report: &InspectReport) -> String {
    let mut out = format!("Task {}\n", report.file);
    out.push_str(&format!("  Operators: {}\n", report.num_operators));
    out.push_str(&format!("  Variables ({}):\n", report.variables.len()));
    for var in &report.variables {
        out.push_str(&format!(
            "    v{} {} (|D| = {}), predecessors {:?}\n",
            var.id, var.name, var.domain_size, var.predecessors
        ));
    }
    out.push_str("  Goal:");
    if report.goal.is_empty() {
        out.push_str(" (empty)");
    }
    for fact in &report.goal {
        out.push_str(&format!("\n    {fact}"));
    }
    out
}

pub(crate) fn run_inspect_command(task_path: PathBuf, format: String) -> miette::Result<()> {
    let output_format = parse_output_format(&format)?;
    let task = load_task(&task_path)?;
    let report = inspect_task(&task, task_path.display().to_string());

    match output_format {
        OutputFormat::Text => println!("{}", render_inspect_text(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).into_diagnostic()?
        ),
    }
    Ok(())
}
