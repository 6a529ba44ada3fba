use serde_json::Value;
use std::process::Command;

fn workspace_root() -> String {
    format!("{}/../..", env!("CARGO_MANIFEST_DIR"))
}

fn plover(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_plover"))
        .args(args)
        .current_dir(workspace_root())
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to execute plover")
}

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "output should be JSON (status={:?}, stderr={}). parse error: {e}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

#[test]
fn generate_json_reports_converged_pattern() {
    let output = plover(&[
        "generate",
        "tasks/logistics.json",
        "--seed",
        "1",
        "--format",
        "json",
    ]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report = json_stdout(&output);
    assert_eq!(report["schema_version"], 1);
    assert_eq!(report["result"]["pattern"], serde_json::json!([0, 1, 2]));
    assert_eq!(report["result"]["statistics"]["termination"], "converged");
    assert_eq!(report["result"]["statistics"]["generator"], "cegar");
    assert_eq!(report["result"]["initial_distance"], 6);
    assert_eq!(report["options"]["random_seed"], 1);
}

#[test]
fn generate_text_with_size_budget() {
    let output = plover(&[
        "generate",
        "tasks/logistics.json",
        "--seed",
        "2",
        "--max-pdb-size",
        "12",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Termination: size_blocked"), "stdout={stdout}");
    assert!(stdout.contains("(12 abstract states)"), "stdout={stdout}");
}

#[test]
fn generate_with_zero_time_keeps_seed() {
    let output = plover(&[
        "generate",
        "tasks/door.json",
        "--max-time",
        "0",
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let report = json_stdout(&output);
    assert_eq!(report["result"]["pattern"], serde_json::json!([0]));
    assert_eq!(report["result"]["statistics"]["termination"], "timed_out");
    assert_eq!(report["result"]["statistics"]["refinements"], 0);
}

#[test]
fn generate_writes_report_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports").join("door.json");
    let out_arg = out.display().to_string();
    let output = plover(&[
        "generate",
        "tasks/door.json",
        "--seed",
        "5",
        "--out",
        &out_arg,
    ]);
    assert_eq!(output.status.code(), Some(0));
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["result"]["pattern"], serde_json::json!([0, 1]));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Report written to"));
}

#[test]
fn generate_reads_options_file() {
    let dir = tempfile::tempdir().unwrap();
    let options = dir.path().join("options.json");
    std::fs::write(&options, r#"{ "blacklist": [1], "random_seed": 0 }"#).unwrap();
    let options_arg = options.display().to_string();
    let output = plover(&[
        "generate",
        "tasks/door.json",
        "--options",
        &options_arg,
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let report = json_stdout(&output);
    assert_eq!(report["result"]["statistics"]["termination"], "blacklisted");
    assert_eq!(report["result"]["pattern"], serde_json::json!([0]));
}

#[test]
fn random_generator_is_selectable() {
    let output = plover(&[
        "generate",
        "tasks/logistics.json",
        "--generator",
        "random",
        "--seed",
        "3",
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(0));
    let report = json_stdout(&output);
    assert_eq!(report["result"]["statistics"]["generator"], "random");
}

#[test]
fn unsolvable_task_is_not_an_error() {
    let output = plover(&["generate", "tasks/locked.json", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));
    let report = json_stdout(&output);
    assert_eq!(report["result"]["statistics"]["termination"], "unsolvable");
}

#[test]
fn bad_inputs_fail_with_nonzero_exit() {
    let missing = plover(&["generate", "tasks/missing.json"]);
    assert_ne!(missing.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Cannot read task file"));

    let bad_generator = plover(&["generate", "tasks/door.json", "--generator", "exhaustive"]);
    assert_ne!(bad_generator.status.code(), Some(0));

    let bad_size = plover(&["generate", "tasks/door.json", "--max-pdb-size", "0"]);
    assert_ne!(bad_size.status.code(), Some(0));

    let bad_seed_var = plover(&["generate", "tasks/door.json", "--seed-variable", "7"]);
    assert_ne!(bad_seed_var.status.code(), Some(0));
}

#[test]
fn inspect_lists_variables() {
    let output = plover(&["inspect", "tasks/logistics.json", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));
    let report = json_stdout(&output);
    assert_eq!(report["num_operators"], 18);
    assert_eq!(report["variables"][0]["name"], "truck");
    assert_eq!(report["goal_variables"], serde_json::json!([1, 2]));
    assert_eq!(report["variables"][1]["predecessors"], serde_json::json!([0]));
}
