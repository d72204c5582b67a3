//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_tomatodo"))
        .args(args)
        .env("TOMATODO_DATA_DIR", data_dir)
        .env_remove("TOMATODO_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

/// Split pretty-printed JSON documents emitted back to back.
fn json_documents(stdout: &str) -> Vec<Value> {
    serde_json::Deserializer::from_str(stdout)
        .into_iter::<Value>()
        .collect::<Result<_, _>>()
        .expect("stdout is a stream of JSON documents")
}

fn last_snapshot(stdout: &str) -> Value {
    let docs = json_documents(stdout);
    let last = docs.last().cloned().expect("at least one document");
    assert_eq!(last["type"], "StateSnapshot");
    last
}

#[test]
fn test_timer_status_fresh() {
    let dir = TempDir::new().unwrap();
    let snapshot = last_snapshot(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(snapshot["mode"], "focus");
    assert_eq!(snapshot["clock"], "25:00");
    assert_eq!(snapshot["is_running"], false);
    assert_eq!(snapshot["cycle_number"], 1);
    assert_eq!(snapshot["motto"], "Stay focused and productive!");
}

#[test]
fn test_timer_toggle_persists() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["timer", "toggle"]);
    assert_eq!(json_documents(&out)[0]["type"], "TimerStarted");

    let snapshot = last_snapshot(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(snapshot["is_running"], true);
}

#[test]
fn test_timer_tick_to_completion() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["timer", "start"]);
    let out = run_cli_success(dir.path(), &["timer", "tick", "--count", "1500"]);

    let docs = json_documents(&out);
    let completions: Vec<_> = docs
        .iter()
        .filter(|d| d["type"] == "TimerCompleted")
        .collect();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0]["to"], "short_break");

    let snapshot = last_snapshot(&out);
    assert_eq!(snapshot["mode"], "short_break");
    assert_eq!(snapshot["remaining_secs"], 300);
    assert_eq!(snapshot["is_running"], false);
    assert_eq!(snapshot["pomodoros_completed"], 1);
    assert_eq!(snapshot["motto"], "Relax and recharge!");
}

#[test]
fn test_tick_while_paused_is_noop() {
    let dir = TempDir::new().unwrap();
    let snapshot = last_snapshot(&run_cli_success(dir.path(), &["timer", "tick", "--count", "5"]));
    assert_eq!(snapshot["remaining_secs"], 1500);
}

#[test]
fn test_corrupt_database_starts_fresh() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tomatodo.db"), [0x5A_u8; 90]).unwrap();

    let snapshot = last_snapshot(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(snapshot["mode"], "focus");
    assert_eq!(snapshot["remaining_secs"], 1500);
    assert_eq!(snapshot["pomodoros_completed"], 0);
    assert!(dir.path().join("tomatodo.db.corrupt").is_file());

    run_cli_success(dir.path(), &["task", "add", "after recovery"]);
    let tasks: Value = serde_json::from_str(&run_cli_success(dir.path(), &["task", "list"])).unwrap();
    assert_eq!(tasks[0]["text"], "after recovery");
}

#[test]
fn test_timer_switch_and_reset() {
    let dir = TempDir::new().unwrap();
    let snapshot = last_snapshot(&run_cli_success(dir.path(), &["timer", "switch", "long-break"]));
    assert_eq!(snapshot["mode"], "long_break");
    assert_eq!(snapshot["clock"], "15:00");

    let snapshot = last_snapshot(&run_cli_success(dir.path(), &["timer", "reset"]));
    assert_eq!(snapshot["mode"], "focus");
    assert_eq!(snapshot["remaining_secs"], 1500);
}

#[test]
fn test_timer_switch_unknown_mode_fails() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["timer", "switch", "nap"]);
    assert_ne!(code, 0);
}

#[test]
fn test_task_lifecycle() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["task", "add", "  write report  "]);
    run_cli_success(dir.path(), &["task", "add", "review"]);

    run_cli_success(dir.path(), &["task", "toggle", "1"]);
    run_cli_success(dir.path(), &["task", "edit", "2", "review PR"]);

    let tasks: Value = serde_json::from_str(&run_cli_success(dir.path(), &["task", "list"])).unwrap();
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["text"], "write report");
    assert_eq!(tasks[0]["completed"], true);
    assert_eq!(tasks[1]["text"], "review PR");

    let id = tasks[1]["id"].as_str().unwrap();
    run_cli_success(dir.path(), &["task", "delete", &id[..8]]);
    let tasks: Value = serde_json::from_str(&run_cli_success(dir.path(), &["task", "list"])).unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

#[test]
fn test_task_add_blank_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let tasks: Value = serde_json::from_str(&run_cli_success(dir.path(), &["task", "list"])).unwrap();
    assert!(tasks.as_array().unwrap().is_empty());
}

#[test]
fn test_task_unknown_reference_is_noop() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["task", "toggle", "9"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("no task matches"));
}

#[test]
fn test_config_set_get() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "alert.bell", "false"]);
    let value = run_cli_success(dir.path(), &["config", "get", "alert.bell"]);
    assert_eq!(value.trim(), "false");

    run_cli_success(dir.path(), &["config", "reset"]);
    let value = run_cli_success(dir.path(), &["config", "get", "alert.bell"]);
    assert_eq!(value.trim(), "true");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_list_is_json() {
    let dir = TempDir::new().unwrap();
    let list: Value = serde_json::from_str(&run_cli_success(dir.path(), &["config", "list"])).unwrap();
    assert_eq!(list["keys"]["toggle"], " ");
    assert_eq!(list["logging"]["level"], "warn");
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["completions", "bash"]);
    assert!(out.contains("tomatodo"));
}
