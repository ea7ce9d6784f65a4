//! Basic CLI E2E tests.
//!
//! Tests invoke the compiled binary with an isolated data directory and
//! verify JSON outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against the given data directory.
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_goaltrack"))
        .env("GOALTRACK_HOME", home)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("CLI did not print valid JSON")
}

#[test]
fn category_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["category", "add", "fitness"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["name"], "fitness");

    let (stdout, _, code) = run_cli(home.path(), &["category", "list"]);
    assert_eq!(code, 0);
    let list = json(&stdout);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn goal_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["goal", "add", "Marathon"]);
    assert_eq!(code, 0);
    let id = json(&stdout)["id"].as_str().unwrap().to_string();

    let (stdout, _, code) = run_cli(home.path(), &["goal", "complete", &id]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["status"], "completed");

    let (_, _, code) = run_cli(home.path(), &["goal", "archive", &id]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["goal", "list"]);
    assert!(json(&stdout).as_array().unwrap().is_empty());
    let (stdout, _, _) = run_cli(home.path(), &["goal", "list", "--archived"]);
    assert_eq!(json(&stdout).as_array().unwrap().len(), 1);
}

#[test]
fn goal_show_unknown_id_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["goal", "show", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn subgoal_progress_completes_at_target() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &["subgoal", "add", "Run", "--target", "30", "--unit", "km"],
    );
    assert_eq!(code, 0);
    let id = json(&stdout)["id"].as_str().unwrap().to_string();

    let (stdout, _, _) = run_cli(home.path(), &["subgoal", "progress", &id, "20"]);
    assert_eq!(json(&stdout)["completed"], false);

    let (stdout, _, _) = run_cli(home.path(), &["subgoal", "progress", &id, "15"]);
    let goal = json(&stdout);
    assert_eq!(goal["completed"], true);
    assert_eq!(goal["current_value"], 35.0);
}

#[test]
fn record_add_is_an_upsert() {
    let home = tempfile::tempdir().unwrap();
    let args = &[
        "record", "add", "--date", "2024-03-05", "--mood", "4", "--energy", "5",
    ];
    let (stdout, _, code) = run_cli(home.path(), args);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["mood"], "good");

    // Second add on the same date updates instead of failing.
    let (stdout, _, code) = run_cli(
        home.path(),
        &["record", "add", "--date", "2024-03-05", "--mood", "2"],
    );
    assert_eq!(code, 0);
    let record = json(&stdout);
    assert_eq!(record["mood"], "bad");
    assert_eq!(record["energy"], "very_high");

    let (stdout, _, _) = run_cli(home.path(), &["record", "list", "--month", "2024-03"]);
    assert_eq!(json(&stdout).as_array().unwrap().len(), 1);
}

#[test]
fn record_log_applies_goal_progress() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, _) = run_cli(
        home.path(),
        &["subgoal", "add", "Read", "--target", "100", "--unit", "pages"],
    );
    let id = json(&stdout)["id"].as_str().unwrap().to_string();

    let (stdout, _, code) = run_cli(
        home.path(),
        &[
            "record", "log", "--date", "2024-03-05", "--goal", &id, "--value", "40",
            "--unit", "pages",
        ],
    );
    assert_eq!(code, 0);
    let record = json(&stdout);
    assert_eq!(record["entries"].as_array().unwrap().len(), 1);

    let (stdout, _, _) = run_cli(home.path(), &["subgoal", "show", &id]);
    assert_eq!(json(&stdout)["current_value"], 40.0);
}

#[test]
fn record_invalid_mood_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["record", "add", "--mood", "9"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid mood"));
}

#[test]
fn timer_status_starts_idle() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot = json(&stdout);
    assert_eq!(snapshot["state"], "idle");
    assert_eq!(snapshot["kind"], "pomodoro");
}

#[test]
fn timer_start_pause_reset() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &["timer", "start", "--mode", "custom", "--duration", "25"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "timer_started");

    let (stdout, _, code) = run_cli(home.path(), &["timer", "pause"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "timer_paused");

    let (stdout, _, code) = run_cli(home.path(), &["timer", "reset"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "timer_reset");

    let (stdout, _, _) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(json(&stdout)["state"], "idle");
}

#[test]
fn timer_custom_requires_duration() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["timer", "start", "--mode", "custom"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--duration"));
}

#[test]
fn timer_stop_records_session() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["timer", "start", "--mode", "stopwatch"]);
    assert_eq!(code, 0);

    std::thread::sleep(std::time::Duration::from_secs(2));
    let (stdout, _, code) = run_cli(home.path(), &["timer", "stop"]);
    assert_eq!(code, 0);
    let record = json(&stdout);
    assert_eq!(record["kind"], "stopwatch");
    assert!(record["duration_secs"].as_u64().unwrap() >= 1);
}

#[test]
fn stats_month_on_empty_data() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["stats", "month", "2024-03"]);
    assert_eq!(code, 0);
    let stats = json(&stdout);
    assert_eq!(stats["year"], 2024);
    assert_eq!(stats["month"], 3);
    assert_eq!(stats["total_records"], 0);
    assert_eq!(stats["productivity_score"], 0);
}

#[test]
fn stats_month_reflects_records() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        home.path(),
        &["record", "add", "--date", "2024-03-05", "--mood", "4", "--energy", "4"],
    );
    assert_eq!(code, 0);

    let (stdout, _, _) = run_cli(home.path(), &["stats", "month", "2024-03"]);
    let stats = json(&stdout);
    assert_eq!(stats["total_records"], 1);
    assert_eq!(stats["average_mood"], 4.0);
    assert!(stats["productivity_score"].as_u64().unwrap() > 0);
}

#[test]
fn stats_export_includes_everything() {
    let home = tempfile::tempdir().unwrap();
    let _ = run_cli(home.path(), &["category", "add", "fitness"]);
    let _ = run_cli(home.path(), &["goal", "add", "Marathon"]);

    let (stdout, _, code) = run_cli(home.path(), &["stats", "export"]);
    assert_eq!(code, 0);
    let export = json(&stdout);
    assert_eq!(export["categories"].as_array().unwrap().len(), 1);
    assert_eq!(export["big_goals"].as_array().unwrap().len(), 1);
    assert!(export["exported_at"].is_string());
}

#[test]
fn config_get_set_list() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timer.work_min"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "timer.work_min", "50"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "timer.work_min"]);
    assert_eq!(stdout.trim(), "50");

    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["timer"]["work_min"], 50);
}

#[test]
fn config_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn completions_generate() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("goaltrack"));
}
