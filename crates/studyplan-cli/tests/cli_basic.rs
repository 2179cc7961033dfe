//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_studyplan"))
        .args(args)
        .env("STUDYPLAN_DATA_DIR", data_dir)
        .env_remove("STUDYPLAN_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

/// JSON printed after a one-line status message.
fn json_after_status(stdout: &str) -> serde_json::Value {
    let body = stdout.split_once('\n').map_or("", |(_, rest)| rest);
    serde_json::from_str(body).expect("Failed to parse JSON output")
}

fn add_subject(data_dir: &Path, name: &str, difficulty: &str, test_date: &str) -> String {
    let out = run_ok(
        data_dir,
        &["subject", "add", name, "--difficulty", difficulty, "--test-date", test_date],
    );
    json_after_status(&out)["id"].as_str().unwrap().to_string()
}

#[test]
fn test_subject_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_subject(dir.path(), "Math", "4", "2026-11-02");

    let list: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["subject", "list"])).unwrap();
    let subjects = list.as_array().unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0]["id"], id.as_str());
    assert_eq!(subjects[0]["test_date"], "2026-11-02");
}

#[test]
fn test_subject_add_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["subject", "add", "Math", "--difficulty", "11", "--test-date", "2026-11-02"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(
        dir.path(),
        &["subject", "add", "Math", "--difficulty", "3", "--test-date", "11/02/2026"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_plan_generate_fills_weekdays() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_subject(dir.path(), "Math", "2", "2026-10-22");

    let summary: serde_json::Value = serde_json::from_str(&run_ok(
        dir.path(),
        &["plan", "generate", "--today", "2026-10-12"],
    ))
    .unwrap();
    assert_eq!(summary["tasks_created"], 3);
    assert_eq!(summary["subjects"][0]["unscheduled_minutes"], 0);

    let tasks: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["task", "list", "--subject", &id])).unwrap();
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().all(|t| t["planned_minutes"] == 120));
    assert_eq!(tasks[0]["date"], "2026-10-12");

    let shown = run_ok(dir.path(), &["plan", "show", "--from", "2026-10-13"]);
    assert!(shown.contains("Generated on 2026-10-12"));
    assert!(!shown.contains("2026-10-12 (Mon)"));
    assert!(shown.contains("2026-10-13 (Tue)"));
}

#[test]
fn test_completed_task_survives_regeneration() {
    let dir = tempfile::tempdir().unwrap();
    add_subject(dir.path(), "Math", "2", "2026-10-22");
    run_ok(dir.path(), &["plan", "generate", "--today", "2026-10-12"]);

    let tasks: serde_json::Value = serde_json::from_str(&run_ok(
        dir.path(),
        &["task", "list", "--date", "2026-10-12"],
    ))
    .unwrap();
    let task_id = tasks[0]["id"].as_str().unwrap().to_string();

    let done: serde_json::Value = serde_json::from_str(&run_ok(
        dir.path(),
        &["task", "complete", &task_id, "--minutes", "180"],
    ))
    .unwrap();
    assert_eq!(done["completed"], true);

    let (code, _, _) = run_cli(dir.path(), &["task", "complete", &task_id, "--minutes", "30"]);
    assert_ne!(code, 0, "a task completes only once");

    run_ok(dir.path(), &["plan", "generate", "--today", "2026-10-13"]);
    let tasks: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["task", "list"])).unwrap();
    let tasks = tasks.as_array().unwrap();
    assert!(tasks.iter().any(|t| t["id"] == task_id.as_str()));
    let new_minutes: u64 = tasks
        .iter()
        .filter(|t| t["completed"] == false)
        .map(|t| t["planned_minutes"].as_u64().unwrap())
        .sum();
    assert_eq!(new_minutes, 180);
}

#[test]
fn test_pinned_task_and_subject_removal() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_subject(dir.path(), "History", "1", "2026-10-20");

    let out = run_ok(dir.path(), &["task", "pin", &id, "2026-10-14", "45"]);
    let pinned = json_after_status(&out);
    assert_eq!(pinned["is_fixed"], true);

    let (code, _, _) = run_cli(dir.path(), &["task", "pin", "missing", "2026-10-14", "45"]);
    assert_ne!(code, 0);

    run_ok(dir.path(), &["subject", "remove", &id]);
    let tasks: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["task", "list"])).unwrap();
    assert!(tasks.as_array().unwrap().is_empty());
}

#[test]
fn test_progress_today_reports_verdict() {
    let dir = tempfile::tempdir().unwrap();
    add_subject(dir.path(), "Math", "2", "2026-10-22");
    run_ok(dir.path(), &["plan", "generate", "--today", "2026-10-12"]);

    let out = run_ok(
        dir.path(),
        &["progress", "today", "--actual-minutes", "30", "--date", "2026-10-12"],
    );
    let progress: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(progress["target_minutes"], 120);
    assert_eq!(progress["diff_minutes"], -90);
    assert_eq!(progress["verdict"], "behind");
    assert!(progress["message"].as_str().unwrap().contains("1h 30m"));

    let totals: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["progress", "subjects"])).unwrap();
    assert_eq!(totals[0]["planned_minutes"], 360);
}

#[test]
fn test_progress_record_moves_shortfall() {
    let dir = tempfile::tempdir().unwrap();
    add_subject(dir.path(), "Math", "2", "2026-10-22");
    run_ok(dir.path(), &["plan", "generate", "--today", "2026-10-12"]);

    let out = run_ok(
        dir.path(),
        &[
            "progress",
            "today",
            "--actual-minutes",
            "30",
            "--date",
            "2026-10-12",
            "--record",
        ],
    );
    let record: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(record["recorded"], true);
    assert_eq!(record["completed"][0]["actual_minutes"], 30);
    assert_eq!(record["summary"]["today"], "2026-10-13");

    let tasks: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["task", "list"])).unwrap();
    let tasks = tasks.as_array().unwrap();
    let done: Vec<_> = tasks.iter().filter(|t| t["completed"] == true).collect();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0]["date"], "2026-10-12");

    // 360 needed, 30 studied: the other 330 now sit after the check-in day.
    let open: Vec<_> = tasks.iter().filter(|t| t["completed"] == false).collect();
    assert!(open.iter().all(|t| t["date"].as_str().unwrap() > "2026-10-12"));
    let open_minutes: u64 = open
        .iter()
        .map(|t| t["planned_minutes"].as_u64().unwrap())
        .sum();
    assert_eq!(open_minutes, 330);
}

#[test]
fn test_config_set_get_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["config", "get", "study.weekday_hours"]).trim(), "2.0");

    run_ok(dir.path(), &["config", "set", "study.weekday_hours", "1.5"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "study.weekday_hours"]).trim(), "1.5");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "study.max_subjects_per_day", "0"]);
    assert_ne!(code, 0);

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "study.nope"]);
    assert_ne!(code, 0);

    run_ok(dir.path(), &["config", "reset"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "study.weekday_hours"]).trim(), "2.0");
}

#[test]
fn test_completions_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["completions", "bash"]);
    assert!(out.contains("studyplan"));
}
