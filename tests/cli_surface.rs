//! Smoke tests for the binary's command surface
//!
//! Runs the compiled `infoflow` binary against a temporary session file,
//! checking argument parsing and the non-interactive session commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn infoflow(sessions_file: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("infoflow").expect("binary built");
    cmd.env("INFOFLOW_SESSIONS_FILE", sessions_file);
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("infoflow")
        .expect("binary built")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("sessions"));
}

#[test]
fn test_sessions_list_on_empty_store() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("chat_sessions.json");

    infoflow(&file)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recent sessions"));
}

#[test]
fn test_sessions_rename_unknown_session_fails() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("chat_sessions.json");

    infoflow(&file)
        .args(["sessions", "rename", "missing", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn test_sessions_clear_yes_on_empty_store() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("chat_sessions.json");

    infoflow(&file)
        .args(["sessions", "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions to delete"));
}

#[test]
fn test_listing_reflects_a_seeded_store() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("chat_sessions.json");

    let today = chrono::Local::now().date_naive();
    let blob = serde_json::json!({
        "morning standup": {
            "date": today.to_string(),
            "messages": [
                {"role": "user", "content": "hello"},
                {"role": "assistant", "content": "hi"}
            ]
        }
    });
    std::fs::write(&file, serde_json::to_string_pretty(&blob).unwrap()).unwrap();

    infoflow(&file)
        .args(["sessions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Today"))
        .stdout(predicate::str::contains("morning standup"));

    // Case-insensitive filtering
    infoflow(&file)
        .args(["sessions", "list", "--query", "STANDUP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("morning standup"));

    infoflow(&file)
        .args(["sessions", "list", "--query", "nothing like this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions matching"));
}
