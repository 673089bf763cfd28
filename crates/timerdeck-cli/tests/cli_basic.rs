//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "timerdeck-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn timer_run_counts_down_to_completion() {
    let (stdout, _stderr, code) =
        run_cli(&["timer", "run", "--timer", "egg=0:0:2", "--no-ring"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("egg"));
    assert!(stdout.contains("all timers finished"));
}

#[test]
fn timer_run_rejects_bad_spec() {
    let (_stdout, stderr, code) = run_cli(&["timer", "run", "--timer", "nonsense"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error"));
}

#[test]
fn timer_demo_propagates_between_clients() {
    let (stdout, _stderr, code) = run_cli(&["timer", "demo"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("bob sees new timer: shared kitchen timer"));
    assert!(stdout.contains("bob sees rename: pasta"));
    assert!(stdout.contains("bob's count after delete: 0"));
}

#[test]
fn config_path_prints_location() {
    let (stdout, _stderr, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("config.toml"));
}
