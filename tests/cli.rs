//! End-to-end tests driving the binary through piped stdin

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn calcrepl(base_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("calcrepl").unwrap();
    cmd.env("CALCULATOR_BASE_DIR", base_dir.path())
        .env("CALCULATOR_AUTO_SAVE", "false")
        .env("CALCULATOR_MAX_HISTORY_SIZE", "100")
        .env_remove("CALCULATOR_HISTORY_DIR")
        .env_remove("CALCULATOR_LOG_DIR")
        .env_remove("CALCULATOR_PRECISION")
        .env_remove("CALCULATOR_MAX_INPUT_VALUE");
    cmd
}

#[test]
fn test_add_history_exit() {
    let temp_dir = TempDir::new().unwrap();
    calcrepl(&temp_dir)
        .write_stdin("add\n1\n1\nhistory\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: 2"))
        .stdout(predicate::str::contains("Calculation History:"))
        .stdout(predicate::str::contains("1. Addition(1, 1) = 2"))
        .stdout(predicate::str::contains("History saved successfully."))
        .stdout(predicate::str::contains("Goodbye!"));

    assert!(temp_dir
        .path()
        .join("history")
        .join("calculator_history.json")
        .exists());
}

#[test]
fn test_end_of_input_exits_without_saving() {
    let temp_dir = TempDir::new().unwrap();
    calcrepl(&temp_dir)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Input terminated. Exiting..."))
        .stdout(predicate::str::contains("Goodbye!").not());

    assert!(!temp_dir
        .path()
        .join("history")
        .join("calculator_history.json")
        .exists());
}

#[test]
fn test_history_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    calcrepl(&temp_dir)
        .write_stdin("divide\n7\n2\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Result: 3.5"));

    calcrepl(&temp_dir)
        .write_stdin("history\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Division(7, 2) = 3.5"));
}

#[test]
fn test_invalid_config_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    calcrepl(&temp_dir)
        .env("CALCULATOR_MAX_HISTORY_SIZE", "lots")
        .write_stdin("exit\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Fatal error:"))
        .stdout(predicate::str::contains("Goodbye!").not());
}

#[test]
fn test_command_line_overrides_environment() {
    let temp_dir = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    calcrepl(&temp_dir)
        .arg("--base-dir")
        .arg(other.path())
        .write_stdin("add\n2\n2\nexit\n")
        .assert()
        .success();

    assert!(other
        .path()
        .join("history")
        .join("calculator_history.json")
        .exists());
    assert!(other.path().join("logs").join("calculator.log").exists());
}
