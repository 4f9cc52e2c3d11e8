#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "0123456789").unwrap();
    fs::create_dir(temp_dir.path().join("sub")).unwrap();
    fs::write(temp_dir.path().join("hello.py"), "echo hello\n").unwrap();
    fs::write(temp_dir.path().join("fail.py"), "echo broken >&2\nexit 3\n").unwrap();
    fs::write(temp_dir.path().join("slow.py"), "sleep 10\n").unwrap();
    temp_dir
}

fn sandgate(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sandgate").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("SANDGATE_TIMEOUT")
        .arg("--root")
        .arg(root.path())
        .arg("--interpreter")
        .arg("/bin/sh");
    cmd
}

#[test]
fn test_ls() {
    let root = workspace();
    sandgate(&root)
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("- a.txt: file_size=10 bytes, is_dir=False"))
        .stdout(predicate::str::contains("- sub: file_size="));
}

#[test]
fn test_ls_outside_root() {
    let root = workspace();
    sandgate(&root)
        .args(["ls", "../.."])
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("Error: Cannot list \"../..\""));
}

#[test]
fn test_ls_json() {
    let root = workspace();
    let output = sandgate(&root).args(["--json", "ls", "sub"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ok"]["listing"], serde_json::json!([]));
}

#[test]
fn test_run() {
    let root = workspace();
    sandgate(&root)
        .args(["run", "hello.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STDOUT: hello"))
        .stdout(predicate::str::contains("Process exited").not());
}

#[test]
fn test_run_non_zero_exit_is_reported() {
    let root = workspace();
    sandgate(&root)
        .args(["run", "fail.py"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Process exited with code 3"))
        .stdout(predicate::str::contains("STDERR: broken"));
}

#[test]
fn test_run_timeout() {
    let root = workspace();
    sandgate(&root)
        .args(["--timeout", "1", "run", "slow.py"])
        .timeout(std::time::Duration::from_secs(8))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Process timed out after 1 seconds"));
}

#[test]
fn test_verbose_reports_interpreter() {
    let root = workspace();
    sandgate(&root)
        .args(["-v", "ls"])
        .assert()
        .success()
        .stderr(predicate::str::contains("gateway ready"))
        .stderr(predicate::str::contains("/bin/sh"));
}

#[test]
fn test_run_rejects_non_script() {
    let root = workspace();
    sandgate(&root)
        .args(["run", "a.txt"])
        .assert()
        .failure()
        .stdout("Error: \"a.txt\" is not a Python file\n");
}

#[test]
fn test_tools() {
    let root = workspace();
    let output = sandgate(&root).arg("tools").output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["name"], "get_files_info");
    assert_eq!(value[1]["name"], "run_python_file");
}

#[test]
fn test_call() {
    let root = workspace();
    sandgate(&root)
        .args(["call", "get_files_info", r#"{"directory": "a.txt"}"#])
        .assert()
        .failure()
        .stdout("Error: \"a.txt\" is not a directory\n");
}

#[test]
fn test_bad_root() {
    let root = workspace();
    Command::cargo_bin("sandgate")
        .unwrap()
        .arg("--root")
        .arg(root.path().join("a.txt"))
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}
