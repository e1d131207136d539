use std::{fs, path::Path, process::Command};

use asserting::prelude::*;

const ACCESS_LOG: &str = r#"10.0.0.1 - - [10/Oct/2023:13:55:36 -0700] "GET /index.html HTTP/1.1" 200 2326
10.0.0.2 - - [10/Oct/2023:13:55:37 -0700] "POST /login HTTP/1.1" 401 128 "Invalid credentials"
10.0.0.2 - - [10/Oct/2023:13:55:38 -0700] "POST /login HTTP/1.1" 401 128 "Invalid credentials"
this line is garbage
10.0.0.1 - - [10/Oct/2023:13:56:01 -0700] "GET /login HTTP/1.1" 200 512
10.0.0.3 - - [10/Oct/2023:13:56:10 -0700] "GET /index.html HTTP/1.1" 404 0
"#;

const EXPECTED_CSV: &str = "\
Requests per IP
IP Address,Request Count
10.0.0.1,2
10.0.0.2,2
10.0.0.3,1

Most Accessed Endpoint
Endpoint,Access Count
/login,3
/index.html,2

Suspicious Activity
IP Address,Failed Login Count
10.0.0.2,2
10.0.0.1,0
10.0.0.3,0
";

fn auditor(dir: &Path, store: &str, debug: bool) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_log-auditor"));
    cmd.arg("--input")
        .arg(dir.join("access.log"))
        .arg("--database")
        .arg(dir.join("log_analysis.db"))
        .arg("--output")
        .arg(dir.join("results.csv"))
        .args(["--store", store, "--debug", &debug.to_string()]);
    cmd
}

#[test]
fn sqlite_run_writes_csv_report() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("access.log"), ACCESS_LOG).unwrap();

    let status = auditor(dir.path(), "sqlite", false).status().unwrap();
    assert!(status.success());

    let csv = fs::read_to_string(dir.path().join("results.csv")).unwrap();
    assert_that!(csv).is_equal_to(EXPECTED_CSV.to_string());
}

#[test]
fn repeated_runs_do_not_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("access.log"), ACCESS_LOG).unwrap();

    for _ in 0..2 {
        let status = auditor(dir.path(), "sqlite", false).status().unwrap();
        assert!(status.success());
    }

    let csv = fs::read_to_string(dir.path().join("results.csv")).unwrap();
    assert_that!(csv).is_equal_to(EXPECTED_CSV.to_string());
}

#[test]
fn memory_run_matches_sqlite_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("access.log"), ACCESS_LOG).unwrap();

    let status = auditor(dir.path(), "memory", false).status().unwrap();
    assert!(status.success());

    let csv = fs::read_to_string(dir.path().join("results.csv")).unwrap();
    assert_that!(csv).is_equal_to(EXPECTED_CSV.to_string());
    assert!(!dir.path().join("log_analysis.db").exists());
}

#[test]
fn debug_prints_tables_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("access.log"), ACCESS_LOG).unwrap();

    let output = auditor(dir.path(), "sqlite", true).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_that!(lines.len()).is_equal_to(11usize);
    assert_that!(lines[0]).is_equal_to("IP Address\tRequest Count");
    assert_that!(lines[1]).is_equal_to("10.0.0.1  \t2            ");
    assert_that!(lines[4]).is_equal_to("Endpoint   \tAccess Count");
    assert_that!(lines[7]).is_equal_to("IP Address\tFailed Login Count");
}

#[test]
fn missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let output = auditor(dir.path(), "sqlite", false).output().unwrap();
    assert!(!output.status.success());
    assert!(!dir.path().join("results.csv").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to open log file"));
}
