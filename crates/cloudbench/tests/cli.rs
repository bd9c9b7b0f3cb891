//! Command-line surface of the cloudbench binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cloudbench() -> Command {
    Command::cargo_bin("cloudbench").unwrap()
}

#[test]
fn test_help_lists_flags() {
    cloudbench()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--out"))
        .stdout(predicate::str::contains("--nodisk"));
}

#[test]
fn test_missing_out_is_usage_error() {
    let dir = tempdir().unwrap();

    cloudbench()
        .current_dir(dir.path())
        .args(["--interval", "1", "--limit", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--out"))
        .stderr(predicate::str::contains("Usage"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_zero_interval_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("bench.csv");

    cloudbench()
        .args(["--interval", "0", "--limit", "1", "--out"])
        .arg(&out)
        .assert()
        .code(2);

    assert!(!out.exists());
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("bench.csv");

    cloudbench()
        .args(["--interval", "1", "--limit", "1", "--out"])
        .arg(&out)
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("settings file not found"));

    assert!(!out.exists());
}

#[test]
fn test_unknown_config_key() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("bench.csv");
    let config = dir.path().join("bench.toml");
    fs::write(&config, "settle_delay = 1\n").unwrap();

    cloudbench()
        .args(["--interval", "1", "--limit", "1", "--out"])
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn test_unwritable_output_directory() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("missing").join("bench.csv");

    cloudbench()
        .args(["--interval", "1", "--limit", "1", "--nodisk", "--out"])
        .arg(&out)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_failing_runs_leave_header_only() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("bench.csv");
    let config = dir.path().join("bench.toml");
    fs::write(
        &config,
        "settle_delay_secs = 0\n\n[network]\ncommand = \"cloudbench-missing-speedtest\"\n",
    )
    .unwrap();

    cloudbench()
        .args(["--interval", "1", "--limit", "1", "--nodisk", "--nocdn", "--out"])
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Benchmark complete!"));

    let content = fs::read_to_string(&out).unwrap();
    assert_eq!(
        content,
        "Time,Ping,Download,Upload,CPU Time,Read IOPS,Write IOPS,IO Ping\n"
    );
}
