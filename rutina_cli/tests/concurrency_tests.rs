//! Concurrency tests for the rutina binary.
//!
//! These tests verify that multiple processes can safely:
//! - Append to the weight log simultaneously (file locking)
//! - Create routines in the same store without losing updates
//! - Read while other processes write

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rutina"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg("ana");
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn run_in_parallel<F>(count: usize, data_dir: &Path, build: F)
where
    F: Fn(usize, &Path) -> Command + Send + Sync + Copy + 'static,
{
    let handles: Vec<_> = (0..count)
        .map(|i| {
            let data_dir: PathBuf = data_dir.to_path_buf();
            thread::spawn(move || {
                let output = build(i, &data_dir).output().expect("run rutina");
                assert!(
                    output.status.success(),
                    "process {} failed: {}",
                    i,
                    String::from_utf8_lossy(&output.stderr)
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }
}

#[test]
fn test_concurrent_weight_logging() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_in_parallel(8, data_dir, |i, dir| {
        let mut cmd = cli(dir);
        cmd.args(["weight", "log", &format!("{}.5", 70 + i), "--date", "2024-01-15"]);
        cmd
    });

    // One intact JSON line per process
    let log_path = data_dir.join("weight_logs.jsonl");
    let content = std::fs::read_to_string(&log_path).expect("Failed to read weight log");
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 8, "Expected 8 entries, got {}", lines.len());
    for line in lines {
        serde_json::from_str::<serde_json::Value>(line).expect("torn line in weight log");
    }
}

#[test]
fn test_concurrent_routine_creation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    run_in_parallel(6, data_dir, |i, dir| {
        let mut cmd = cli(dir);
        cmd.args([
            "routine",
            "new",
            "--name",
            &format!("Rutina {}", i),
            "--exercise",
            "Press banca,Lunes,4,10,60",
        ]);
        cmd
    });

    // Every create survived the read-modify-write cycle
    let content = std::fs::read_to_string(data_dir.join("routines.json")).unwrap();
    let table: serde_json::Value = serde_json::from_str(&content).expect("valid routine file");
    let routines = table["routines"].as_array().expect("routines array");
    assert_eq!(routines.len(), 6);

    for i in 0..6 {
        let name = format!("Rutina {}", i);
        assert!(
            routines.iter().any(|r| r["name"] == name.as_str()),
            "missing {}",
            name
        );
    }
}

#[test]
fn test_reads_during_writes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["weight", "log", "70", "--date", "2024-01-01"])
        .assert()
        .success();

    run_in_parallel(6, data_dir, |i, dir| {
        let mut cmd = cli(dir);
        if i % 2 == 0 {
            cmd.args(["weight", "log", "71", "--date", "2024-01-02"]);
        } else {
            cmd.args(["weight", "list"]);
        }
        cmd
    });

    let content = std::fs::read_to_string(data_dir.join("weight_logs.jsonl")).unwrap();
    assert_eq!(content.lines().count(), 4);
}
