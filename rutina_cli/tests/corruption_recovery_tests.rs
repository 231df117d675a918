//! Corruption recovery tests for the rutina binary.
//!
//! These tests verify the system can handle:
//! - A corrupted routine store
//! - Corrupted lines in the weight log
//! - Missing files

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use std::path::Path;
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

#[test]
fn test_corrupted_routine_store_reads_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let store_path = data_dir.join("routines.json");
    fs::write(&store_path, "{ invalid json }}}}").expect("Failed to write corrupted store");

    cli(data_dir)
        .args(["routine", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tienes rutinas"));
}

#[test]
fn test_corrupted_routine_store_is_not_overwritten() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let store_path = data_dir.join("routines.json");
    fs::write(&store_path, "{ invalid json }}}}").unwrap();

    cli(data_dir)
        .args(["routine", "new", "--name", "Fuerza", "--exercise", "Press banca,Lunes,4,10,60"])
        .assert()
        .failure();

    // The damaged file is left for the user to repair
    assert_eq!(fs::read_to_string(&store_path).unwrap(), "{ invalid json }}}}");
}

#[test]
fn test_corrupted_weight_lines_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["weight", "log", "70", "--date", "2024-01-01"])
        .assert()
        .success();

    // Partial write followed by garbage
    let log_path = data_dir.join("weight_logs.jsonl");
    let mut file = fs::OpenOptions::new().append(true).open(&log_path).unwrap();
    writeln!(file, "{{\"id\": \"truncated").unwrap();
    writeln!(file, "not json at all").unwrap();
    drop(file);

    cli(data_dir)
        .args(["weight", "log", "69", "--date", "2024-02-01"])
        .assert()
        .success();

    cli(data_dir)
        .args(["weight", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/1/2024"))
        .stdout(predicate::str::contains("1/2/2024"))
        .stdout(predicate::str::contains("-1.0kg"));
}

#[test]
fn test_missing_data_dir_created_on_write() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("nested").join("data");

    cli(&data_dir)
        .args(["weight", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No hay registros de peso"));

    cli(&data_dir)
        .args(["routine", "new", "--name", "Fuerza", "--exercise", "Press banca,Lunes,4,10,60"])
        .assert()
        .success();

    assert!(data_dir.join("routines.json").exists());
}

#[test]
fn test_unknown_routine_id() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["routine", "show", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid routine id"));

    cli(temp_dir.path())
        .args(["routine", "show", "00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure();
}
