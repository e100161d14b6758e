use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use assert_cmd::Command;
use predicates::prelude::*;

fn filetime_fixer() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_filetime-fixer"));
    command
        .env_remove("RUST_LOG")
        .env_remove("FILETIME_FIXER_SIMULATE")
        .env_remove("FILETIME_FIXER_LOG_LEVEL");
    command
}

fn sample_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("b.txt"), b"b").unwrap();
    dir
}

/// A tree holding one file modified long before it was created, or `None`
/// where the filesystem does not record creation times
fn backdated_tree() -> Option<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.txt");
    fs::write(&path, b"old").unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000))
        .unwrap();
    fs::metadata(&path).unwrap().created().ok()?;
    Some((dir, path))
}

fn quoted(path: &Path) -> String {
    format!("{path:?}")
}

#[test]
fn shows_help() {
    filetime_fixer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("filetime-fixer"));
}

#[test]
fn run_without_path_is_a_usage_error() {
    filetime_fixer()
        .args(["run", "--simulate"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn missing_root_fails_before_walking() {
    let dir = tempfile::tempdir().unwrap();
    filetime_fixer()
        .arg("run")
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to access"));
}

#[test]
fn simulated_run_prints_statistics() {
    let dir = sample_tree();
    filetime_fixer()
        .args(["run", "--simulate"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Statistics"))
        .stderr(predicate::str::contains("files examined:       2"))
        .stderr(predicate::str::contains("directories examined: 2"));
}

#[test]
fn statistics_can_be_turned_off() {
    let dir = sample_tree();
    filetime_fixer()
        .args(["run", "--simulate", "--no-statistic"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Statistics").not());
}

#[test]
fn runtime_is_printed_on_request() {
    let dir = sample_tree();
    filetime_fixer()
        .args(["run", "--output-runtime"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("runtime: "));
}

#[test]
fn simulated_run_lists_backdated_file() {
    let Some((dir, path)) = backdated_tree() else {
        return;
    };
    filetime_fixer()
        .args(["run", "--simulate", "--output", "-"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_str().unwrap()))
        .stderr(predicate::str::contains(format!(
            "Would repair file {}",
            quoted(&path)
        )))
        .stderr(predicate::str::contains("files repaired:       1 (simulate)"));
    let metadata = fs::metadata(&path).unwrap();
    assert!(metadata.created().unwrap() > metadata.modified().unwrap());
}

#[cfg(any(windows, target_os = "macos"))]
#[test]
fn live_run_repairs_backdated_file() {
    let Some((dir, path)) = backdated_tree() else {
        return;
    };
    filetime_fixer()
        .args(["run", "--output", "-"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_str().unwrap()))
        .stderr(predicate::str::contains(format!(
            "Repair file {} ... done",
            quoted(&path)
        )))
        .stderr(predicate::str::contains("files repaired:       1"));
    let metadata = fs::metadata(&path).unwrap();
    assert_eq!(metadata.created().unwrap(), metadata.modified().unwrap());
}

#[cfg(not(any(windows, target_os = "macos")))]
#[test]
fn live_run_survives_per_entry_errors() {
    let Some((dir, path)) = backdated_tree() else {
        return;
    };
    filetime_fixer()
        .args(["run", "--output", "-"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(format!(
            "Error failed to set creation time of file {}",
            quoted(&path)
        )))
        .stderr(predicate::str::contains("files examined:       1"))
        .stderr(predicate::str::contains("files repaired:       0"));
}

#[test]
fn several_roots_are_walked() {
    let first = sample_tree();
    let second = sample_tree();
    filetime_fixer()
        .args(["run", "--dry-run"])
        .arg(first.path())
        .arg(second.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("files examined:       4"));
}

#[test]
fn example_config_is_printed() {
    filetime_fixer()
        .arg("example-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate = false"));
}

#[test]
fn validate_prints_layered_config() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "simulate = true\n").unwrap();
    filetime_fixer()
        .arg("validate")
        .arg("--config")
        .arg(&settings)
        .env("FILETIME_FIXER_NO_STATISTIC", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate = true"))
        .stdout(predicate::str::contains("no_statistic = true"));
}

#[test]
fn missing_settings_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    filetime_fixer()
        .arg("validate")
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .assert()
        .failure();
}
