//! `blueprint-reaper` end to end against a temporary database.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn write_config(dir: &Path) -> std::path::PathBuf {
    let config = dir.join("blueprint.toml");
    std::fs::write(
        &config,
        format!(
            "[storage]\ndb_path = {:?}\n\n[content_store]\nroot = {:?}\n",
            dir.join("blueprint.db").display().to_string(),
            dir.join("content").display().to_string(),
        ),
    )
    .unwrap();
    config
}

fn reaper(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blueprint-reaper"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("BLUEPRINT_DB_PATH")
        .env_remove("BLUEPRINT_CONTENT_ROOT")
        .env_remove("BLUEPRINT_SENTINEL_ACCOUNT")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn pending_prints_counts_as_json() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    let output = reaper(&config, &["pending"]);
    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["eligible_artifacts"], 0);
    assert_eq!(report["expired_sessions"], 0);
}

#[test]
fn each_reaper_subcommand_reports_and_records_its_run() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    for (subcommand, reaper_name) in [
        ("sessions", "sessions"),
        ("accounts", "accounts"),
        ("artifacts", "artifacts"),
    ] {
        let output = reaper(&config, &["--now", "2024-06-01T12:00:00Z", subcommand]);
        assert!(output.status.success(), "{subcommand} failed");
        assert_eq!(stdout_json(&output)["reaper"], reaper_name);
    }

    let runs = stdout_json(&reaper(&config, &["runs", "--limit", "10"]));
    assert_eq!(runs.as_array().unwrap().len(), 3);
}

#[test]
fn anonymous_without_sentinel_is_skipped() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    let output = reaper(&config, &["anonymous"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["skipped"], true);
}

#[test]
fn all_prints_one_report_per_reaper() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    let output = reaper(&config, &["all"]);
    assert!(output.status.success());
    let reports = stdout_json(&output);
    let names: Vec<&str> = reports
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["reaper"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["sessions", "accounts", "anonymous", "artifacts"]);
}

#[test]
fn missing_config_file_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let output = reaper(&dir.path().join("absent.toml"), &["pending"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
