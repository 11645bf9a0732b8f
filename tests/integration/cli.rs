//! Binary-level CLI checks. Nothing here reaches the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fleet_updater() -> Command {
    let mut cmd = Command::cargo_bin("fleet-updater").unwrap();
    cmd.env_remove("FLEET_UPDATER_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Write a config pointing every path into `temp`, with no endpoints set.
async fn write_config(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("config.toml");
    let content = format!(
        r#"
script_path = "{dir}/agent.py"
version_file = "{dir}/current_version"
backup_path = "{dir}/agent.py.backup"
report_file = "{dir}/last_check.json"
"#,
        dir = temp.path().display()
    );
    tokio::fs::write(&path, content).await.unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    fleet_updater()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("rollback"));
}

#[test]
fn version_flag_reports_crate_version() {
    fleet_updater()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn status_bootstraps_and_reports_baseline() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp).await;

    fleet_updater()
        .args(["status", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0.0"))
        .stdout(predicate::str::contains("never"));
}

#[tokio::test]
async fn check_requires_provisioned_endpoints() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp).await;

    fleet_updater()
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("version_url is not configured"));
}

#[tokio::test]
async fn rollback_without_backup_fails_cleanly() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp).await;

    fleet_updater()
        .args(["rollback", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rollback failed"));
}

#[tokio::test]
async fn rollback_restores_backup_bytes() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp).await;
    tokio::fs::write(temp.path().join("agent.py"), b"broken")
        .await
        .unwrap();
    tokio::fs::write(temp.path().join("agent.py.backup"), b"last known good")
        .await
        .unwrap();

    fleet_updater()
        .args(["rollback", "--config"])
        .arg(&config)
        .assert()
        .success();

    let live = tokio::fs::read(temp.path().join("agent.py")).await.unwrap();
    assert_eq!(live, b"last known good");
    assert!(!temp.path().join("agent.py.backup").exists());
}
