//! Configuration loading behavior.

use fleet_updater::config::UpdaterConfig;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn defaults_use_standard_device_layout() {
    let config = UpdaterConfig::default();

    assert_eq!(config.script_path, PathBuf::from("/var/lib/fleet/agent.py"));
    assert_eq!(
        config.version_file,
        PathBuf::from("/var/lib/fleet/current_version")
    );
    assert_eq!(
        config.backup_path,
        PathBuf::from("/var/lib/fleet/agent.py.backup")
    );
    assert_eq!(config.check_interval(), Duration::from_secs(300));
    assert_eq!(config.http_timeout(), Duration::from_secs(30));

    // Endpoints must be provisioned; there is no usable default.
    assert!(config.version_url.is_empty());
    assert!(config.artifact_url.is_empty());
}

#[tokio::test]
async fn full_config_round_trips_through_toml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    tokio::fs::write(
        &path,
        r#"
version_url = "https://updates.example.com/fleet/agent/version.txt"
artifact_url = "https://updates.example.com/fleet/agent/agent.py"
script_path = "/opt/fleet/agent.py"
version_file = "/opt/fleet/current_version"
backup_path = "/opt/fleet/agent.py.backup"
report_file = "/opt/fleet/last_check.json"
check_interval_secs = 60
http_timeout_secs = 5
"#,
    )
    .await
    .unwrap();

    let config = UpdaterConfig::load_from(&path).await.unwrap();
    assert_eq!(
        config.version_url,
        "https://updates.example.com/fleet/agent/version.txt"
    );
    assert_eq!(config.script_path, PathBuf::from("/opt/fleet/agent.py"));
    assert_eq!(config.check_interval(), Duration::from_secs(60));
    assert_eq!(config.http_timeout(), Duration::from_secs(5));
}

#[tokio::test]
async fn partial_config_falls_back_to_defaults_per_field() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    tokio::fs::write(
        &path,
        r#"
version_url = "https://updates.example.com/v.txt"
check_interval_secs = 900
"#,
    )
    .await
    .unwrap();

    let config = UpdaterConfig::load_from(&path).await.unwrap();
    assert_eq!(config.version_url, "https://updates.example.com/v.txt");
    assert_eq!(config.check_interval(), Duration::from_secs(900));
    // Unset fields keep their defaults.
    assert_eq!(config.script_path, PathBuf::from("/var/lib/fleet/agent.py"));
    assert_eq!(config.http_timeout(), Duration::from_secs(30));
}

#[tokio::test]
async fn missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config =
        UpdaterConfig::load_with_optional(Some(temp.path().join("does-not-exist.toml")))
            .await
            .unwrap();
    assert_eq!(config.check_interval(), Duration::from_secs(300));
}

#[tokio::test]
async fn invalid_toml_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    tokio::fs::write(&path, "version_url = [not toml").await.unwrap();

    assert!(UpdaterConfig::load_from(&path).await.is_err());
}
