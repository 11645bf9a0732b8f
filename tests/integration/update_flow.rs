//! End-to-end scenarios for the update orchestrator.

use fleet_updater::core::UpdateError;
use fleet_updater::test_utils::{
    FailingArtifactSource, FailingVersionSource, StaticArtifactSource, StaticVersionSource,
    init_test_logging,
};
use fleet_updater::updater::{
    AtomicReplacer, CheckOutcome, CheckReport, ReportStore, UpdateOrchestrator, UpdateOutcome,
    VersionStore,
};
use fleet_updater::version::Version;
use std::path::Path;
use tempfile::TempDir;

struct Device {
    temp: TempDir,
}

impl Device {
    fn new() -> Self {
        init_test_logging();
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn version_file(&self) -> std::path::PathBuf {
        self.temp.path().join("current_version")
    }

    fn live(&self) -> std::path::PathBuf {
        self.temp.path().join("agent.py")
    }

    fn backup(&self) -> std::path::PathBuf {
        self.temp.path().join("agent.py.backup")
    }

    fn store(&self) -> VersionStore {
        VersionStore::new(self.version_file())
    }

    fn replacer(&self) -> AtomicReplacer {
        AtomicReplacer::new(self.live(), self.backup())
    }

    async fn seed(&self, version: &str, live_bytes: &[u8]) {
        tokio::fs::write(self.version_file(), version).await.unwrap();
        tokio::fs::write(self.live(), live_bytes).await.unwrap();
    }
}

async fn read(path: &Path) -> Vec<u8> {
    tokio::fs::read(path).await.unwrap()
}

#[tokio::test]
async fn newer_remote_version_is_installed() {
    let device = Device::new();
    device.seed("1.0.0", b"old payload").await;

    let artifacts = StaticArtifactSource::new(b"new payload".to_vec());
    let orchestrator = UpdateOrchestrator::new(
        device.store(),
        StaticVersionSource::new(Version::new(1, 0, 1)),
        artifacts.clone(),
        device.replacer(),
    );

    let outcome = orchestrator.check_and_update().await.unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            from: Version::new(1, 0, 0),
            to: Version::new(1, 0, 1),
        }
    );

    assert_eq!(device.store().read().await.unwrap(), Version::new(1, 0, 1));
    assert_eq!(read(&device.live()).await, b"new payload");
    assert_eq!(read(&device.backup()).await, b"old payload");
    assert_eq!(artifacts.fetches(), 1);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = tokio::fs::metadata(device.live())
            .await
            .unwrap()
            .permissions()
            .mode();
        assert_ne!(mode & 0o111, 0, "live executable must be executable");
    }
}

#[tokio::test]
async fn equal_remote_version_is_a_no_op() {
    let device = Device::new();
    device.seed("1.2.0", b"payload").await;

    let artifacts = StaticArtifactSource::new(b"never fetched".to_vec());
    let orchestrator = UpdateOrchestrator::new(
        device.store(),
        StaticVersionSource::new(Version::new(1, 2, 0)),
        artifacts.clone(),
        device.replacer(),
    );

    let outcome = orchestrator.check_and_update().await.unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::UpToDate {
            current: Version::new(1, 2, 0)
        }
    );

    // No artifact fetch, no filesystem mutation.
    assert_eq!(artifacts.fetches(), 0);
    assert_eq!(read(&device.live()).await, b"payload");
    assert!(!device.backup().exists());
    assert_eq!(
        tokio::fs::read_to_string(device.version_file()).await.unwrap(),
        "1.2.0"
    );
}

#[tokio::test]
async fn older_remote_version_is_a_no_op() {
    let device = Device::new();
    device.seed("2.0.0", b"payload").await;

    let artifacts = StaticArtifactSource::new(b"never fetched".to_vec());
    let orchestrator = UpdateOrchestrator::new(
        device.store(),
        StaticVersionSource::new(Version::new(1, 99, 99)),
        artifacts.clone(),
        device.replacer(),
    );

    let outcome = orchestrator.check_and_update().await.unwrap();
    assert!(matches!(outcome, UpdateOutcome::UpToDate { .. }));
    assert_eq!(artifacts.fetches(), 0);
}

#[tokio::test]
async fn failed_version_fetch_leaves_device_untouched() {
    let device = Device::new();
    device.seed("1.0.0", b"payload").await;

    let artifacts = StaticArtifactSource::new(b"never fetched".to_vec());
    let orchestrator = UpdateOrchestrator::new(
        device.store(),
        FailingVersionSource,
        artifacts.clone(),
        device.replacer(),
    );

    let err = orchestrator.check_and_update().await.unwrap_err();
    assert!(matches!(err, UpdateError::FetchVersion(_)));
    assert!(!err.is_fatal());

    assert_eq!(artifacts.fetches(), 0);
    assert_eq!(device.store().read().await.unwrap(), Version::new(1, 0, 0));
    assert_eq!(read(&device.live()).await, b"payload");
    assert!(!device.backup().exists());
}

#[tokio::test]
async fn failed_artifact_fetch_leaves_device_untouched() {
    let device = Device::new();
    device.seed("1.0.0", b"payload").await;

    let artifacts = FailingArtifactSource::new();
    let orchestrator = UpdateOrchestrator::new(
        device.store(),
        StaticVersionSource::new(Version::new(1, 1, 0)),
        artifacts.clone(),
        device.replacer(),
    );

    let err = orchestrator.check_and_update().await.unwrap_err();
    assert!(matches!(err, UpdateError::FetchArtifact(_)));
    assert_eq!(artifacts.fetches(), 1);

    assert_eq!(device.store().read().await.unwrap(), Version::new(1, 0, 0));
    assert_eq!(read(&device.live()).await, b"payload");
    assert!(!device.backup().exists());
}

#[tokio::test]
async fn record_failure_after_replace_is_reported_as_lag() {
    let device = Device::new();
    device.seed("1.0.0", b"old payload").await;

    // Block the record's staging path so persisting the new version fails
    // after the executable has already been swapped.
    tokio::fs::create_dir(device.version_file().with_extension("tmp"))
        .await
        .unwrap();

    let orchestrator = UpdateOrchestrator::new(
        device.store(),
        StaticVersionSource::new(Version::new(1, 1, 0)),
        StaticArtifactSource::new(b"new payload".to_vec()),
        device.replacer(),
    );

    let err = orchestrator.check_and_update().await.unwrap_err();
    assert!(matches!(err, UpdateError::RecordLag { .. }));
    assert!(!err.is_fatal());

    // Binary updated, record stale: the next tick re-detects and repeats.
    assert_eq!(read(&device.live()).await, b"new payload");
    assert_eq!(read(&device.backup()).await, b"old payload");
    assert_eq!(device.store().read().await.unwrap(), Version::new(1, 0, 0));
}

#[cfg(unix)]
#[tokio::test]
async fn restored_write_failure_keeps_version_record() {
    let device = Device::new();
    tokio::fs::write(device.version_file(), "1.0.0").await.unwrap();
    // Dangling symlink: the write phase fails, and the pre-existing backup
    // is moved back into place.
    std::os::unix::fs::symlink(device.temp.path().join("gone/target"), device.live()).unwrap();
    tokio::fs::write(device.backup(), b"last known good").await.unwrap();

    let orchestrator = UpdateOrchestrator::new(
        device.store(),
        StaticVersionSource::new(Version::new(1, 1, 0)),
        StaticArtifactSource::new(b"new payload".to_vec()),
        device.replacer(),
    );

    let err = orchestrator.check_and_update().await.unwrap_err();
    assert!(matches!(
        err,
        UpdateError::Replace(fleet_updater::core::ReplaceError::WriteFailedRestored { .. })
    ));
    assert!(!err.is_fatal());

    // Old version still recorded, restored executable in place.
    assert_eq!(device.store().read().await.unwrap(), Version::new(1, 0, 0));
    assert_eq!(read(&device.live()).await, b"last known good");
}

#[tokio::test]
async fn first_run_bootstraps_baseline_record() {
    let device = Device::new();
    // No version record, no live executable: factory-fresh device already
    // on the baseline release.
    let orchestrator = UpdateOrchestrator::new(
        device.store(),
        StaticVersionSource::new(Version::new(1, 0, 0)),
        StaticArtifactSource::new(b"never fetched".to_vec()),
        device.replacer(),
    );

    let outcome = orchestrator.check_and_update().await.unwrap();
    assert!(matches!(outcome, UpdateOutcome::UpToDate { .. }));
    assert_eq!(
        tokio::fs::read_to_string(device.version_file()).await.unwrap(),
        "1.0.0"
    );
}

#[tokio::test]
async fn check_report_reflects_each_outcome() {
    let device = Device::new();
    let reports = ReportStore::new(device.temp.path().join("last_check.json"));

    let updated: Result<UpdateOutcome, UpdateError> = Ok(UpdateOutcome::Updated {
        from: Version::new(1, 0, 0),
        to: Version::new(1, 1, 0),
    });
    let report = CheckReport::from_result(&updated);
    assert_eq!(report.outcome, CheckOutcome::Updated);
    assert_eq!(report.installed.as_deref(), Some("1.1.0"));
    assert_eq!(report.previous.as_deref(), Some("1.0.0"));

    reports.save(&report).await.unwrap();
    let loaded = reports.load().await.unwrap().unwrap();
    assert_eq!(loaded.outcome, CheckOutcome::Updated);
    assert_eq!(loaded.installed.as_deref(), Some("1.1.0"));

    let failed: Result<UpdateOutcome, UpdateError> = Err(UpdateError::FetchVersion(
        fleet_updater::core::FetchError::Status {
            url: "http://fleet.test/version.txt".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        },
    ));
    let report = CheckReport::from_result(&failed);
    assert_eq!(report.outcome, CheckOutcome::Failed);
    assert!(report.error.as_deref().unwrap().contains("502"));

    reports.save(&report).await.unwrap();
    let loaded = reports.load().await.unwrap().unwrap();
    assert_eq!(loaded.outcome, CheckOutcome::Failed);
}

#[tokio::test]
async fn missing_report_loads_as_none() {
    let device = Device::new();
    let reports = ReportStore::new(device.temp.path().join("last_check.json"));
    assert!(reports.load().await.unwrap().is_none());
}
