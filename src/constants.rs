//! Global constants used throughout the fleet-updater codebase.
//!
//! This module contains timeout durations, default filesystem locations, and
//! other values used across multiple modules. Defining them centrally keeps
//! magic numbers discoverable and the defaults in one place.

use semver::Version;
use std::time::Duration;

/// Version recorded on first run when no version record exists yet.
///
/// Devices are imaged with the baseline release of the managed script, so an
/// absent record means "1.0.0", not "unknown".
pub fn baseline_version() -> Version {
    Version::new(1, 0, 0)
}

/// Delay between update checks (5 minutes).
///
/// Long enough to keep the update endpoints quiet across a large fleet,
/// short enough that a published fix reaches every device within minutes.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(300);

/// Timeout applied to every HTTP request (30 seconds).
///
/// Fleet devices are frequently on flaky links; a hung fetch must not stall
/// the tick loop indefinitely.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Permission mode applied to the live executable after a write (rwxr-xr-x).
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Default location of the updater configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/fleet-updater/config.toml";

/// Default directory for the managed script and updater state files.
pub const DEFAULT_STATE_DIR: &str = "/var/lib/fleet";
