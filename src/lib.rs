//! Fleet Updater - self-updating agent for fleet-managed devices
//!
//! A small daemon that keeps a single executable script on a device in sync
//! with the version published by the fleet's update endpoints. On every tick
//! it reads the locally recorded version, fetches the published version, and
//! when the remote is newer downloads the replacement payload and swaps it in
//! with a backup-then-write protocol so the device never loses its last
//! working executable to a single failed write.
//!
//! # Architecture Overview
//!
//! The update protocol is deliberately simple and lives almost entirely in
//! the [`updater`] module:
//!
//! ```text
//! 1. Read Local Version
//!    └── bootstraps the "1.0.0" baseline record on first run
//!
//! 2. Fetch Remote Version
//!    └── plaintext endpoint, bounded timeout, parse failure is an error
//!
//! 3. Compare
//!    ├── remote <= local: done, nothing is fetched or written
//!    └── remote >  local: download artifact and replace
//!
//! 4. Replace
//!    ├── move live executable to the backup path (rename, not copy)
//!    ├── write new payload, mark it executable
//!    └── on write failure, move the backup back into place
//!
//! 5. Record
//!    └── persist the new version; a failure here is surfaced as an
//!        inconsistency warning and repaired by the next tick
//! ```
//!
//! # Core Modules
//!
//! - [`updater`] - version store, remote sources, atomic replacer, and the
//!   orchestrator that drives one update check
//! - [`version`] - lenient semantic-version parsing and total ordering
//! - [`core`] - typed error taxonomy shared by the updater components
//!
//! # Supporting Modules
//!
//! - [`cli`] - `run` / `check` / `status` / `rollback` subcommands
//! - [`config`] - TOML configuration for endpoints, paths, and intervals
//! - [`constants`] - baseline version, default paths, timeouts
//!
//! # Operational Model
//!
//! One updater process per device. Ticks run strictly sequentially on a
//! fixed delay; no tick failure terminates the loop. The live executable
//! and its backup are the only shared mutable state, and both are owned
//! exclusively by this process, so the protocol needs no locking beyond
//! atomic renames.

// Core functionality modules
pub mod config;
pub mod constants;
pub mod core;
pub mod updater;
pub mod version;

// CLI surface
pub mod cli;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
