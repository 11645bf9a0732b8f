//! The self-update protocol.
//!
//! This module holds the whole of the update core, four components composed
//! by one orchestrator:
//!
//! - [`VersionStore`] - persists the locally installed version identifier,
//!   bootstrapping the `1.0.0` baseline on first run
//! - [`VersionSource`] / [`ArtifactSource`] - seams over the remote
//!   endpoints; [`HttpVersionSource`] and [`HttpArtifactSource`] are the
//!   production implementations
//! - [`AtomicReplacer`] - the backup-then-write-then-restore-on-failure
//!   swap of the live executable
//! - [`UpdateOrchestrator`] - drives one `check_and_update()` tick
//!
//! # Update Process Flow
//!
//! ```text
//! 1. Read Local Version
//!    └── missing record bootstraps to "1.0.0"
//!
//! 2. Fetch Remote Version
//!    └── failure: tick fails, nothing attempted, next tick retries
//!
//! 3. Compare (total order)
//!    └── remote <= local: up to date, no fetch, no writes
//!
//! 4. Fetch Artifact, Replace
//!    ├── backup: live executable renamed to the backup path
//!    ├── write:  new bytes written, marked executable
//!    └── on write failure the backup is renamed back into place
//!
//! 5. Persist New Version
//!    └── failure is reported as a record/binary inconsistency; the next
//!        tick repeats the update
//! ```
//!
//! # Safety Mechanisms
//!
//! The backup is taken with a rename, so it either fully exists or the
//! operation never touched the live executable. After a successful update
//! the backup file is intentionally left on disk for manual forensic
//! recovery. There is no locking: exactly one updater process runs per
//! device, and the brief window where the live path is absent between the
//! backup rename and the write is a documented limitation of the protocol.

pub mod orchestrator;
pub mod remote;
pub mod replacer;
pub mod report;
pub mod store;


pub use orchestrator::{HttpUpdateOrchestrator, UpdateOrchestrator, UpdateOutcome};
pub use remote::{
    ArtifactSource, ExecutableArtifact, HttpArtifactSource, HttpVersionSource, VersionSource,
};
pub use replacer::AtomicReplacer;
pub use report::{CheckOutcome, CheckReport, ReportStore};
pub use store::VersionStore;
