//! Manual rollback to the backup executable.

use crate::config::UpdaterConfig;
use crate::updater::AtomicReplacer;
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

/// Arguments for the `rollback` subcommand.
///
/// Moves the backup copy back over the live executable. The version record
/// is left untouched: the backup's version is not tracked, so the record
/// may be ahead of the restored executable until the next check repeats
/// the update.
#[derive(Parser, Debug)]
pub struct RollbackCommand {}

impl RollbackCommand {
    /// Restore the previous executable from the backup copy.
    pub async fn execute(self, config: &UpdaterConfig) -> Result<()> {
        let replacer = AtomicReplacer::new(config.script_path.clone(), config.backup_path.clone());

        replacer
            .restore_backup()
            .await
            .context("Rollback failed")?;

        println!(
            "{} restored previous executable to {}",
            "✓".green(),
            config.script_path.display()
        );
        Ok(())
    }
}
