//! Sync CLI command
//!
//! Wires the sync manager to the command line and prints the outcome.

use std::path::Path;

use crate::config::Settings;
use crate::error::VaultSyncResult;
use crate::sync::SyncManager;
use crate::vault::VaultManager;

/// Handle the sync command
pub fn handle_sync_command(
    source: &Path,
    target: &Path,
    items: Option<Vec<String>>,
    settings: &Settings,
    json: bool,
) -> VaultSyncResult<()> {
    let manager = SyncManager::new(
        VaultManager::new(source),
        VaultManager::new(target),
        settings.clone(),
    );

    if json {
        let result = manager.sync_settings(items.as_deref())?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if settings.dry_run {
        println!("Dry run: no files will be written.");
    }
    println!("Syncing settings");
    println!("  from: {}", manager.source().root().display());
    println!("  to:   {}", manager.target().root().display());
    println!();

    let result = manager.sync_settings(items.as_deref())?;

    for item in &result.synced {
        let marker = if result.dry_run { "would sync" } else { "synced" };
        println!("  {} {}", marker, item);
    }
    for item in &result.failed {
        println!("  FAILED {}: {}", item, result.errors[item]);
    }

    println!();
    println!("{}", result.summary());

    Ok(())
}
