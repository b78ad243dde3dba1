//! Sync orchestration
//!
//! Decides what to sync and applies it, with backup protection. The target
//! is never mutated without a fresh verified backup; per-item outcomes are
//! folded into a `SyncResult`, and the ignore-errors setting decides
//! whether the first failure aborts the operation or is accumulated.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::backup::{BackupManager, BackupRecord};
use crate::config::{ItemListMode, Settings};
use crate::error::{VaultSyncError, VaultSyncResult};
use crate::fsutil;
use crate::vault::{VaultManager, CORE_SETTINGS_FILES};

/// Outcome of one sync operation
#[derive(Debug, Default, Serialize)]
pub struct SyncResult {
    /// Whether every selected item synced successfully
    pub success: bool,
    /// Whether this was a dry run (nothing was written)
    pub dry_run: bool,
    /// Item names synced successfully, in sync order
    pub synced: Vec<String>,
    /// Item names that failed
    pub failed: Vec<String>,
    /// Failed item name to error description
    pub errors: BTreeMap<String, String>,
}

impl SyncResult {
    /// Whether at least one item got through
    pub fn any_synced(&self) -> bool {
        !self.synced.is_empty()
    }

    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "Would sync" } else { "Synced" };
        if self.failed.is_empty() {
            format!("{} {} item(s)", verb, self.synced.len())
        } else {
            format!(
                "{} {} item(s), {} failed: {}",
                verb,
                self.synced.len(),
                self.failed.len(),
                self.failed.join(", ")
            )
        }
    }
}

/// Orchestrates sync operations from a source vault to a target vault
pub struct SyncManager {
    source: VaultManager,
    target: VaultManager,
    settings: Settings,
    backups: BackupManager,
}

impl SyncManager {
    /// Create a sync manager for the given vault pair
    pub fn new(source: VaultManager, target: VaultManager, settings: Settings) -> Self {
        let backups = BackupManager::new(&target, settings.backup_dir.clone(), settings.max_backups);
        Self {
            source,
            target,
            settings,
            backups,
        }
    }

    /// The source vault
    pub fn source(&self) -> &VaultManager {
        &self.source
    }

    /// The target vault
    pub fn target(&self) -> &VaultManager {
        &self.target
    }

    /// Synchronize settings from source to target
    ///
    /// An explicit item list, if given, interacts with the category toggles
    /// according to `Settings::item_list_mode`; an explicit empty list
    /// succeeds trivially with nothing synced. With `ignore_errors` off
    /// (the default) the first per-item failure aborts the call; with it on,
    /// failures are collected into the result and `success` reports whether
    /// every item got through.
    pub fn sync_settings(&self, items: Option<&[String]>) -> VaultSyncResult<SyncResult> {
        self.source
            .validate()
            .map_err(|e| side_error("Source", e))?;
        self.target
            .validate()
            .map_err(|e| side_error("Target", e))?;

        let mut result = SyncResult {
            dry_run: self.settings.dry_run,
            ..Default::default()
        };

        // Never mutate the target without a fresh backup
        if !self.settings.dry_run {
            self.backups.create_backup()?;
        }

        let selection = match items {
            Some([]) => {
                result.success = true;
                return Ok(result);
            }
            Some(list) => match self.settings.item_list_mode {
                ItemListMode::Restrict => {
                    let configured = self.configured_items();
                    configured
                        .into_iter()
                        .filter(|item| list.contains(item))
                        .collect()
                }
                ItemListMode::Override => list.to_vec(),
            },
            None => self.configured_items(),
        };

        if !self.settings.dry_run {
            self.target.ensure_settings_dir()?;
        }

        for item in &selection {
            match self.sync_item(item) {
                Ok(()) => result.synced.push(item.clone()),
                Err(e) => {
                    if !self.settings.ignore_errors {
                        return Err(e);
                    }
                    result.errors.insert(item.clone(), e.to_string());
                    result.failed.push(item.clone());
                }
            }
        }

        if !self.settings.dry_run {
            if let Err(e) = self.backups.cleanup_old_backups() {
                warn!("Backup rotation after sync failed: {}", e);
            }
        }

        result.success = result.failed.is_empty();
        Ok(result)
    }

    /// Sync one file or directory by name
    ///
    /// JSON files are parsed before copying; a decode failure aborts the
    /// item without copying anything. Directories are merged into any
    /// existing target subtree, overwriting same-named files.
    fn sync_item(&self, name: &str) -> VaultSyncResult<()> {
        let source_path = self.source.settings_dir().join(name);
        if !source_path.exists() {
            return Err(VaultSyncError::Sync(format!(
                "Source item missing: {}",
                source_path.display()
            )));
        }

        if name.ends_with(".json") {
            self.source.validate_json_file(&source_path)?;
        }

        if self.settings.dry_run {
            debug!("Dry run, would sync {}", name);
            return Ok(());
        }

        let target_path = self.target.settings_dir().join(name);
        if source_path.is_dir() {
            fsutil::copy_dir_recursive(&source_path, &target_path)?;
        } else {
            fsutil::copy_file_preserving(&source_path, &target_path)?;
        }

        Ok(())
    }

    /// Item set from the category toggles, limited to what the source has
    fn configured_items(&self) -> Vec<String> {
        let files = self.source.settings_files();
        let dirs = self.source.settings_dirs();
        let mut items = Vec::new();

        if self.settings.sync_core_settings {
            for name in CORE_SETTINGS_FILES {
                if files.contains(name) {
                    items.push(name.to_string());
                }
            }
        }

        if self.settings.sync_core_plugins {
            for name in ["core-plugins.json", "core-plugins-migration.json"] {
                if files.contains(name) {
                    items.push(name.to_string());
                }
            }
        }

        if self.settings.sync_community_plugins {
            if files.contains("community-plugins.json") {
                items.push("community-plugins.json".to_string());
            }
            if dirs.contains("plugins") {
                items.push("plugins".to_string());
            }
        }

        if self.settings.sync_themes {
            for name in ["themes", "icons"] {
                if dirs.contains(name) {
                    items.push(name.to_string());
                }
            }
        }

        if self.settings.sync_snippets && dirs.contains("snippets") {
            items.push("snippets".to_string());
        }

        items
    }

    /// List the target's backups, newest first
    pub fn list_backups(&self) -> VaultSyncResult<Vec<BackupRecord>> {
        self.backups.list_backups()
    }

    /// Restore the target's settings from a backup
    pub fn restore_backup(&self, path: Option<&Path>) -> VaultSyncResult<BackupRecord> {
        self.backups.restore_backup(path)
    }
}

/// Wrap a vault validation error with the side that failed
fn side_error(side: &str, err: VaultSyncError) -> VaultSyncError {
    match err {
        VaultSyncError::Vault(msg) => VaultSyncError::Vault(format!("{} vault: {}", side, msg)),
        other => other,
    }
}
