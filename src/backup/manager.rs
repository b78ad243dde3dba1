//! Backup creation, verification, rotation, and restore
//!
//! The backup/restore state machine for one vault's settings directory.
//! Creation is strict: a snapshot that fails verification against the live
//! tree is deleted and surfaces as an error. Restore is deliberately more
//! permissive about its auxiliary safety backup, since the user explicitly
//! asked to overwrite the live state.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use super::record::{backup_dir_name, parse_backup_name, BackupRecord};
use crate::error::{VaultSyncError, VaultSyncResult};
use crate::fsutil;
use crate::vault::{
    VaultManager, CORE_SETTINGS_FILES, PLUGIN_SETTINGS_FILES, RESOURCE_DIRS, SETTINGS_DIR_NAME,
};

/// Default backup root, as a subdirectory of the vault
const DEFAULT_BACKUP_SUBDIR: &str = ".vaultsync-backups";

/// Manages backup snapshots for one vault's settings directory
pub struct BackupManager {
    /// Live settings directory being protected
    settings_dir: PathBuf,
    /// Directory holding the backup snapshots
    backup_root: PathBuf,
    /// Number of backups to retain
    max_backups: u32,
}

impl BackupManager {
    /// Create a manager for the given vault
    ///
    /// `backup_dir` overrides the default backup root of
    /// `<vault>/.vaultsync-backups`. A configured root may be shared by
    /// several vaults, so each vault gets its own subdirectory under it;
    /// otherwise restoring "latest" on one vault could resolve another
    /// vault's newer snapshot.
    pub fn new(vault: &VaultManager, backup_dir: Option<PathBuf>, max_backups: u32) -> Self {
        let backup_root = match backup_dir {
            Some(root) => root.join(vault_subdir(vault.root())),
            None => vault.root().join(DEFAULT_BACKUP_SUBDIR),
        };
        Self {
            settings_dir: vault.settings_dir(),
            backup_root,
            max_backups,
        }
    }

    /// The backup root directory
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Create a verified backup of the live settings directory
    ///
    /// The new snapshot is verified against the live tree before it counts;
    /// on any copy or verification failure the partial snapshot is removed
    /// and an error returned. On success, backups beyond the retention
    /// limit are evicted oldest-first (eviction failures are logged, never
    /// propagated).
    pub fn create_backup(&self) -> VaultSyncResult<BackupRecord> {
        let record = self.create_snapshot()?;

        if let Err(e) = self.cleanup_old_backups() {
            warn!("Backup rotation failed: {}", e);
        }

        Ok(record)
    }

    /// Copy and verify one snapshot, without rotation
    fn create_snapshot(&self) -> VaultSyncResult<BackupRecord> {
        if !self.settings_dir.is_dir() {
            return Err(VaultSyncError::Backup(format!(
                "Nothing to back up, no settings directory at {}",
                self.settings_dir.display()
            )));
        }

        fs::create_dir_all(&self.backup_root).map_err(|e| {
            VaultSyncError::Backup(format!(
                "Failed to create backup root {}: {}",
                self.backup_root.display(),
                e
            ))
        })?;

        let backup_path = self.next_backup_path();

        if let Err(e) = fsutil::copy_dir_recursive(
            &self.settings_dir,
            &backup_path.join(SETTINGS_DIR_NAME),
        ) {
            remove_dir_best_effort(&backup_path);
            return Err(VaultSyncError::Backup(format!(
                "Failed to copy settings into {}: {}",
                backup_path.display(),
                e
            )));
        }

        if let Err(missing) =
            verify_settings_tree(&self.settings_dir, &backup_path.join(SETTINGS_DIR_NAME))
        {
            remove_dir_best_effort(&backup_path);
            return Err(VaultSyncError::Backup(format!(
                "Backup verification failed for {}, missing: {}",
                backup_path.display(),
                missing.join(", ")
            )));
        }

        debug!("Created backup {}", backup_path.display());
        BackupRecord::from_dir(&backup_path)
    }

    /// Next timestamped path under the backup root
    ///
    /// Same-second collisions get an incrementing counter suffix. The
    /// counter is one past the highest already used for this second, even
    /// if lower ones were freed by eviction, so same-second snapshots
    /// always sort in creation order and a fresh snapshot can never take a
    /// name older than an existing one.
    fn next_backup_path(&self) -> PathBuf {
        let now = Utc::now().timestamp();
        let mut sequence = 0;

        if let Ok(entries) = fs::read_dir(&self.backup_root) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().to_string();
                if let Some((timestamp, seq)) = parse_backup_name(&name) {
                    if timestamp == now && seq >= sequence {
                        sequence = seq + 1;
                    }
                }
            }
        }

        self.backup_root.join(backup_dir_name(now, sequence))
    }

    /// Verify an existing backup against the live settings directory
    pub fn verify_backup(&self, record: &BackupRecord) -> VaultSyncResult<()> {
        verify_settings_tree(&self.settings_dir, &record.settings_dir()).map_err(|missing| {
            VaultSyncError::Backup(format!(
                "Backup {} is missing: {}",
                record.name,
                missing.join(", ")
            ))
        })
    }

    /// List all backups, newest first
    ///
    /// Subdirectories that are not valid backups are skipped with a
    /// warning rather than failing the listing.
    pub fn list_backups(&self) -> VaultSyncResult<Vec<BackupRecord>> {
        if !self.backup_root.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_root).map_err(|e| {
            VaultSyncError::Backup(format!(
                "Failed to read backup root {}: {}",
                self.backup_root.display(),
                e
            ))
        })? {
            let entry = entry.map_err(|e| {
                VaultSyncError::Backup(format!("Failed to read backup entry: {}", e))
            })?;

            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            match BackupRecord::from_dir(&path) {
                Ok(record) => backups.push(record),
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        // Newest first
        backups.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));

        Ok(backups)
    }

    /// The most recent backup, if any
    pub fn latest_backup(&self) -> VaultSyncResult<Option<BackupRecord>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Delete backups beyond the retention limit, oldest first
    ///
    /// A snapshot that cannot be deleted is logged and skipped; a failed
    /// eviction never undoes a successful backup.
    pub fn cleanup_old_backups(&self) -> VaultSyncResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        for backup in backups.into_iter().skip(self.max_backups as usize) {
            match fs::remove_dir_all(&backup.path) {
                Ok(()) => deleted.push(backup.path),
                Err(e) => warn!("Failed to evict backup {}: {}", backup.path.display(), e),
            }
        }

        Ok(deleted)
    }

    /// Restore the settings directory from a backup
    ///
    /// With no explicit path, restores the most recent backup. If the live
    /// settings directory exists, a safety backup of its current state is
    /// taken first; a failure there is logged and restore proceeds, since
    /// the user explicitly asked to restore. On copy or verification
    /// failure an empty settings directory is recreated so the vault is
    /// never left without one, and the error points at the safety backup.
    pub fn restore_backup(&self, explicit: Option<&Path>) -> VaultSyncResult<BackupRecord> {
        let record = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(VaultSyncError::backup_not_found(path.display().to_string()));
                }
                BackupRecord::from_dir(path)?
            }
            None => self.latest_backup()?.ok_or_else(|| {
                VaultSyncError::Backup(format!(
                    "No backup found in {}",
                    self.backup_root.display()
                ))
            })?,
        };

        if self.settings_dir.exists() {
            // Rotation is skipped here so the eviction pass can never
            // delete the backup about to be restored.
            match self.create_snapshot() {
                Ok(safety) => debug!("Safety backup {} taken before restore", safety.name),
                Err(e) => warn!("Could not take safety backup before restore: {}", e),
            }

            fs::remove_dir_all(&self.settings_dir).map_err(|e| {
                VaultSyncError::Backup(format!(
                    "Failed to remove {}: {}",
                    self.settings_dir.display(),
                    e
                ))
            })?;
        }

        if let Err(e) = fsutil::copy_dir_recursive(&record.settings_dir(), &self.settings_dir) {
            self.recover_empty_settings_dir();
            return Err(VaultSyncError::Backup(format!(
                "Restore from {} failed: {}; prior state is in the latest safety backup under {}",
                record.name,
                e,
                self.backup_root.display()
            )));
        }

        // Same check as creation, with the restored backup as the
        // source of truth for what should exist.
        if let Err(missing) = verify_settings_tree(&record.settings_dir(), &self.settings_dir) {
            self.recover_empty_settings_dir();
            return Err(VaultSyncError::Backup(format!(
                "Restored tree from {} failed verification, missing: {}; prior state is in the latest safety backup under {}",
                record.name,
                missing.join(", "),
                self.backup_root.display()
            )));
        }

        Ok(record)
    }

    /// Leave at least an empty settings directory after a failed restore
    fn recover_empty_settings_dir(&self) {
        if let Err(e) = fs::create_dir_all(&self.settings_dir) {
            warn!(
                "Failed to recreate {} after failed restore: {}",
                self.settings_dir.display(),
                e
            );
        }
    }
}

/// Require every recognized entry present in `source` to exist in `candidate`
///
/// Entries absent from the source are not required, so categories the vault
/// never used cannot fail verification. Returns the missing names on
/// failure.
fn verify_settings_tree(source: &Path, candidate: &Path) -> Result<(), Vec<String>> {
    let mut missing = Vec::new();

    for name in CORE_SETTINGS_FILES.iter().chain(PLUGIN_SETTINGS_FILES.iter()) {
        if source.join(name).is_file() && !candidate.join(name).is_file() {
            missing.push(name.to_string());
        }
    }

    for name in RESOURCE_DIRS.iter() {
        if source.join(name).is_dir() && !candidate.join(name).is_dir() {
            missing.push(name.to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Per-vault subdirectory name under a shared backup root
///
/// Derived from the full vault path, not just the directory name, so two
/// vaults both called `notes` never share snapshots.
fn vault_subdir(root: &Path) -> String {
    let mut slug: String = root
        .to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "vault".to_string()
    } else {
        slug.to_string()
    }
}

fn remove_dir_best_effort(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_dir_all(path) {
            warn!("Failed to clean up partial backup {}: {}", path.display(), e);
        }
    }
}
