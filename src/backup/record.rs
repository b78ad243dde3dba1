//! Backup snapshot metadata
//!
//! A `BackupRecord` is derived entirely from an on-disk backup directory;
//! nothing is stored separately, so the listing can never disagree with the
//! filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::{VaultSyncError, VaultSyncResult};
use crate::fsutil;
use crate::vault::SETTINGS_DIR_NAME;

/// Prefix of every backup directory name
pub(crate) const BACKUP_DIR_PREFIX: &str = "backup_";

/// Metadata about one backup snapshot
#[derive(Debug, Clone, Serialize)]
pub struct BackupRecord {
    /// Backup directory name
    pub name: String,
    /// Full path to the backup directory
    pub path: PathBuf,
    /// Creation time in epoch seconds (parsed from the name, mtime fallback)
    pub timestamp: i64,
    /// Same-second disambiguation counter from the name suffix
    pub sequence: u32,
    /// Number of JSON settings files in the snapshot
    pub settings_file_count: usize,
    /// Whether the snapshot contains a plugins directory
    pub has_plugins: bool,
    /// Whether the snapshot contains a themes directory
    pub has_themes: bool,
    /// Whether the snapshot contains an icons directory
    pub has_icons: bool,
    /// Total size of the snapshot in bytes
    pub size_bytes: u64,
}

impl BackupRecord {
    /// Build a record from a backup directory
    ///
    /// Fails if the directory does not hold a settings subtree; callers
    /// listing a backup root skip such entries with a warning.
    pub fn from_dir(path: &Path) -> VaultSyncResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                VaultSyncError::Backup(format!("Invalid backup path: {}", path.display()))
            })?;

        let settings_dir = path.join(SETTINGS_DIR_NAME);
        if !settings_dir.is_dir() {
            return Err(VaultSyncError::Backup(format!(
                "Invalid backup format, no {} subtree in {}",
                SETTINGS_DIR_NAME,
                path.display()
            )));
        }

        let (timestamp, sequence) = match parse_backup_name(&name) {
            Some(parsed) => parsed,
            None => (mtime_epoch_seconds(path), 0),
        };

        let mut settings_file_count = 0;
        if let Ok(entries) = fs::read_dir(&settings_dir) {
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && p.extension().map_or(false, |ext| ext == "json") {
                    settings_file_count += 1;
                }
            }
        }

        Ok(Self {
            name,
            timestamp,
            sequence,
            settings_file_count,
            has_plugins: settings_dir.join("plugins").is_dir(),
            has_themes: settings_dir.join("themes").is_dir(),
            has_icons: settings_dir.join("icons").is_dir(),
            size_bytes: fsutil::dir_size(path),
            path: path.to_path_buf(),
        })
    }

    /// Path to the settings subtree inside the backup
    pub fn settings_dir(&self) -> PathBuf {
        self.path.join(SETTINGS_DIR_NAME)
    }

    /// Creation time as a UTC datetime
    pub fn created_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.timestamp, 0)
            .single()
            .unwrap_or_default()
    }

    /// Ordering key: newer backups sort after older ones
    pub fn sort_key(&self) -> (i64, u32) {
        (self.timestamp, self.sequence)
    }
}

/// Compose a backup directory name from epoch seconds and a counter
///
/// Seconds are zero-padded to ten digits so lexicographic order matches
/// chronological order; the counter suffix appears only for same-second
/// collisions.
pub(crate) fn backup_dir_name(epoch_seconds: i64, sequence: u32) -> String {
    if sequence == 0 {
        format!("{}{:010}", BACKUP_DIR_PREFIX, epoch_seconds)
    } else {
        format!("{}{:010}_{}", BACKUP_DIR_PREFIX, epoch_seconds, sequence)
    }
}

/// Parse `backup_<epoch>[_<n>]` into (epoch seconds, counter)
pub(crate) fn parse_backup_name(name: &str) -> Option<(i64, u32)> {
    let rest = name.strip_prefix(BACKUP_DIR_PREFIX)?;
    let mut parts = rest.split('_');
    let timestamp: i64 = parts.next()?.parse().ok()?;
    let sequence: u32 = match parts.next() {
        Some(seq) => seq.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((timestamp, sequence))
}

/// Filesystem mtime in epoch seconds, for backups with unparseable names
fn mtime_epoch_seconds(path: &Path) -> i64 {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_backup_dir(base: &Path, name: &str) -> PathBuf {
        let dir = base.join(name);
        fs::create_dir_all(dir.join(SETTINGS_DIR_NAME)).unwrap();
        fs::write(dir.join(SETTINGS_DIR_NAME).join("app.json"), "{}").unwrap();
        dir
    }

    #[test]
    fn test_parse_backup_name() {
        assert_eq!(parse_backup_name("backup_0001700000000"), Some((1700000000, 0)));
        assert_eq!(
            parse_backup_name("backup_0001700000000_2"),
            Some((1700000000, 2))
        );
        assert_eq!(parse_backup_name("snapshot_123"), None);
        assert_eq!(parse_backup_name("backup_notanumber"), None);
    }

    #[test]
    fn test_name_round_trip() {
        let name = backup_dir_name(1700000000, 0);
        assert_eq!(name, "backup_1700000000");
        assert_eq!(parse_backup_name(&name), Some((1700000000, 0)));

        let name = backup_dir_name(1700000000, 3);
        assert_eq!(parse_backup_name(&name), Some((1700000000, 3)));
    }

    #[test]
    fn test_lexicographic_order_matches_chronological() {
        let older = backup_dir_name(999, 0);
        let newer = backup_dir_name(1700000000, 0);
        assert!(older < newer);
    }

    #[test]
    fn test_from_dir() {
        let temp = TempDir::new().unwrap();
        let dir = make_backup_dir(temp.path(), &backup_dir_name(1700000000, 0));
        fs::create_dir(dir.join(SETTINGS_DIR_NAME).join("plugins")).unwrap();

        let record = BackupRecord::from_dir(&dir).unwrap();
        assert_eq!(record.timestamp, 1700000000);
        assert_eq!(record.sequence, 0);
        assert_eq!(record.settings_file_count, 1);
        assert!(record.has_plugins);
        assert!(!record.has_themes);
        assert!(record.size_bytes > 0);
    }

    #[test]
    fn test_from_dir_missing_settings_subtree() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("backup_0001700000000");
        fs::create_dir(&dir).unwrap();

        let err = BackupRecord::from_dir(&dir).unwrap_err();
        assert!(matches!(err, VaultSyncError::Backup(_)));
    }

    #[test]
    fn test_from_dir_unparseable_name_uses_mtime() {
        let temp = TempDir::new().unwrap();
        let dir = make_backup_dir(temp.path(), "old-style-backup");

        let record = BackupRecord::from_dir(&dir).unwrap();
        assert!(record.timestamp > 0);
    }
}
