//! Filesystem utilities for vaultsync
//!
//! Recursive copy and size helpers shared by the backup and sync layers.
//! Copies merge into existing target trees, overwriting same-named files.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{VaultSyncError, VaultSyncResult};

/// Recursively copy a directory tree into `dest`
///
/// Merges into any existing `dest` subtree: directories are created as
/// needed, same-named files are overwritten, files present only in `dest`
/// are left alone. Symlinks are not followed.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> VaultSyncResult<()> {
    fs::create_dir_all(dest).map_err(|e| {
        VaultSyncError::Io(format!("Failed to create {}: {}", dest.display(), e))
    })?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            VaultSyncError::Io(format!("Failed to walk {}: {}", src.display(), e))
        })?;
        let rel_path = entry.path().strip_prefix(src).map_err(|e| {
            VaultSyncError::Io(format!("Failed to relativize {}: {}", entry.path().display(), e))
        })?;
        let new_path = dest.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&new_path).map_err(|e| {
                VaultSyncError::Io(format!("Failed to create {}: {}", new_path.display(), e))
            })?;
        } else {
            if let Some(parent) = new_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    VaultSyncError::Io(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
            copy_file_preserving(entry.path(), &new_path)?;
        }
    }

    Ok(())
}

/// Copy one file, carrying over its modification and access times
///
/// `fs::copy` keeps permission bits but resets timestamps; settings files
/// keep their original mtimes so tools comparing them see the source state.
pub fn copy_file_preserving(src: &Path, dest: &Path) -> VaultSyncResult<()> {
    fs::copy(src, dest).map_err(|e| {
        VaultSyncError::Io(format!(
            "Failed to copy {} to {}: {}",
            src.display(),
            dest.display(),
            e
        ))
    })?;

    let metadata = fs::metadata(src).map_err(|e| {
        VaultSyncError::Io(format!("Failed to stat {}: {}", src.display(), e))
    })?;
    let mut times = fs::FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    fs::File::options()
        .write(true)
        .open(dest)
        .and_then(|file| file.set_times(times))
        .map_err(|e| {
            VaultSyncError::Io(format!(
                "Failed to set timestamps on {}: {}",
                dest.display(),
                e
            ))
        })
}

/// Total size in bytes of all files under a directory tree
///
/// Unreadable entries are skipped rather than failing the whole walk; the
/// result feeds informational output only.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Check that a file parses as JSON, with path and position diagnostics
///
/// A missing file is a vacuous pass: absence is not an error at this layer,
/// the caller decides whether absence matters.
pub fn validate_json_file(path: &Path) -> VaultSyncResult<()> {
    if !path.exists() {
        return Ok(());
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VaultSyncError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str::<serde_json::Value>(&contents)
        .map(|_| ())
        .map_err(|e| {
            VaultSyncError::Validation(format!("Invalid JSON in {}: {}", path.display(), e))
        })
}
