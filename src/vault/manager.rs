//! Vault validation and settings enumeration
//!
//! Answers structural questions about a single vault: is it well-formed,
//! which settings files and resource directories does it have. The only
//! mutation this layer performs is settings-directory creation during sync,
//! invoked by the sync manager.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{VaultSyncError, VaultSyncResult};
use crate::fsutil;

/// Fixed name of the settings subdirectory inside a vault
pub const SETTINGS_DIR_NAME: &str = ".obsidian";

/// Core settings files (flat JSON directly under the settings directory)
pub const CORE_SETTINGS_FILES: [&str; 5] = [
    "app.json",
    "appearance.json",
    "hotkeys.json",
    "types.json",
    "templates.json",
];

/// Plugin settings files
pub const PLUGIN_SETTINGS_FILES: [&str; 3] = [
    "core-plugins.json",
    "community-plugins.json",
    "core-plugins-migration.json",
];

/// Resource directories (recursively copied subtrees)
pub const RESOURCE_DIRS: [&str; 4] = ["plugins", "themes", "snippets", "icons"];

/// Structural validation and enumeration for one vault
#[derive(Debug, Clone)]
pub struct VaultManager {
    /// Resolved vault root path
    root: PathBuf,
}

impl VaultManager {
    /// Create a manager for the vault at `root`
    ///
    /// The path is canonicalized when possible so two spellings of the same
    /// vault compare equal; a not-yet-existing path is kept as given and
    /// reported by `validate`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = fs::canonicalize(&root).unwrap_or(root);
        Self { root }
    }

    /// The vault root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the settings subdirectory
    pub fn settings_dir(&self) -> PathBuf {
        self.root.join(SETTINGS_DIR_NAME)
    }

    /// Validate that this is a well-formed vault
    ///
    /// Fails if the root does not exist, the settings subdirectory does not
    /// exist, or no recognized settings file is present.
    pub fn validate(&self) -> VaultSyncResult<()> {
        if !self.root.is_dir() {
            return Err(VaultSyncError::Vault(format!(
                "Vault root does not exist: {}",
                self.root.display()
            )));
        }

        let settings_dir = self.settings_dir();
        if !settings_dir.is_dir() {
            return Err(VaultSyncError::Vault(format!(
                "No {} directory in {}",
                SETTINGS_DIR_NAME,
                self.root.display()
            )));
        }

        let files = self.settings_files();
        let recognized = CORE_SETTINGS_FILES
            .iter()
            .chain(PLUGIN_SETTINGS_FILES.iter())
            .any(|name| files.contains(*name));
        if !recognized {
            return Err(VaultSyncError::Vault(format!(
                "No recognized settings files in {}",
                settings_dir.display()
            )));
        }

        Ok(())
    }

    /// Whether this directory passes vault validation
    pub fn is_vault(&self) -> bool {
        self.validate().is_ok()
    }

    /// Names of `*.json` files directly under the settings directory
    ///
    /// Returns an empty set if the settings directory is absent.
    pub fn settings_files(&self) -> BTreeSet<String> {
        let mut files = BTreeSet::new();
        let entries = match fs::read_dir(self.settings_dir()) {
            Ok(entries) => entries,
            Err(_) => return files,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                if let Some(name) = path.file_name() {
                    files.insert(name.to_string_lossy().to_string());
                }
            }
        }

        files
    }

    /// Names of non-hidden subdirectories directly under the settings directory
    pub fn settings_dirs(&self) -> BTreeSet<String> {
        let mut dirs = BTreeSet::new();
        let entries = match fs::read_dir(self.settings_dir()) {
            Ok(entries) => entries,
            Err(_) => return dirs,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name() {
                    let name = name.to_string_lossy();
                    if !name.starts_with('.') {
                        dirs.insert(name.to_string());
                    }
                }
            }
        }

        dirs
    }

    /// Create the settings directory if it is absent
    ///
    /// The only mutation this layer performs; used by the sync manager
    /// before copying items into the target.
    pub fn ensure_settings_dir(&self) -> VaultSyncResult<()> {
        fs::create_dir_all(self.settings_dir()).map_err(|e| {
            VaultSyncError::Vault(format!(
                "Failed to create {}: {}",
                self.settings_dir().display(),
                e
            ))
        })
    }

    /// Check that a settings file parses as JSON
    ///
    /// A missing file passes: sync skips missing sources rather than
    /// failing. A decode failure is a validation error carrying the path
    /// and parse diagnostics.
    pub fn validate_json_file(&self, path: &Path) -> VaultSyncResult<()> {
        fsutil::validate_json_file(path)
    }
}
