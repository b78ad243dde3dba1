//! User settings for vaultsync
//!
//! Manages sync category toggles, error-handling policy, and backup
//! retention. Settings are validated once at load time and passed to the
//! managers as an immutable value.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::VaultSyncPaths;
use crate::error::{VaultSyncError, VaultSyncResult};

/// Semantics of an explicit caller-supplied item list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemListMode {
    /// Intersect the explicit list with the configuration-enabled,
    /// source-present selection (default)
    #[default]
    Restrict,
    /// Sync exactly the named items, regardless of category toggles
    /// (items must still exist in the source and pass JSON validation)
    Override,
}

/// User settings for vaultsync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Sync core settings files (app, appearance, hotkeys, types, templates)
    #[serde(default = "default_true")]
    pub sync_core_settings: bool,

    /// Sync core plugin settings files
    #[serde(default = "default_true")]
    pub sync_core_plugins: bool,

    /// Sync the community plugin list and the plugins directory
    #[serde(default = "default_true")]
    pub sync_community_plugins: bool,

    /// Sync the themes and icons directories
    #[serde(default = "default_true")]
    pub sync_themes: bool,

    /// Sync the CSS snippets directory
    #[serde(default = "default_true")]
    pub sync_snippets: bool,

    /// Report what would be synced without touching the filesystem
    #[serde(default)]
    pub dry_run: bool,

    /// Continue past per-item failures instead of aborting the whole sync
    #[serde(default)]
    pub ignore_errors: bool,

    /// How an explicit item list interacts with the category toggles
    #[serde(default)]
    pub item_list_mode: ItemListMode,

    /// Backup directory override; defaults to a subdirectory of the vault
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Number of backups to keep per vault
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_max_backups() -> u32 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            sync_core_settings: true,
            sync_core_plugins: true,
            sync_community_plugins: true,
            sync_themes: true,
            sync_snippets: true,
            dry_run: false,
            ignore_errors: false,
            item_list_mode: ItemListMode::default(),
            backup_dir: None,
            max_backups: default_max_backups(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &VaultSyncPaths) -> VaultSyncResult<Self> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                VaultSyncError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                VaultSyncError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultSyncPaths) -> VaultSyncResult<()> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            VaultSyncError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            VaultSyncError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Validate settings values
    pub fn validate(&self) -> VaultSyncResult<()> {
        if self.max_backups == 0 {
            return Err(VaultSyncError::Config(
                "max_backups must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
