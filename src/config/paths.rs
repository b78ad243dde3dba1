//! Path management for vaultsync
//!
//! Provides platform-appropriate path resolution for the configuration file.
//!
//! ## Path Resolution Order
//!
//! 1. `VAULTSYNC_CONFIG_DIR` environment variable (if set)
//! 2. Platform config directory via `directories` (e.g.
//!    `~/.config/vaultsync` on Linux, `%APPDATA%\vaultsync` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{VaultSyncError, VaultSyncResult};

/// Manages all paths used by vaultsync
#[derive(Debug, Clone)]
pub struct VaultSyncPaths {
    /// Base directory for all vaultsync configuration
    base_dir: PathBuf,
}

impl VaultSyncPaths {
    /// Create a new VaultSyncPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// `VAULTSYNC_CONFIG_DIR` override is not set.
    pub fn new() -> VaultSyncResult<Self> {
        let base_dir = if let Ok(custom) = std::env::var("VAULTSYNC_CONFIG_DIR") {
            PathBuf::from(custom)
        } else {
            let dirs = ProjectDirs::from("", "", "vaultsync").ok_or_else(|| {
                VaultSyncError::Config("Could not determine config directory".into())
            })?;
            dirs.config_dir().to_path_buf()
        };

        Ok(Self { base_dir })
    }

    /// Create VaultSyncPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base configuration directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the configuration directory exists
    pub fn ensure_directories(&self) -> VaultSyncResult<()> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            VaultSyncError::Io(format!("Failed to create config directory: {}", e))
        })?;

        Ok(())
    }
}
