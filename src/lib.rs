//! vaultsync - Synchronize Obsidian vault settings with verified backups
//!
//! This library implements selective synchronization of a vault's settings
//! directory (core settings files, plugin lists, themes, snippets) between
//! two vaults, protected by timestamped, verified, rotating backups.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings and path management
//! - `error`: Custom error types with exit-code mapping
//! - `vault`: Vault validation, enumeration, and discovery
//! - `backup`: Verified rolling backups and restore
//! - `sync`: Sync orchestration with per-item outcome folding
//! - `fsutil`: Recursive copy and size helpers
//! - `cli`: Command handlers for the `vaultsync` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use vaultsync::config::Settings;
//! use vaultsync::sync::SyncManager;
//! use vaultsync::vault::VaultManager;
//!
//! let manager = SyncManager::new(
//!     VaultManager::new("/vaults/laptop"),
//!     VaultManager::new("/vaults/desktop"),
//!     Settings::default(),
//! );
//! let result = manager.sync_settings(None)?;
//! println!("{}", result.summary());
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod sync;
pub mod vault;

pub use error::{VaultSyncError, VaultSyncResult};
