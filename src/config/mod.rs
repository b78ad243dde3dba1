//! Configuration and path management for vaultsync

pub mod paths;
pub mod settings;

pub use paths::VaultSyncPaths;
pub use settings::{ItemListMode, Settings};
