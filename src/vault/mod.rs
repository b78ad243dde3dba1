//! Vault structure validation and discovery
//!
//! A vault is a directory tree with a `.obsidian` settings subdirectory.
//! `VaultManager` answers structural questions about one vault; `discovery`
//! walks candidate roots looking for vaults.

pub mod discovery;
pub mod manager;

pub use discovery::find_vaults;
pub use manager::{
    VaultManager, CORE_SETTINGS_FILES, PLUGIN_SETTINGS_FILES, RESOURCE_DIRS, SETTINGS_DIR_NAME,
};
