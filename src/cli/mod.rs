//! CLI command handlers
//!
//! Each submodule implements the handlers for one command group. Handlers
//! print human-readable reports; errors propagate to `main` for exit-code
//! mapping.

pub mod backup;
pub mod sync;
pub mod vault;

pub use backup::{handle_backup_command, BackupCommands};
pub use sync::handle_sync_command;
pub use vault::handle_vaults_command;
