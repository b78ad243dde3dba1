//! Backup CLI commands
//!
//! Implements CLI commands for backup management of a single vault.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::backup::{BackupManager, BackupRecord};
use crate::config::Settings;
use crate::error::{VaultSyncError, VaultSyncResult};
use crate::vault::VaultManager;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup of the vault's settings
    Create,

    /// List all available backups
    List {
        /// Show detailed information, including an integrity check
        #[arg(short, long)]
        verbose: bool,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore the vault's settings from a backup
    Restore {
        /// Backup name or path (use 'latest' for most recent)
        #[arg(default_value = "latest")]
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete old backups beyond the retention limit
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command for the given vault
pub fn handle_backup_command(
    vault_path: &Path,
    settings: &Settings,
    cmd: BackupCommands,
) -> VaultSyncResult<()> {
    let vault = VaultManager::new(vault_path);
    vault.validate()?;

    let manager = BackupManager::new(&vault, settings.backup_dir.clone(), settings.max_backups);

    match cmd {
        BackupCommands::Create => {
            println!("Creating backup of {}...", vault.root().display());
            let record = manager.create_backup()?;
            println!("Backup created: {}", record.name);
            println!("Location: {}", record.path.display());
            println!(
                "Contents: {} settings file(s), {}",
                record.settings_file_count,
                format_size(record.size_bytes)
            );
        }

        BackupCommands::List { verbose, json } => {
            let backups = manager.list_backups()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
                return Ok(());
            }

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: vaultsync backup create --vault <path>");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at());
                let age_str = format_duration(age);

                if verbose {
                    // Flags snapshots that no longer cover the live tree,
                    // for example after manual tampering under the root
                    let integrity = match manager.verify_backup(backup) {
                        Ok(()) => "OK".to_string(),
                        Err(e) => format!("FAILED ({})", e),
                    };

                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n   Settings files: {}\n   Plugins: {}  Themes: {}  Icons: {}\n   Integrity: {}\n",
                        i + 1,
                        backup.name,
                        backup.created_at().format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        age_str,
                        backup.settings_file_count,
                        yes_no(backup.has_plugins),
                        yes_no(backup.has_themes),
                        yes_no(backup.has_icons),
                        integrity,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.name,
                        age_str,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let record = resolve_backup(&manager, &backup)?;

            println!("Backup Information");
            println!("==================");
            println!("Name: {}", record.name);
            println!(
                "Created: {}",
                record.created_at().format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("Size: {}", format_size(record.size_bytes));
            println!();

            if !force {
                println!("WARNING: This will overwrite the vault's current settings!");
                println!("A safety backup of the current state is taken first.");
                println!("To proceed, run again with --force flag:");
                println!("  vaultsync backup restore {} --force", backup);
                return Ok(());
            }

            println!("Restoring from backup...");
            let restored = manager.restore_backup(Some(&record.path))?;
            println!("Restore complete: {}", restored.name);
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let to_delete = backups.len().saturating_sub(settings.max_backups as usize);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!(
                    "Retention limit: {}, current backups: {}",
                    settings.max_backups,
                    backups.len()
                );
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Retention limit: {}", settings.max_backups);
            println!("Current backups: {}", backups.len());
            println!("To be deleted: {}", to_delete);
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  vaultsync backup prune --force");
                return Ok(());
            }

            let deleted = manager.cleanup_old_backups()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a record
fn resolve_backup(manager: &BackupManager, backup: &str) -> VaultSyncResult<BackupRecord> {
    // Handle "latest" keyword
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_backup()?
            .ok_or_else(|| VaultSyncError::backup_not_found("latest"));
    }

    // Full path
    let path = PathBuf::from(backup);
    if path.exists() {
        return BackupRecord::from_dir(&path);
    }

    // Name under the backup root
    let in_root = manager.backup_root().join(backup);
    if in_root.exists() {
        return BackupRecord::from_dir(&in_root);
    }

    Err(VaultSyncError::backup_not_found(backup))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Format a duration in human-readable form
pub(crate) fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    let months = days / 30;
    format!("{}mo", months)
}

/// Format a file size in human-readable form
pub(crate) fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
