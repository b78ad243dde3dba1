//! Backup system for vaultsync
//!
//! Provides verified, rolling backups of a vault's settings directory with
//! restore support.
//!
//! # Architecture
//!
//! - `BackupRecord`: metadata derived from one on-disk snapshot directory
//! - `BackupManager`: creates, verifies, lists, rotates, and restores
//!   snapshots
//!
//! # On-disk layout
//!
//! Each backup is a plain directory under the backup root, named
//! `backup_<epoch-seconds>` (zero-padded so lexicographic order equals
//! chronological order; a `_<n>` suffix disambiguates same-second backups)
//! and containing a verbatim copy of the `.obsidian` settings subtree.
//!
//! # Lifecycle
//!
//! `create_backup` copies the live settings tree, verifies the copy against
//! the live tree, and evicts the oldest backups beyond the retention limit.
//! A backup that fails verification is deleted and never appears in the
//! listing. `restore_backup` takes a safety backup of the current state
//! before overwriting it.

mod manager;
mod record;

pub use manager::BackupManager;
pub use record::BackupRecord;
