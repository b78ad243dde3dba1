//! Custom error types for vaultsync
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Errors are typed by category so the CLI
//! can map each one to a distinct process exit code.

use thiserror::Error;

/// The main error type for vaultsync operations
#[derive(Error, Debug)]
pub enum VaultSyncError {
    /// Vault structure errors (missing root, missing settings directory)
    #[error("Vault error: {0}")]
    Vault(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON validation errors for settings files
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backup creation/verification/restore/rotation errors
    #[error("Backup error: {0}")]
    Backup(String),

    /// Sync operation errors (per-item or whole-operation)
    #[error("Sync error: {0}")]
    Sync(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl VaultSyncError {
    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for vaults
    pub fn vault_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Vault",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Process exit code for this error category
    ///
    /// Each category maps to a distinct code so scripts can tell an invalid
    /// vault apart from, say, a failed backup without parsing stderr.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Vault(_) => 2,
            Self::Config(_) => 3,
            Self::Validation(_) => 4,
            Self::Backup(_) => 5,
            Self::Sync(_) => 6,
            Self::NotFound { .. } => 7,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VaultSyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultSyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for vaultsync operations
pub type VaultSyncResult<T> = Result<T, VaultSyncError>;
