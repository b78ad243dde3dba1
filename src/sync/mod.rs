//! Settings synchronization between vaults
//!
//! `SyncManager` orchestrates one sync operation: validate both vaults,
//! back up the target, resolve the item set from the category toggles,
//! copy each item with JSON validation gating, and rotate the target's
//! backups afterward.

mod manager;

pub use manager::{SyncManager, SyncResult};
