//! Vault discovery CLI command

use std::path::PathBuf;

use crate::error::VaultSyncResult;
use crate::vault::{find_vaults, VaultManager};

/// Handle the vaults command: discover and describe vaults under roots
pub fn handle_vaults_command(roots: Vec<PathBuf>, depth: usize) -> VaultSyncResult<()> {
    let roots = if roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        roots
    };

    let vaults = find_vaults(&roots, depth);

    if vaults.is_empty() {
        println!("No vaults found.");
        return Ok(());
    }

    println!("Discovered Vaults");
    println!("=================");
    println!();

    for path in &vaults {
        let manager = VaultManager::new(path);
        let files = manager.settings_files();
        let dirs = manager.settings_dirs();
        let status = if manager.is_vault() { "" } else { " (unrecognized settings)" };
        println!(
            "  {} - {} settings file(s), {} director{}{}",
            manager.root().display(),
            files.len(),
            dirs.len(),
            if dirs.len() == 1 { "y" } else { "ies" },
            status,
        );
    }

    println!();
    println!("Total: {} vault(s)", vaults.len());

    Ok(())
}
