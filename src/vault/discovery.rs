//! Vault discovery
//!
//! Walks candidate root directories looking for vaults: directories that
//! contain a settings subdirectory with at least one JSON file.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::manager::{VaultManager, SETTINGS_DIR_NAME};

/// Find vaults under the given root directories
///
/// A directory counts as a vault if its settings subdirectory holds at
/// least one `*.json` file (the permissive discovery criterion). Hidden
/// directories are not descended into, so a vault inside another vault's
/// settings directory is never reported. Results are sorted by path.
pub fn find_vaults(roots: &[PathBuf], max_depth: usize) -> Vec<PathBuf> {
    let mut vaults = Vec::new();

    for root in roots {
        for entry in WalkDir::new(root)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_hidden(e.path()) || e.depth() == 0)
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            if looks_like_vault(entry.path()) {
                vaults.push(entry.path().to_path_buf());
            }
        }
    }

    vaults.sort();
    vaults.dedup();
    vaults
}

/// Discovery criterion: settings directory present with any JSON file
fn looks_like_vault(path: &Path) -> bool {
    if !path.join(SETTINGS_DIR_NAME).is_dir() {
        return false;
    }
    !VaultManager::new(path).settings_files().is_empty()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_vault(base: &Path, name: &str) -> PathBuf {
        let vault = base.join(name);
        fs::create_dir_all(vault.join(SETTINGS_DIR_NAME)).unwrap();
        fs::write(vault.join(SETTINGS_DIR_NAME).join("app.json"), "{}").unwrap();
        vault
    }

    #[test]
    fn test_finds_vaults_under_root() {
        let temp = TempDir::new().unwrap();
        let a = make_vault(temp.path(), "notes");
        let b = make_vault(temp.path(), "work/projects");

        let found = find_vaults(&[temp.path().to_path_buf()], 3);
        assert!(found.contains(&a));
        assert!(found.contains(&b));
    }

    #[test]
    fn test_ignores_settings_dir_without_json() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("empty").join(SETTINGS_DIR_NAME)).unwrap();

        let found = find_vaults(&[temp.path().to_path_buf()], 2);
        assert!(found.is_empty());
    }

    #[test]
    fn test_respects_max_depth() {
        let temp = TempDir::new().unwrap();
        make_vault(temp.path(), "a/b/c/deep");

        let found = find_vaults(&[temp.path().to_path_buf()], 2);
        assert!(found.is_empty());
    }

    #[test]
    fn test_skips_hidden_directories() {
        let temp = TempDir::new().unwrap();
        make_vault(temp.path(), ".cache/vault");
        let visible = make_vault(temp.path(), "vault");

        let found = find_vaults(&[temp.path().to_path_buf()], 3);
        assert_eq!(found, vec![visible]);
    }
}
