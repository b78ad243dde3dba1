//! End-to-end tests for the vaultsync binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vaultsync(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vaultsync").unwrap();
    cmd.env("VAULTSYNC_CONFIG_DIR", config_dir);
    cmd
}

fn make_vault(base: &Path, name: &str) -> PathBuf {
    let vault = base.join(name);
    let settings = vault.join(".obsidian");
    fs::create_dir_all(settings.join("themes")).unwrap();
    fs::write(settings.join("app.json"), r#"{"vimMode":true}"#).unwrap();
    fs::write(settings.join("hotkeys.json"), "{}").unwrap();
    fs::write(settings.join("themes").join("minimal.css"), "body {}").unwrap();
    vault
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    vaultsync(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("vaults"));
}

#[test]
fn sync_copies_settings_between_vaults() {
    let temp = TempDir::new().unwrap();
    let source = make_vault(temp.path(), "source");
    let target = make_vault(temp.path(), "target");
    fs::write(target.join(".obsidian/app.json"), r#"{"vimMode":false}"#).unwrap();

    vaultsync(temp.path())
        .args(["sync", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("synced app.json"));

    let copied = fs::read_to_string(target.join(".obsidian/app.json")).unwrap();
    assert_eq!(copied, r#"{"vimMode":true}"#);
    assert!(target.join(".obsidian/themes/minimal.css").exists());
    // The pre-sync target state is protected by a backup
    assert!(target.join(".vaultsync-backups").exists());
}

#[test]
fn dry_run_reports_without_writing() {
    let temp = TempDir::new().unwrap();
    let source = make_vault(temp.path(), "source");
    let target = make_vault(temp.path(), "target");
    fs::write(target.join(".obsidian/app.json"), r#"{"vimMode":false}"#).unwrap();

    vaultsync(temp.path())
        .args(["sync", "--dry-run", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("would sync app.json"));

    let untouched = fs::read_to_string(target.join(".obsidian/app.json")).unwrap();
    assert_eq!(untouched, r#"{"vimMode":false}"#);
    assert!(!target.join(".vaultsync-backups").exists());
}

#[test]
fn invalid_vault_maps_to_vault_exit_code() {
    let temp = TempDir::new().unwrap();
    let target = make_vault(temp.path(), "target");

    vaultsync(temp.path())
        .args(["sync", "--source"])
        .arg(temp.path().join("missing"))
        .arg("--target")
        .arg(&target)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Source vault"));
}

#[test]
fn unparseable_json_maps_to_validation_exit_code() {
    let temp = TempDir::new().unwrap();
    let source = make_vault(temp.path(), "source");
    let target = make_vault(temp.path(), "target");
    fs::write(source.join(".obsidian/app.json"), "{broken").unwrap();

    vaultsync(temp.path())
        .args(["sync", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("app.json"));
}

#[test]
fn backup_create_and_list() {
    let temp = TempDir::new().unwrap();
    let vault = make_vault(temp.path(), "vault");

    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .arg("create")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: backup_"));

    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .args(["list", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"))
        .stdout(predicate::str::contains("Integrity: OK"));
}

#[test]
fn list_verbose_flags_tampered_backup() {
    let temp = TempDir::new().unwrap();
    let vault = make_vault(temp.path(), "vault");

    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .arg("create")
        .assert()
        .success();

    // Gut the snapshot's themes directory behind the tool's back
    let backup_root = vault.join(".vaultsync-backups");
    let snapshot = fs::read_dir(&backup_root)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    fs::remove_dir_all(snapshot.join(".obsidian/themes")).unwrap();

    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .args(["list", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Integrity: FAILED"))
        .stdout(predicate::str::contains("themes"));
}

#[test]
fn backup_list_json_emits_records() {
    let temp = TempDir::new().unwrap();
    let vault = make_vault(temp.path(), "vault");

    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .arg("create")
        .assert()
        .success();

    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "backup_"#))
        .stdout(predicate::str::contains(r#""settings_file_count": 2"#));
}

#[test]
fn sync_json_reports_result() {
    let temp = TempDir::new().unwrap();
    let source = make_vault(temp.path(), "source");
    let target = make_vault(temp.path(), "target");

    vaultsync(temp.path())
        .args(["sync", "--json", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success": true"#))
        .stdout(predicate::str::contains("app.json"));
}

#[test]
fn restore_requires_force() {
    let temp = TempDir::new().unwrap();
    let vault = make_vault(temp.path(), "vault");

    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .arg("create")
        .assert()
        .success();

    fs::write(vault.join(".obsidian/app.json"), r#"{"vimMode":false}"#).unwrap();

    // Without --force the restore is only described
    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .args(["restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(
        fs::read_to_string(vault.join(".obsidian/app.json")).unwrap(),
        r#"{"vimMode":false}"#
    );

    vaultsync(temp.path())
        .args(["backup", "--vault"])
        .arg(&vault)
        .args(["restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete"));
    assert_eq!(
        fs::read_to_string(vault.join(".obsidian/app.json")).unwrap(),
        r#"{"vimMode":true}"#
    );
}

#[test]
fn vaults_command_discovers_vaults() {
    let temp = TempDir::new().unwrap();
    make_vault(temp.path(), "notes");
    make_vault(temp.path(), "work");

    vaultsync(temp.path())
        .arg("vaults")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 2 vault(s)"));
}
