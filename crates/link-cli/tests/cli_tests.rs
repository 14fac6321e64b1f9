//! CLI end-to-end tests that invoke the compiled `linksync` binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PLAYER: &str = "6a1f0b1e-0000-4000-8000-000000000001";

/// Get a Command for the linksync binary
fn linksync_cmd() -> Command {
    let mut cmd = Command::cargo_bin("linksync").expect("Failed to find linksync binary");
    cmd.env_remove("LINKSYNC_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("linksync.toml");
    let content = format!(
        r#"
[audit]
directory = "{audit}"

[[group-sync.pairs]]
group = "vip"
role = 123

[[group-sync.pairs]]
group = "vip"
role = 123
tie-breaker = "discord"
{extra}
"#,
        audit = dir.join("logs").display()
    );
    fs::write(&path, content).unwrap();
    path
}

fn write_world(dir: &Path) -> PathBuf {
    let path = dir.join("world.json");
    let world = serde_json::json!({
        "roles": [{"id": 123, "guild-id": 1, "name": "VIP", "position": 1}],
        "members": [{"guild-id": 1, "user-id": 42}],
        "bots": [{"guild-id": 1, "permissions": ["manage-roles"], "top-role-position": 5}],
        "groups": [{"player": PLAYER, "group": "vip"}],
        "links": [{"player": PLAYER, "user": 42}]
    });
    fs::write(&path, serde_json::to_string_pretty(&world).unwrap()).unwrap();
    path
}

fn member_roles(world: &Path) -> Vec<u64> {
    let content: serde_json::Value = serde_json::from_str(&fs::read_to_string(world).unwrap()).unwrap();
    content["members"][0]["roles"]
        .as_array()
        .map(|roles| roles.iter().map(|role| role.as_u64().unwrap()).collect())
        .unwrap_or_default()
}

#[test]
fn test_no_command_shows_hint() {
    linksync_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("linksync --help"));
}

#[test]
fn test_check_reports_duplicates() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");

    linksync_cmd()
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 accepted"))
        .stdout(predicate::str::contains("duplicate pair vip:123 ignored"))
        .stdout(predicate::str::contains("Configuration OK"));
}

#[test]
fn test_check_rejects_invalid_config() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "[nickname-sync]\nenabled = true\n");

    linksync_cmd()
        .args(["check", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nickname-sync is enabled but has no guild"));
}

#[test]
fn test_check_missing_config() {
    let temp = TempDir::new().unwrap();

    linksync_cmd()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}

#[test]
fn test_list_shows_pairs() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "[nickname-sync]\nenabled = true\nguild = 1\n");

    linksync_cmd()
        .args(["list", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("vip:123"))
        .stdout(predicate::str::contains("bidirectional"))
        .stdout(predicate::str::contains("guild 1"));
}

#[test]
fn test_resync_dry_run_leaves_snapshot() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");
    let world = write_world(temp.path());

    linksync_cmd()
        .args(["resync", "--dry-run", "-c"])
        .arg(&config)
        .arg("--world")
        .arg(&world)
        .assert()
        .success()
        .stdout(predicate::str::contains("Add role: [vip:123]"))
        .stdout(predicate::str::contains("1 change(s) would be applied"));

    assert!(member_roles(&world).is_empty());
    assert!(!temp.path().join("logs").exists());
}

#[test]
fn test_resync_writes_snapshot_and_audit() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");
    let world = write_world(temp.path());

    linksync_cmd()
        .args(["resync", "--user", "42", "-c"])
        .arg(&config)
        .arg("--world")
        .arg(&world)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 change(s) applied"));

    assert_eq!(member_roles(&world), vec![123]);
    let audit_files: Vec<_> = fs::read_dir(temp.path().join("logs")).unwrap().collect();
    assert_eq!(audit_files.len(), 1);

    linksync_cmd()
        .args(["resync", "--user", "42", "-c"])
        .arg(&config)
        .arg("--world")
        .arg(&world)
        .assert()
        .success()
        .stdout(predicate::str::contains("Already in sync: [vip:123]"));
}

#[test]
fn test_resync_unlinked_user() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");
    let world = write_world(temp.path());

    linksync_cmd()
        .args(["resync", "--user", "7", "-c"])
        .arg(&config)
        .arg("--world")
        .arg(&world)
        .assert()
        .success()
        .stdout(predicate::str::contains("Accounts not linked"));
}

#[test]
fn test_resync_missing_world() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");

    linksync_cmd()
        .args(["resync", "-c"])
        .arg(&config)
        .arg("--world")
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("World snapshot not found"));
}
