//! CLI surface tests
//!
//! Everything here stays off the network: configuration handling and the
//! error paths that fire before any remote call.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fwsync(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fwsync").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn init_writes_a_parseable_template() {
    let dir = TempDir::new().unwrap();

    fwsync(&dir)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fwsync.toml"));

    let content = std::fs::read_to_string(dir.path().join("fwsync.toml")).unwrap();
    assert!(content.contains("[cloudflare]"));
    assert!(content.contains("interval_minutes"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();

    fwsync(&dir).args(["init"]).assert().success();
    fwsync(&dir)
        .args(["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    fwsync(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn sync_requires_credentials() {
    let dir = TempDir::new().unwrap();

    // Template has empty token/zone
    fwsync(&dir).args(["init"]).assert().success();
    fwsync(&dir)
        .args(["sync"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();

    fwsync(&dir)
        .args(["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
}

#[test]
fn block_rejects_invalid_addresses() {
    let dir = TempDir::new().unwrap();

    fwsync(&dir).args(["init"]).assert().success();
    fwsync(&dir)
        .args(["block", "not-an-ip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a valid IP address"));
}
