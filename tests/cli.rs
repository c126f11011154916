use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary config directory
fn temp_config_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".venture").join("config.json")
}

const BINARY_NAME: &str = "venture-dashboard";

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Venture marketplace dashboard"))
        .stdout(contains("watch"));
}

#[test]
/// Login should create the config file holding the token.
fn login_creates_config_file() {
    let tmp = temp_config_dir();
    let config_path = config_file_path(&tmp);
    assert!(!config_path.exists());

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["login", "--token", "secret-token"])
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Logged in"));

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("secret-token"));
}

#[test]
/// Logout command should delete an existing config file.
fn logout_deletes_config_file() {
    let tmp = temp_config_dir();
    let config_path = config_file_path(&tmp);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "{}").unwrap();

    // Ensure the file exists
    assert!(config_path.exists());

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("logout")
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Logging out"));

    // Confirm the file was deleted
    assert!(!config_path.exists());
}

#[test]
/// A malformed investor ID is rejected before any request is made.
fn share_rejects_malformed_investor_id() {
    let tmp = temp_config_dir();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["share", "--investor", "not-a-uuid"])
        .env("HOME", tmp.path())
        .env("VENTURE_API_URL", "http://127.0.0.1:9/api/")
        .assert()
        .failure()
        .stderr(contains("investor_id"));
}

#[test]
/// Commands that need the API refuse to run without a saved token.
fn dashboard_requires_login() {
    let tmp = temp_config_dir();

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("dashboard")
        .env("HOME", tmp.path())
        .env("VENTURE_API_URL", "http://127.0.0.1:9/api/")
        .assert()
        .failure()
        .stderr(contains("Not logged in"));
}
