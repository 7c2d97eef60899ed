use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::{Value, json};
use tempfile::TempDir;

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn print_version_formats_branch_ref() {
    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", "refs/heads/feature/login")
        .arg("print-version")
        .assert()
        .success();

    assert_eq!(stdout_of(&assert), "feature-login-SNAPSHOT\n");
}

#[test]
fn print_version_is_default_command() {
    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", "refs/tags/v2.0.0")
        .assert()
        .success();

    assert_eq!(stdout_of(&assert), "v2.0.0\n");
}

#[test]
fn print_version_prints_fallback_without_ref() {
    let assert = cargo_bin_cmd!("ref-version")
        .env_remove("GITHUB_REF")
        .arg("print-version")
        .assert()
        .success();

    assert_eq!(stdout_of(&assert), "unspecified\n");
}

#[test]
fn malformed_ref_warns_and_still_succeeds() {
    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", "refs/unknown/x")
        .env_remove("RUST_LOG")
        .args(["print-version", "--fallback", ""])
        .assert()
        .success();

    let output = assert.get_output();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("GITHUB_REF") && stderr.contains("refs/unknown/x"),
        "warning should name the variable and value, got {stderr}"
    );
}

#[test]
fn override_wins_over_ref() {
    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", "refs/pull/42/merge")
        .args(["print-version", "--project-version", "9.9.9-custom"])
        .assert()
        .success();

    assert_eq!(stdout_of(&assert), "9.9.9-custom\n");
}

#[test]
fn custom_ref_variable_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("version.json");
    fs::write(&config_path, r#"{"refVariable": "CI_REF"}"#).unwrap();

    let assert = cargo_bin_cmd!("ref-version")
        .env_remove("GITHUB_REF")
        .env("CI_REF", "refs/pull/7/head")
        .arg("describe")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let payload: Value = serde_json::from_str(&stdout_of(&assert)).unwrap();
    assert_eq!(
        payload,
        json!({
            "version": "PR-7-SNAPSHOT",
            "source": "ref",
            "ref": { "kind": "pull_request", "value": "7/head" }
        })
    );
}

#[test]
fn missing_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();

    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", "refs/heads/main")
        .arg("--config")
        .arg(temp_dir.path().join("missing.json"))
        .assert()
        .success();

    assert_eq!(stdout_of(&assert), "main-SNAPSHOT\n");
}

#[test]
fn log_file_receives_logs() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("ref-version.log");

    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", "refs/heads/main")
        .env_remove("RUST_LOG")
        .arg("--verbose")
        .arg("--log-file")
        .arg(&log_path)
        .assert()
        .success();

    assert_eq!(stdout_of(&assert), "main-SNAPSHOT\n");
    let log = fs::read_to_string(&log_path).unwrap();
    assert!(
        log.contains("Setting project version to 'main-SNAPSHOT'."),
        "unexpected log contents: {log}"
    );
}

#[test]
fn unusable_log_file_falls_back_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let not_a_dir = temp_dir.path().join("plain-file");
    fs::write(&not_a_dir, "").unwrap();

    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", "refs/heads/main")
        .arg("print-version")
        .arg("--log-file")
        .arg(not_a_dir.join("ref-version.log"))
        .assert()
        .success();

    let output = assert.get_output();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "main-SNAPSHOT\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to open log file"),
        "expected fallback notice, got {stderr}"
    );
}

#[test]
fn unset_ref_is_logged_at_info_level() {
    let assert = cargo_bin_cmd!("ref-version")
        .env_remove("GITHUB_REF")
        .env_remove("RUST_LOG")
        .args(["print-version", "--verbose"])
        .assert()
        .success();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(
        stderr.contains("Environment variable 'GITHUB_REF' is not set."),
        "unexpected stderr: {stderr}"
    );
    assert!(!stderr.contains("does not match the expected format"));
}

#[test]
fn blank_ref_is_logged_as_unset() {
    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", "   ")
        .env_remove("RUST_LOG")
        .args(["print-version", "--verbose"])
        .assert()
        .success();

    let output = assert.get_output();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "unspecified\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Environment variable 'GITHUB_REF' is not set."),
        "unexpected stderr: {stderr}"
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_ref_is_warned_about_not_reported_unset() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let assert = cargo_bin_cmd!("ref-version")
        .env("GITHUB_REF", OsStr::from_bytes(b"refs/heads/ma\xffin"))
        .env_remove("RUST_LOG")
        .args(["print-version", "--verbose"])
        .assert()
        .success();

    let output = assert.get_output();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "unspecified\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("is not valid UTF-8"),
        "unexpected stderr: {stderr}"
    );
    assert!(!stderr.contains("is not set"));
}
