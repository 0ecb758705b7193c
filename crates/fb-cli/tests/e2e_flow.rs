//! End-to-end tests that run the `fb` binary.
//!
//! These cover the paths that fail before any successful network round-trip:
//! missing credentials, a redirect from a different authorization flow, and
//! an unreachable API host.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn fb_binary() -> String {
    env!("CARGO_BIN_EXE_fb").to_string()
}

/// A command isolated from the user's config and environment.
fn fb(home: &std::path::Path) -> Command {
    let mut command = Command::new(fb_binary());
    command
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("FB_ACCESS_TOKEN")
        .env_remove("FB_BASE_URL")
        .env_remove("RUST_LOG");
    command
}

fn run_with_stdin(mut command: Command, stdin: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn fb");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = fb(temp.path()).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("test-entry"));
    assert!(stdout.contains("auth"));
}

#[test]
fn test_entry_without_token_fails() {
    let temp = TempDir::new().unwrap();
    let output = fb(temp.path())
        .args(["test-entry", "Biz", "Acme", "Site", "Design"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no access token"), "stderr: {stderr}");
}

#[test]
fn test_auth_rejects_redirect_with_wrong_state() {
    let temp = TempDir::new().unwrap();
    let mut command = fb(temp.path());
    command.args(["auth", "cid", "secret", "https://localhost/callback"]);

    let output = run_with_stdin(
        command,
        "https://localhost/callback?code=abc&state=not-this-flow\n",
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Visit the following URL"));
    assert!(stdout.contains("response_type=code"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("state mismatch"), "stderr: {stderr}");
}

#[test]
fn test_unreachable_host_is_transport_error() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("fb.toml");
    std::fs::write(
        &config_path,
        "base_url = \"http://127.0.0.1:1\"\ntimeout_secs = 5\n",
    )
    .unwrap();

    let output = fb(temp.path())
        .arg("--config")
        .arg(&config_path)
        .args(["entries", "Biz", "--token", "abc"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("transport error"), "stderr: {stderr}");
}

#[test]
fn test_token_from_env_is_used() {
    let temp = TempDir::new().unwrap();
    let output = fb(temp.path())
        .env("FB_ACCESS_TOKEN", "abc")
        .env("FB_BASE_URL", "http://127.0.0.1:1")
        .args(["entries", "Biz"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("no access token"), "stderr: {stderr}");
    assert!(stderr.contains("transport error"), "stderr: {stderr}");
}
