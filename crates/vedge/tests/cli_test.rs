//! Integration tests for the `vedge` CLI binary.
//!
//! Argument parsing, help output, shell completions and error handling run
//! without a device; the end-to-end cases drive a wiremock broker.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `vedge` binary with env isolation.
///
/// Clears all `VEDGE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn vedge_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vedge");
    cmd.env("HOME", "/tmp/vedge-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vedge-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("VEDGE_PROFILE")
        .env_remove("VEDGE_DEVICE")
        .env_remove("VEDGE_PORT")
        .env_remove("VEDGE_OUTPUT")
        .env_remove("VEDGE_INSECURE")
        .env_remove("VEDGE_TIMEOUT")
        .env_remove("VEDGE_USERNAME")
        .env_remove("VEDGE_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// A standalone broker with ports P01..P03 and one filter P01 -> P02.
async fn mock_broker() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).insert_header("x-auth-token", "tok-1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cte_cluster"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 100, "name": "P01" },
            { "id": 101, "name": "P02" },
            { "id": 102, "name": "P03" },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/ports/P01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 100,
            "name": "P01",
            "mode": "BIDIRECTIONAL",
            "enabled": true,
            "source_filter_list": [],
            "dest_filter_list": [7],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/filters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "F7" },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/filters/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "mode": "PASS_ALL",
            "source_port_list": [100],
            "dest_port_list": [101],
        })))
        .mount(&server)
        .await;

    server
}

/// Run the binary against `server` on a blocking thread.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let uri = server.uri();
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    tokio::task::spawn_blocking(move || {
        vedge_cmd()
            .env("VEDGE_PASSWORD", "admin")
            .args(["--device", &uri, "--username", "admin", "--timeout", "5"])
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = vedge_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    vedge_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Vision Edge")
            .and(predicate::str::contains("discover"))
            .and(predicate::str::contains("map"))
            .and(predicate::str::contains("clear")),
    );
}

#[test]
fn test_version_flag() {
    vedge_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vedge"));
}

#[test]
fn test_map_subcommands_exist() {
    vedge_cmd().args(["map", "--help"]).assert().success().stdout(
        predicate::str::contains("bidi")
            .and(predicate::str::contains("uni"))
            .and(predicate::str::contains("tap")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    vedge_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    vedge_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    vedge_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = vedge_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_map_uni_requires_a_destination() {
    let output = vedge_cmd().args(["map", "uni", "1/1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_discover_without_device() {
    let output = vedge_cmd().arg("discover").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("No device configured"), "{text}");
}

#[test]
fn test_device_without_credentials() {
    let output = vedge_cmd()
        .args(["--device", "10.0.0.5", "discover"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No credentials"));
}

#[test]
fn test_unreachable_device_is_a_connection_error() {
    let output = vedge_cmd()
        .env("VEDGE_PASSWORD", "admin")
        .args([
            "--device",
            "http://127.0.0.1:1",
            "--username",
            "admin",
            "--timeout",
            "5",
            "discover",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[test]
fn test_clear_needs_confirmation_when_not_interactive() {
    let output = vedge_cmd()
        .env("VEDGE_PASSWORD", "admin")
        .args(["--device", "10.0.0.5", "--username", "admin"])
        .args(["clear", "all", "1/1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[test]
fn test_invalid_output_format() {
    let output = vedge_cmd()
        .args(["--output", "invalid", "discover"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Unsupported operations ──────────────────────────────────────────

#[test]
fn test_attr_get_is_unsupported() {
    let output = vedge_cmd()
        .args(["attr", "get", "10.0.0.5/1/1", "speed"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("get_attribute_value"));
}

#[test]
fn test_speed_is_unsupported() {
    let output = vedge_cmd()
        .args(["speed", "10.0.0.5/1/1", "10.0.0.5/1/2", "10G", "full"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_state_id() {
    vedge_cmd()
        .arg("state-id")
        .assert()
        .success()
        .stdout(predicate::str::diff("-1\n"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    vedge_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_masks_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("vedge");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "default_profile = \"lab\"\n\n[profiles.lab]\naddress = \"192.168.42.240\"\nusername = \"admin\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    let output = vedge_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("[profiles.lab]"), "{text}");
    assert!(text.contains("****"));
    assert!(!text.contains("hunter2"));
}

// ── Against a mock broker ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_discover_json() {
    let server = mock_broker().await;

    let output = run_against(&server, &["--output", "json", "discover"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let chassis: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(chassis["model_name"], "Ixia Vision Edge Chassis");
    let ports = &chassis["blades"]["1"]["ports"];
    assert_eq!(ports["2"]["device_name"], "P02");
    assert_eq!(ports["2"]["mapped_from"], json!({ "blade": 1, "port": 1 }));
    assert!(ports["3"]["mapped_from"].is_null());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_discover_plain() {
    let server = mock_broker().await;
    let uri = server.uri();

    let output = run_against(&server, &["--output", "plain", "discover"]).await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("{uri}/1/2\tP02\t1/1")), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_defaults_select_output_format() {
    let server = mock_broker().await;
    let uri = server.uri();
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("vedge");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[defaults]\noutput = \"json-compact\"\ncolor = \"never\"\n",
    )
    .unwrap();

    let home = dir.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        vedge_cmd()
            .env("XDG_CONFIG_HOME", &home)
            .env("VEDGE_PASSWORD", "admin")
            .args(["--device", &uri, "--username", "admin", "--timeout", "5"])
            .arg("discover")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "{stdout}");
    let chassis: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(chassis["blades"]["1"]["ports"]["1"]["device_name"], "P01");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_map_unknown_port_is_not_found() {
    let server = mock_broker().await;
    Mock::given(method("GET"))
        .and(path("/api/ports/P09"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output = run_against(&server, &["map", "bidi", "1/1", "1/9"]).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("P09"));
}
