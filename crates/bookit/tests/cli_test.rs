//! Integration tests for the `bookit` binary.
//!
//! Argument parsing, help, completions and config handling run without a
//! server; the rest drive the binary against a wiremock backend with the
//! session supplied through `BOOKIT_TOKEN`.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `bookit` with every `BOOKIT_*` variable cleared and config
/// directories pointed at `home`.
fn bookit_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bookit");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    for var in [
        "BOOKIT_PROFILE",
        "BOOKIT_SERVER",
        "BOOKIT_OUTPUT",
        "BOOKIT_INSECURE",
        "BOOKIT_TIMEOUT",
        "BOOKIT_TOKEN",
        "BOOKIT_USERNAME",
        "BOOKIT_PASSWORD",
        "BOOKIT_SETUP_TOKEN",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Same, already pointed at `server` with a session token.
fn session_cmd(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = bookit_cmd(home);
    cmd.env("BOOKIT_SERVER", server.uri())
        .env("BOOKIT_TOKEN", "tok-test");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_me(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("Authorization", "Bearer tok-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "username": "alice",
            "email": "alice@example.com",
            "roles": ["user"]
        })))
        .mount(server)
        .await;
}

/// Run a prepared command off the async runtime so the mock keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = bookit_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    bookit_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("resources")
            .and(predicate::str::contains("reservations"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    bookit_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookit"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    bookit_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = bookit_cmd(&home)
        .args(["--output", "xml", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("possible values"));
}

#[test]
fn test_create_needs_end_or_duration() {
    let home = TempDir::new().unwrap();
    let output = bookit_cmd(&home)
        .args(["reservations", "create", "5", "--start", "+1h"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_server_is_usage_error() {
    let home = TempDir::new().unwrap();
    bookit_cmd(&home)
        .arg("status")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No server configured"));
}

#[test]
fn test_unknown_profile() {
    let home = TempDir::new().unwrap();
    bookit_cmd(&home)
        .args(["--profile", "nope", "status"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_config_show_without_file() {
    let home = TempDir::new().unwrap();
    bookit_cmd(&home).args(["config", "show"]).assert().success();
}

#[test]
fn test_set_profile_then_show() {
    let home = TempDir::new().unwrap();
    bookit_cmd(&home)
        .args([
            "config",
            "set-profile",
            "office",
            "--server",
            "https://book.example",
            "--username",
            "alice",
        ])
        .assert()
        .success();

    let output = bookit_cmd(&home)
        .args(["-o", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let cfg: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cfg["profiles"]["office"]["server"], "https://book.example");
    assert_eq!(cfg["profiles"]["office"]["username"], "alice");
}

#[test]
fn test_set_profile_rejects_bad_url() {
    let home = TempDir::new().unwrap();
    bookit_cmd(&home)
        .args(["config", "set-profile", "x", "--server", "not a url"])
        .assert()
        .code(2);
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_reports_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2030-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = bookit_cmd(&home);
    cmd.args(["--server", &server.uri(), "-o", "plain", "status"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "healthy");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reservations_list_plain_ids() {
    let server = MockServer::start().await;
    mount_me(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .and(query_param("include_cancelled", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 7,
                "resource_id": 5,
                "start_time": "2099-01-01T09:00:00Z",
                "end_time": "2099-01-01T10:00:00Z",
                "status": "active"
            },
            {
                "id": 8,
                "resource_id": 5,
                "start_time": "2099-01-02T09:00:00Z",
                "end_time": "2099-01-02T10:00:00Z",
                "status": "active"
            }
        ])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = session_cmd(&home, &server);
    cmd.args(["-o", "plain", "reservations", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "7\n8");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resources_list_pages_locally() {
    let server = MockServer::start().await;
    mount_me(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/resources/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Room A", "tags": ["projector"], "available": true },
            { "id": 2, "name": "Room B", "tags": [], "available": false },
            { "id": 3, "name": "Room C", "tags": ["projector"], "available": true },
            { "id": 4, "name": "Van", "tags": ["vehicle"], "available": true }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = session_cmd(&home, &server);
    cmd.args([
        "-o",
        "plain",
        "resources",
        "list",
        "--filter",
        "available",
        "--per-page",
        "2",
        "--page",
        "2",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "4");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_past_start_is_rejected_before_any_write() {
    let server = MockServer::start().await;
    mount_me(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reservations"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = session_cmd(&home, &server);
    cmd.args([
        "reservations",
        "create",
        "5",
        "--start",
        "2000-01-01T09:00:00Z",
        "--duration",
        "1h",
    ]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_booking_conflict_exit_code() {
    let server = MockServer::start().await;
    mount_me(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reservations"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "detail": "Resource already booked for this slot" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = session_cmd(&home, &server);
    cmd.args([
        "reservations",
        "create",
        "5",
        "--start",
        "+1h",
        "--duration",
        "30m",
    ]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(6), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("already booked"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Could not validate credentials" })),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = session_cmd(&home, &server);
    cmd.args(["whoami"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cancel_prints_success_toast() {
    let server = MockServer::start().await;
    mount_me(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reservations/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "resource_id": 5,
            "start_time": "2099-01-01T09:00:00Z",
            "end_time": "2099-01-01T10:00:00Z",
            "status": "active"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/reservations/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = session_cmd(&home, &server);
    cmd.args(["--yes", "reservations", "cancel", "7"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Reservation cancelled successfully")
    );
}
