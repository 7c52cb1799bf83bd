//! CLI smoke tests for the ticketdesk-server binary
//!
//! These verify configuration validation, help output, and the non-serving
//! commands without starting the HTTP listener.

use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Helper to run the ticketdesk-server binary with given arguments
fn run_ticketdesk_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ticketdesk-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute ticketdesk-server")
}

/// Write a minimal valid config into a temp dir and return (dir, config path)
fn write_test_config() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let home = dir.path().join("home");
    let config_path = dir.path().join("config.yaml");

    let yaml = format!(
        r#"
server:
  home_dir: "{}"
  host: "127.0.0.1"
  port: 8099

database:
  url: "sqlite://database/test.db"
  max_conns: 5

logging:
  default:
    console_level: info
    file: ""
    file_level: debug
"#,
        home.to_string_lossy().replace('\\', "/")
    );

    std::fs::write(&config_path, yaml).expect("write config");
    (dir, config_path)
}

#[test]
fn test_cli_help_command() {
    let output = run_ticketdesk_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("ticketdesk-server") || stdout.contains("TicketDesk"),
        "Should contain binary name"
    );
    assert!(
        stdout.contains("Usage:") || stdout.contains("USAGE:"),
        "Should contain usage information"
    );
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(
        stdout.contains("check"),
        "Should contain 'check' subcommand"
    );
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_ticketdesk_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.1.0"), "Should contain version number");
}

#[test]
fn test_check_command_with_valid_config() {
    let (_dir, config_path) = write_test_config();

    let output = run_ticketdesk_server(&["--config", &config_path.to_string_lossy(), "check"]);

    assert!(
        output.status.success(),
        "Check should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
}

#[test]
fn test_check_command_rejects_bad_database_scheme() {
    let dir = TempDir::new().expect("tempdir");
    let home = dir.path().join("home");
    let config_path = dir.path().join("config.yaml");
    let yaml = format!(
        r#"
server:
  home_dir: "{}"
  host: "127.0.0.1"
  port: 8099

database:
  url: "mysql://localhost/db"
"#,
        home.to_string_lossy().replace('\\', "/")
    );
    std::fs::write(&config_path, yaml).expect("write config");

    let output = run_ticketdesk_server(&["--config", &config_path.to_string_lossy(), "check"]);
    assert!(
        !output.status.success(),
        "Check should fail for unsupported database scheme"
    );
}

#[test]
fn test_print_config_outputs_yaml() {
    let (_dir, config_path) = write_test_config();

    let output =
        run_ticketdesk_server(&["--config", &config_path.to_string_lossy(), "--print-config"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server:"));
    assert!(stdout.contains("port: 8099"));
    assert!(stdout.contains("database:"));
}

#[test]
fn test_port_override_shows_in_printed_config() {
    let (_dir, config_path) = write_test_config();

    let output = run_ticketdesk_server(&[
        "--config",
        &config_path.to_string_lossy(),
        "--port",
        "9191",
        "--print-config",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9191"));
}
