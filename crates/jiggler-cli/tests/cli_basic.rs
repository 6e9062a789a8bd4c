//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary config
//! directory and closes stdin, so `run` exits as soon as it has started.

use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(config_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_jiggler"))
        .args(args)
        .env("JIGGLER_CONFIG_DIR", config_dir)
        .env("JIGGLER_LOG", "warn")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(config_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(config_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

#[test]
fn test_help_variants_exit_zero() {
    let dir = TempDir::new().unwrap();
    for flag in ["-h", "--help", "-?"] {
        let stdout = run_cli_success(dir.path(), &[flag]);
        assert!(stdout.contains("--jiggle"), "{flag}: {stdout}");
    }
    // Help must not start the engine or take the lock.
    assert!(!dir.path().join("jiggler.pid").exists());
}

#[test]
fn test_config_defaults() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "JigglePeriod"]).trim(), "60");
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "EnabledDays"]).trim(),
        "Sun,Mon,Tue,Wed,Thu,Fri,Sat"
    );
}

#[test]
fn test_config_set_clamps_and_normalizes() {
    let dir = TempDir::new().unwrap();

    let stdout = run_cli_success(dir.path(), &["config", "set", "JigglePeriod", "99999"]);
    assert_eq!(stdout.trim(), "JigglePeriod = 10800");

    run_cli_success(dir.path(), &["config", "set", "EnabledDays", "fri,MON"]);
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "EnabledDays"]).trim(),
        "Mon,Fri"
    );

    let stored = std::fs::read_to_string(dir.path().join("settings.toml")).unwrap();
    assert!(stored.contains("[Settings]"));
    assert!(stored.contains("JigglePeriod = \"10800\""));
}

#[test]
fn test_config_rejects_unknown_key_and_bad_value() {
    let dir = TempDir::new().unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "Volume", "3"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key"));

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "JigglePeriod", "soon"]);
    assert_ne!(code, 0);

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "Volume"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_list_json() {
    let dir = TempDir::new().unwrap();
    let stdout = run_cli_success(dir.path(), &["config", "list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["ZenJiggle"], "0");
    assert_eq!(parsed["StartHour"], "9");
    assert_eq!(parsed.as_object().unwrap().len(), 9);
}

#[test]
fn test_gate_at_instant() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "EnableTimeRestriction", "1"]);
    run_cli_success(dir.path(), &["config", "set", "EnabledDays", "Mon"]);

    let stdout = run_cli_success(dir.path(), &["gate", "--at", "Mon 10:00", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["within_window"], true);

    let stdout = run_cli_success(dir.path(), &["gate", "--at", "Tue 10:00"]);
    assert!(stdout.contains("not permitted"), "{stdout}");

    let (_, _, code) = run_cli(dir.path(), &["gate", "--at", "someday"]);
    assert_ne!(code, 0);
}

#[test]
fn test_run_with_launch_flags() {
    let dir = TempDir::new().unwrap();
    let stdout = run_cli_success(dir.path(), &["-j", "-z", "-s", "20"]);
    assert!(stdout.contains("Jiggling mouse every 20 s, with Zen."), "{stdout}");

    // Launch flags are not persisted and the lock is released on exit.
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "ZenJiggle"]).trim(), "0");
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "JigglePeriod"]).trim(), "60");
    assert!(!dir.path().join("jiggler.pid").exists());
}

#[test]
fn test_run_minimized_is_silent() {
    let dir = TempDir::new().unwrap();
    let stdout = run_cli_success(dir.path(), &["-m", "-j"]);
    assert!(stdout.is_empty(), "{stdout}");
}

#[test]
fn test_run_refuses_second_instance() {
    let dir = TempDir::new().unwrap();
    // The test process itself is alive, so its pid holds the lock.
    std::fs::write(dir.path().join("jiggler.pid"), std::process::id().to_string()).unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["run"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already running"), "{stderr}");
}
