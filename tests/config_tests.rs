//! Integration tests for the configuration stack: defaults, TOML files,
//! `GEODUPE_*` environment overrides and CLI flags.

use clap::Parser;
use geodupe::cli::{Cli, Commands, OutputFormat};
use geodupe::config::{unknown_key_warnings, Config};
use geodupe::duplicates::ResolveOrder;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// =============================================================================
// Helper Functions
// =============================================================================

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all GEODUPE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("GEODUPE_") {
            std::env::remove_var(key);
        }
    }
}

fn scan_cli(args: &[&str]) -> Cli {
    let mut argv = vec!["geodupe", "scan", "scene.json"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_missing_file_gives_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let config = Config::try_load_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
distance_tolerance = 0.05
angle_tolerance_degrees = 2.5
resolve_order = "descending"
output = "csv"
"#,
    )
    .unwrap();

    let config = Config::try_load_from_path(&path).unwrap();
    assert_eq!(config.distance_tolerance, Some(0.05));
    assert_eq!(config.angle_tolerance_degrees, 2.5);
    assert_eq!(config.resolve_order, ResolveOrder::Descending);
    assert_eq!(config.output, OutputFormat::Csv);
    assert!(!config.interactive);
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "angle_tolerance_degrees = 2.5\noutput = \"csv\"\n").unwrap();

    std::env::set_var("GEODUPE_ANGLE_TOLERANCE_DEGREES", "7.5");
    std::env::set_var("GEODUPE_RESOLVE_ORDER", "descending");
    let config = Config::try_load_from_path(&path).unwrap();
    clear_env();

    assert_eq!(config.angle_tolerance_degrees, 7.5);
    assert_eq!(config.resolve_order, ResolveOrder::Descending);
    assert_eq!(config.output, OutputFormat::Csv);
}

#[test]
fn test_invalid_value_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "resolve_order = \"sideways\"\n").unwrap();

    assert!(Config::try_load_from_path(&path).is_err());
    assert_eq!(Config::load_from_path(&path), Config::default());
}

#[test]
fn test_unknown_keys_are_reported_with_suggestions() {
    let warnings = unknown_key_warnings("angle_tolerance = 3\ninteractive = true\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("angle_tolerance"));
    assert!(warnings[0].contains("did you mean 'angle_tolerance_degrees'"));
}

#[test]
fn test_save_and_reload() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        distance_tolerance: Some(0.2),
        interactive: true,
        output: OutputFormat::Json,
        ..Config::default()
    };
    config.save_to_path(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("distance_tolerance = 0.2"));
    assert_eq!(Config::try_load_from_path(&path).unwrap(), config);
}

// =============================================================================
// CLI Overrides
// =============================================================================

#[test]
fn test_cli_flags_override_config() {
    let cli = scan_cli(&[
        "--distance-tol",
        "0.3",
        "--angle-tol",
        "15",
        "--order",
        "descending",
        "-o",
        "json",
    ]);
    let Commands::Scan(args) = &cli.command else {
        panic!("Expected scan command");
    };

    let mut config = Config {
        distance_tolerance: Some(0.01),
        output: OutputFormat::Csv,
        ..Config::default()
    };
    config.merge_scan_args(args);

    assert_eq!(config.distance_tolerance, Some(0.3));
    assert_eq!(config.angle_tolerance_degrees, 15.0);
    assert_eq!(config.resolve_order, ResolveOrder::Descending);
    assert_eq!(config.output, OutputFormat::Json);
}

#[test]
fn test_absent_flags_keep_config() {
    let cli = scan_cli(&[]);
    let Commands::Scan(args) = &cli.command else {
        panic!("Expected scan command");
    };

    let mut config = Config {
        angle_tolerance_degrees: 4.0,
        interactive: true,
        ..Config::default()
    };
    let before = config.clone();
    config.merge_scan_args(args);
    assert_eq!(config, before);
}

#[test]
fn test_cli_rejects_bad_tolerances() {
    for argv in [
        ["geodupe", "scan", "scene.json", "--distance-tol", "-1"],
        ["geodupe", "scan", "scene.json", "--angle-tol", "181"],
        ["geodupe", "scan", "scene.json", "--distance-tol", "abc"],
    ] {
        assert!(Cli::try_parse_from(argv).is_err(), "{argv:?} should fail");
    }
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["geodupe", "-q", "-v", "scan", "scene.json"]).is_err());
}
