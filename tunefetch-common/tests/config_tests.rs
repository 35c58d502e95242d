//! Configuration resolution tests
//!
//! Tests that manipulate XDG_CONFIG_HOME are marked with #[serial] so they
//! never race each other.

use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tunefetch_common::config::TomlConfig;
use tunefetch_common::Error;

#[test]
fn test_explicit_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "threads = 2\ntop = 3\n").unwrap();

    let config = TomlConfig::resolve(Some(&path)).unwrap();
    assert_eq!(config.threads, Some(2));
    assert_eq!(config.top, Some(3));
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let result = TomlConfig::resolve(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_default_location_is_used_when_present() {
    let dir = TempDir::new().unwrap();
    let app_dir = dir.path().join("tunefetch");
    fs::create_dir_all(&app_dir).unwrap();
    fs::write(
        app_dir.join("config.toml"),
        "output_dir = \"/mnt/stick\"\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let config = TomlConfig::resolve(None).unwrap();

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(config.output_dir, Some(PathBuf::from("/mnt/stick")));
    assert_eq!(config.logging.level, "warn");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_missing_default_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let config = TomlConfig::resolve(None).unwrap();

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert!(config.output_dir.is_none());
    assert_eq!(config.logging.level, "info");
}
