//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Default configuration when the file is missing or partial
//! - Environment overrides layered over the file
//! - Invalid YAML handling

use camino::Utf8PathBuf;
use config::Environment;
use game_client::config::{CONFIG_FILE_NAME, ENV_PREFIX};
use game_client::models::UiConfig;
use game_client::{ClientConfig, ConfigManager};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

/// Environment source isolated from the real process environment.
fn env(vars: &[(&str, &str)]) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), &config_path);
    assert_eq!(manager.config_path(), &config_path.join(CONFIG_FILE_NAME));
}

#[test]
fn test_config_directory_creation() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("client").join("settings");

    ConfigManager::new(&nested).unwrap();

    assert!(nested.exists());
}

#[test]
fn test_load_default_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let config = manager.load_with(env(&[])).unwrap();

    assert_eq!(config.window.title, "Game Client");
    assert_eq!(config.window.width, 1280);
    assert_eq!(config.window.height, 720);
    assert_eq!(config.ui, UiConfig::default());
    assert_eq!(config.launcher.server_command, "game-server");
}

#[test]
fn test_save_and_load_config() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    let mut config = ClientConfig::default();
    config.window.title = "Northern Keep".to_string();
    config.logging.debug = true;
    config.launcher.server_args = vec!["--port".to_string(), "7777".to_string()];
    config.launcher.startup_delay_ms = 500;

    manager.save(&config).unwrap();
    assert!(manager.config_path().exists());

    let loaded = manager.load_with(env(&[])).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(
        manager.config_path(),
        "window:\n  width: 1920\n  height: 1080\n",
    )
    .unwrap();

    let config = manager.load_with(env(&[])).unwrap();

    assert_eq!(config.window.width, 1920);
    assert_eq!(config.window.height, 1080);
    assert_eq!(config.window.title, "Game Client");
    assert_eq!(config.logging, ClientConfig::default().logging);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(
        manager.config_path(),
        "window:\n  title: From File\nlauncher:\n  client_command: ./client\n",
    )
    .unwrap();

    let config = manager
        .load_with(env(&[
            ("GAME_CLIENT_WINDOW__TITLE", "From Env"),
            ("GAME_CLIENT_LAUNCHER__STARTUP_DELAY_MS", "100"),
            ("UNRELATED_VARIABLE", "ignored"),
        ]))
        .unwrap();

    assert_eq!(config.window.title, "From Env");
    assert_eq!(config.launcher.startup_delay_ms, 100);
    assert_eq!(config.launcher.client_command, "./client");
}

#[test]
fn test_invalid_yaml_handling() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(manager.config_path(), "window: {title: [broken").unwrap();

    let result = manager.load_with(env(&[]));

    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("client.yaml"), "unexpected error: {message}");
}

#[test]
fn test_wrong_type_is_an_error() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(manager.config_path(), "window:\n  width: wide\n").unwrap();

    assert!(manager.load_with(env(&[])).is_err());
}

#[test]
fn test_concurrent_config_access() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = Arc::new(ConfigManager::new(&config_path).unwrap());
    manager.save(&ClientConfig::default()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || manager.load_with(env(&[])).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), ClientConfig::default());
    }
}
