use crate::models::ClientConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Environment variable that selects the configuration directory.
pub const CONFIG_DIR_ENV: &str = "GAME_CLIENT_CONFIG_DIR";

/// Directory used when [`CONFIG_DIR_ENV`] is not set.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// File name of the client configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "client.yaml";

/// Prefix for per-key environment overrides, e.g.
/// `GAME_CLIENT_WINDOW__TITLE` or `GAME_CLIENT_LOGGING__DEBUG`.
pub const ENV_PREFIX: &str = "GAME_CLIENT";

/// Configuration manager for loading and saving `client.yaml`.
///
/// Values are layered: built-in defaults, then the YAML file (if present),
/// then `GAME_CLIENT_*` environment variables.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing `client.yaml`
    ///
    /// # Returns
    /// A new ConfigManager instance
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
        })
    }

    /// Create a ConfigManager for the directory named by `GAME_CLIENT_CONFIG_DIR`,
    /// or [`DEFAULT_CONFIG_DIR`] when it is unset.
    pub fn from_env() -> Result<Self> {
        let dir = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
        Self::new(dir)
    }

    /// Load the client configuration.
    ///
    /// # Returns
    /// The layered ClientConfig; defaults if neither file nor environment set anything
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Load with an explicit environment source.
    pub fn load_with(&self, environment: Environment) -> Result<ClientConfig> {
        if !self.config_path.exists() {
            tracing::warn!(
                "Client config file not found at {}, using defaults",
                self.config_path
            );
        }

        let settings = Config::builder()
            .add_source(File::new(self.config_path.as_str(), FileFormat::Yaml).required(false))
            .add_source(environment)
            .build()
            .with_context(|| format!("Failed to read client config: {}", self.config_path))?;

        let config: ClientConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse client config: {}", self.config_path))?;

        tracing::info!("Loaded client config from {}", self.config_path);
        Ok(config)
    }

    /// Save the client configuration file.
    ///
    /// # Arguments
    /// * `config` - The ClientConfig to save
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize client config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write client config: {}", self.config_path))?;

        tracing::info!("Saved client config to {}", self.config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the path of `client.yaml`.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}
