use serde::{Deserialize, Serialize};

/// Client configuration from `client.yaml`.
///
/// Every section falls back to its defaults when missing, so an empty or
/// absent file yields a runnable configuration. Game settings are not stored
/// here; they live only in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub window: WindowConfig,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
    pub launcher: LauncherConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Game Client".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: String,
    pub prefix: String,
    pub debug: bool,
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            prefix: "game-client".to_string(),
            debug: false,
            console: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the loading screen stays up before the menu is shown.
    pub loading_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: 1500,
        }
    }
}

/// Child processes started by `game-client-launcher`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub server_command: String,
    pub server_args: Vec<String>,
    pub client_command: String,
    pub client_args: Vec<String>,

    /// Delay between starting the server and starting the client.
    pub startup_delay_ms: u64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            server_command: "game-server".to_string(),
            server_args: Vec::new(),
            client_command: "game-client".to_string(),
            client_args: Vec::new(),
            startup_delay_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.logging.dir, "logs");
        assert!(!config.logging.debug);
        assert_eq!(config.ui.loading_delay_ms, 1500);
        assert_eq!(config.launcher.startup_delay_ms, 2000);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ClientConfig = serde_yaml_ng::from_str(
            "window:\n  title: Dungeon\nlauncher:\n  startup_delay_ms: 500\n",
        )
        .unwrap();

        assert_eq!(config.window.title, "Dungeon");
        assert_eq!(config.window.height, 720);
        assert_eq!(config.launcher.startup_delay_ms, 500);
        assert_eq!(config.launcher.server_command, "game-server");
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
