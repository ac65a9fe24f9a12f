// Game client shell
//
// Library crate: the host/UI bridge, the application state store, the screen
// controller and the launcher service. The binaries (main.rs and
// bin/launcher.rs) wire these together.

pub mod bridge;
pub mod config;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use bridge::{BridgeError, BridgeOperation, ClientApi, MenuChannel};
pub use config::ConfigManager;
pub use metrics::BridgeMetrics;
pub use models::{AppScreen, AppState, ClientConfig, GameSettings};
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
