//! Data models for the game client.
//!
//! - [`AppState`]: the UI context's single source of truth (screen, loading flag, error, settings)
//! - [`AppScreen`]: the closed set of top-level screens
//! - [`GameSettings`] / [`SettingsPatch`]: in-memory settings and their partial updates
//! - [`ClientConfig`]: process configuration loaded from `client.yaml`
//!
//! # Architecture Note
//!
//! `AppState` is wrapped in `Arc<RwLock<>>` by [`StateManager`](crate::state::StateManager).
//! State updates go through the manager so that subscribers observe only fully applied state.

pub mod app_state;
pub mod config;
pub mod settings;

pub use app_state::{AppScreen, AppState, UnknownScreen};
pub use config::{ClientConfig, LauncherConfig, LoggingConfig, UiConfig, WindowConfig};
pub use settings::{
    GameSettings, GraphicsPatch, GraphicsQuality, GraphicsSettings, Language, Resolution,
    SettingsPatch,
};
