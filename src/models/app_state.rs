use crate::models::settings::GameSettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Top-level screens of the client.
///
/// Exactly one screen is active at a time. The set is closed: code that
/// wants to navigate must name one of these variants, so an out-of-range
/// screen can only come from parsing untrusted text (see [`FromStr`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppScreen {
    #[default]
    Loading,
    Menu,
    Settings,
    Game,
    About,
}

impl AppScreen {
    /// Every screen, in declaration order.
    pub const ALL: [AppScreen; 5] = [
        AppScreen::Loading,
        AppScreen::Menu,
        AppScreen::Settings,
        AppScreen::Game,
        AppScreen::About,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppScreen::Loading => "loading",
            AppScreen::Menu => "menu",
            AppScreen::Settings => "settings",
            AppScreen::Game => "game",
            AppScreen::About => "about",
        }
    }
}

impl fmt::Display for AppScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown screen: {0}")]
pub struct UnknownScreen(pub String);

impl FromStr for AppScreen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppScreen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}

/// Single source of truth for the UI context.
///
/// # Thread Safety
///
/// `AppState` is wrapped in `Arc<RwLock<AppState>>` by [`crate::state::StateManager`].
/// Never mutate it directly - go through the manager's setters so that
/// subscribers are notified once the change is fully applied.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub current_screen: AppScreen,
    pub is_loading: bool,

    /// User-visible failure banner. `Some` only while a failure is shown.
    pub error: Option<String>,

    pub settings: GameSettings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_screen: AppScreen::Loading,
            is_loading: true,
            error: None,
            settings: GameSettings::default(),
        }
    }
}

impl AppState {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
