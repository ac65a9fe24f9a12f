// Screen controller and screen actions.
//
// Rendering is a pure function of AppState. Screens never mutate state
// directly: local transitions go through the StateManager, privileged
// actions through the ClientApi.

use crate::bridge::ClientApi;
use crate::models::{
    AppScreen, AppState, GameSettings, GraphicsPatch, GraphicsQuality, Language, Resolution,
    SettingsPatch,
};
use crate::state::{StateChange, StateManager};
use std::sync::Arc;

/// What the active screen shows, built only from the state it reads.
#[derive(Clone, Debug, PartialEq)]
pub enum ScreenView {
    Loading { is_loading: bool },
    Menu { error: Option<String> },
    Settings { settings: GameSettings },
    Game { settings: GameSettings },
    About { error: Option<String> },
}

impl ScreenView {
    pub fn screen(&self) -> AppScreen {
        match self {
            ScreenView::Loading { .. } => AppScreen::Loading,
            ScreenView::Menu { .. } => AppScreen::Menu,
            ScreenView::Settings { .. } => AppScreen::Settings,
            ScreenView::Game { .. } => AppScreen::Game,
            ScreenView::About { .. } => AppScreen::About,
        }
    }
}

/// Selects exactly one screen from `current_screen`.
pub struct ScreenController;

impl ScreenController {
    pub fn render(state: &AppState) -> ScreenView {
        match state.current_screen {
            AppScreen::Loading => ScreenView::Loading {
                is_loading: state.is_loading,
            },
            AppScreen::Menu => ScreenView::Menu {
                error: state.error.clone(),
            },
            AppScreen::Settings => ScreenView::Settings {
                settings: state.settings.clone(),
            },
            AppScreen::Game => ScreenView::Game {
                settings: state.settings.clone(),
            },
            AppScreen::About => ScreenView::About {
                error: state.error.clone(),
            },
        }
    }
}

pub struct LoadingScreen {
    state: StateManager,
}

impl LoadingScreen {
    pub fn new(state: StateManager) -> Self {
        Self { state }
    }

    /// Assets are ready: drop the loading flag and show the menu.
    pub fn finish_loading(&self) -> Vec<StateChange> {
        let mut changes = self.state.set_loading(false);
        changes.extend(self.state.set_current_screen(AppScreen::Menu));
        tracing::info!("Loading finished");
        changes
    }
}

pub struct MenuScreen {
    state: StateManager,
    api: Arc<ClientApi>,
}

impl MenuScreen {
    pub fn new(state: StateManager, api: Arc<ClientApi>) -> Self {
        Self { state, api }
    }

    pub fn new_game(&self) -> Vec<StateChange> {
        self.state.set_current_screen(AppScreen::Game)
    }

    pub fn load_game(&self) -> Vec<StateChange> {
        self.state.set_current_screen(AppScreen::Game)
    }

    pub fn open_settings(&self) -> Vec<StateChange> {
        self.state.set_current_screen(AppScreen::Settings)
    }

    pub fn open_about(&self) -> Vec<StateChange> {
        self.state.set_current_screen(AppScreen::About)
    }

    /// Ask the host to quit the application.
    pub async fn quit(&self) {
        if let Err(e) = self.api.quit_app().await {
            self.state
                .set_error(Some(format!("Could not quit the game: {e}")));
        }
    }
}

/// Settings screen actions. Input values are sanitized here before they
/// reach the store.
pub struct SettingsScreen {
    state: StateManager,
}

impl SettingsScreen {
    pub fn new(state: StateManager) -> Self {
        Self { state }
    }

    pub fn back(&self) -> Vec<StateChange> {
        self.state.set_current_screen(AppScreen::Menu)
    }

    pub fn set_sound_volume(&self, volume: f32) -> Vec<StateChange> {
        self.state.update_settings(SettingsPatch {
            sound_volume: Some(clamp_volume(volume)),
            ..Default::default()
        })
    }

    pub fn set_music_volume(&self, volume: f32) -> Vec<StateChange> {
        self.state.update_settings(SettingsPatch {
            music_volume: Some(clamp_volume(volume)),
            ..Default::default()
        })
    }

    pub fn set_language(&self, language: Language) -> Vec<StateChange> {
        self.state.update_settings(SettingsPatch {
            language: Some(language),
            ..Default::default()
        })
    }

    pub fn toggle_fullscreen(&self) -> Vec<StateChange> {
        let fullscreen = self.state.read(|s| s.settings.fullscreen);
        self.state.update_settings(SettingsPatch {
            fullscreen: Some(!fullscreen),
            ..Default::default()
        })
    }

    /// Ignores resolutions with a zero dimension.
    pub fn set_resolution(&self, resolution: Resolution) -> Vec<StateChange> {
        if !resolution.is_valid() {
            tracing::warn!(
                "Ignoring invalid resolution {}x{}",
                resolution.width,
                resolution.height
            );
            return Vec::new();
        }
        self.state.update_settings(SettingsPatch {
            resolution: Some(resolution),
            ..Default::default()
        })
    }

    pub fn set_graphics_quality(&self, quality: GraphicsQuality) -> Vec<StateChange> {
        self.state.update_settings(SettingsPatch {
            graphics: Some(GraphicsPatch {
                quality: Some(quality),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

pub struct GameScreen {
    state: StateManager,
}

impl GameScreen {
    pub fn new(state: StateManager) -> Self {
        Self { state }
    }

    pub fn back_to_menu(&self) -> Vec<StateChange> {
        self.state.set_current_screen(AppScreen::Menu)
    }
}

pub struct AboutScreen {
    state: StateManager,
    api: Arc<ClientApi>,
}

impl AboutScreen {
    pub fn new(state: StateManager, api: Arc<ClientApi>) -> Self {
        Self { state, api }
    }

    pub fn back(&self) -> Vec<StateChange> {
        self.state.set_current_screen(AppScreen::Menu)
    }

    /// Read the host's version; failures go to the error banner.
    pub async fn fetch_version(&self) -> Option<String> {
        match self.api.get_app_version().await {
            Ok(version) => Some(version),
            Err(e) => {
                self.state
                    .set_error(Some(format!("Could not read application version: {e}")));
                None
            }
        }
    }
}
