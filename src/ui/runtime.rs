// UI runtime - the unprivileged context's dispatch loop.
//
// One task owns the loop: host menu events are delivered to ClientApi
// listeners, state changes trigger a re-render, and the loop ends when the
// host asks to quit or drops its side of the bridge.

use crate::bridge::{ClientApi, MenuEvent};
use crate::models::AppScreen;
use crate::state::StateManager;
use crate::ui::screens::{
    AboutScreen, GameScreen, LoadingScreen, MenuScreen, ScreenController, ScreenView,
    SettingsScreen,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, watch};

/// Presentation seam for the active screen.
pub trait ScreenRenderer {
    fn render(&mut self, view: &ScreenView);
}

/// Renderer that reports screen changes to the log.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    last_screen: Option<AppScreen>,
}

impl ScreenRenderer for TracingRenderer {
    fn render(&mut self, view: &ScreenView) {
        let screen = view.screen();
        if self.last_screen != Some(screen) {
            tracing::info!("Showing {} screen", screen);
            self.last_screen = Some(screen);
        }
        tracing::debug!("Rendered {:?}", view);
    }
}

/// Why the dispatch loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunExit {
    Shutdown,
    HostClosed,
}

pub struct UiRuntime {
    state: StateManager,
    api: Arc<ClientApi>,
}

impl UiRuntime {
    /// Build the runtime and register the menu handlers that drive
    /// navigation.
    pub fn new(state: StateManager, api: Arc<ClientApi>) -> Self {
        let menu = state.clone();
        api.on_menu_new_game(move || {
            menu.set_current_screen(AppScreen::Game);
        });
        let menu = state.clone();
        api.on_menu_load_game(move || {
            menu.set_current_screen(AppScreen::Game);
        });
        let menu = state.clone();
        api.on_menu_settings(move || {
            menu.set_current_screen(AppScreen::Settings);
        });
        let menu = state.clone();
        api.on_menu_about(move || {
            menu.set_current_screen(AppScreen::About);
        });

        Self { state, api }
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn api(&self) -> &Arc<ClientApi> {
        &self.api
    }

    pub fn loading_screen(&self) -> LoadingScreen {
        LoadingScreen::new(self.state.clone())
    }

    pub fn menu_screen(&self) -> MenuScreen {
        MenuScreen::new(self.state.clone(), Arc::clone(&self.api))
    }

    pub fn settings_screen(&self) -> SettingsScreen {
        SettingsScreen::new(self.state.clone())
    }

    pub fn game_screen(&self) -> GameScreen {
        GameScreen::new(self.state.clone())
    }

    pub fn about_screen(&self) -> AboutScreen {
        AboutScreen::new(self.state.clone(), Arc::clone(&self.api))
    }

    /// Drive the UI until shutdown.
    ///
    /// Renders once up front, then in every turn handles menu events before
    /// state changes, and state changes before shutdown. A menu event only
    /// reaches listeners registered before it was emitted, however long it
    /// waited in the channel.
    pub async fn run<R: ScreenRenderer>(
        &self,
        mut events: mpsc::UnboundedReceiver<MenuEvent>,
        mut shutdown: watch::Receiver<bool>,
        renderer: &mut R,
    ) -> RunExit {
        let mut changes = self.state.subscribe();
        self.render(renderer);

        let exit = loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(event) => {
                        self.api.deliver_event(event);
                    }
                    None => {
                        tracing::info!("Host closed the menu channel");
                        break RunExit::HostClosed;
                    }
                },

                change = changes.recv() => match change {
                    Ok(change) => {
                        tracing::trace!("State change received: {:?}", change);
                        self.render(renderer);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("UI lagged behind {} state change(s)", skipped);
                        self.render(renderer);
                    }
                    // The runtime holds a StateManager, so the sender outlives us.
                    Err(RecvError::Closed) => break RunExit::HostClosed,
                },

                _ = shutdown.wait_for(|quit| *quit) => {
                    break RunExit::Shutdown;
                }
            }
        };

        tracing::info!("UI runtime stopped: {:?}", exit);
        exit
    }

    fn render<R: ScreenRenderer>(&self, renderer: &mut R) {
        let view = self.state.read(ScreenController::render);
        renderer.render(&view);
    }
}
