// Host shell window - Slint chrome owned by the privileged context.
//
// The window offers the application menu (whose selections become menu
// channel events) and is the target of the window lifecycle operations.

use crate::bridge::contract::MenuChannel;
use crate::host::gateway::MenuEmitter;
use crate::host::window::{WindowControl, WindowError, WindowState};
use crate::models::WindowConfig;
use anyhow::{Context, Result};
use slint::ComponentHandle;

// Include the generated Slint code
slint::include_modules!();

/// [`WindowControl`] backed by the shell window.
///
/// Operations are queued onto the Slint event loop from whatever thread the
/// gateway runs on. If the event loop has stopped, the window is gone.
#[derive(Clone)]
pub struct SlintWindow {
    ui: slint::Weak<ShellWindow>,
}

impl SlintWindow {
    fn on_event_loop<F>(&self, operation: &'static str, f: F) -> Result<WindowState, WindowError>
    where
        F: FnOnce(ShellWindow) + Send + 'static,
    {
        match self.ui.upgrade_in_event_loop(f) {
            Ok(()) => Ok(WindowState::Applied),
            Err(e) => {
                tracing::debug!("Event loop unavailable for {}: {:?}", operation, e);
                Ok(WindowState::Gone)
            }
        }
    }
}

impl WindowControl for SlintWindow {
    fn minimize(&self) -> Result<WindowState, WindowError> {
        self.on_event_loop("minimize", |ui| ui.window().set_minimized(true))
    }

    fn maximize(&self) -> Result<WindowState, WindowError> {
        self.on_event_loop("maximize", |ui| {
            let window = ui.window();
            window.set_maximized(!window.is_maximized());
        })
    }

    fn close(&self) -> Result<WindowState, WindowError> {
        self.on_event_loop("close", |ui| {
            if let Err(e) = ui.window().hide() {
                tracing::warn!("Failed to hide shell window: {}", e);
            }
        })
    }
}

/// Owns the shell window and wires its menu to the bridge.
pub struct ShellController {
    ui: ShellWindow,
}

impl ShellController {
    /// Create the window and connect menu selections to `emitter`.
    pub fn new(config: &WindowConfig, emitter: MenuEmitter) -> Result<Self> {
        let ui = ShellWindow::new().context("Failed to create shell window")?;

        ui.set_window_title(config.title.clone().into());
        ui.set_status_text(format!("v{}", crate::VERSION).into());
        ui.window()
            .set_size(slint::LogicalSize::new(config.width as f32, config.height as f32));

        ui.on_menu_selected(move |id| match id.as_str().parse::<MenuChannel>() {
            Ok(channel) => {
                emitter.emit(channel);
            }
            Err(e) => tracing::error!("Shell menu produced {}", e),
        });

        tracing::info!(
            "Shell window created: {} ({}x{})",
            config.title,
            config.width,
            config.height
        );

        Ok(Self { ui })
    }

    /// A handle the gateway can use from other threads.
    pub fn window_control(&self) -> SlintWindow {
        SlintWindow {
            ui: self.ui.as_weak(),
        }
    }

    /// Run the window event loop (blocks until the window closes or the
    /// loop is told to quit).
    pub fn run(self) -> Result<(), slint::PlatformError> {
        tracing::info!("Starting shell event loop");
        self.ui.run()
    }
}
