// UI module - the unprivileged context
//
// This module contains:
// - UiRuntime: dispatch loop for menu events and state-driven re-renders
// - ScreenController and the per-screen actions

pub mod runtime;
pub mod screens;

pub use runtime::{RunExit, ScreenRenderer, TracingRenderer, UiRuntime};
pub use screens::{
    AboutScreen, GameScreen, LoadingScreen, MenuScreen, ScreenController, ScreenView,
    SettingsScreen,
};
