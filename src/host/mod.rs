// Host module - the privileged side of the client
//
// This module contains:
// - HostGateway: serves bridge requests and owns the quit signal
// - MenuEmitter: produces menu channel events for the UI context
// - WindowControl: seam over the primary window (Slint-backed in `shell`)

pub mod gateway;
pub mod shell;
pub mod window;

pub use gateway::{Dispatch, HostGateway, MenuEmitter};
pub use shell::{ShellController, SlintWindow};
pub use window::{QuitSignal, WindowControl, WindowError, WindowState};
