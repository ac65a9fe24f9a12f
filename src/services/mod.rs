//! Services module - process supervision for the game client.
//!
//! # Components
//!
//! - [`Launcher`]: starts the game server, waits for its head start, then
//!   starts the client host. Output from both children is forwarded line by
//!   line with a `[server]` / `[client]` prefix.
//! - [`shutdown_signal`]: resolves on Ctrl-C or SIGTERM so the launcher can
//!   take both children down before exiting.
//!
//! Nothing here touches Slint or the bridge; the launcher only knows commands
//! and arguments from [`LauncherConfig`](crate::models::LauncherConfig).

pub mod launcher;

pub use launcher::{
    LaunchError, LaunchOutcome, Launcher, ProcessSpec, forward_lines, shutdown_signal,
};
