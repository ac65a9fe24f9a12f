// Privileged window and process lifecycle seams used by the host gateway.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Outcome of a window operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowState {
    /// The operation was applied (or queued on the window's event loop)
    Applied,
    /// The window no longer exists
    Gone,
}

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("window backend error: {0}")]
    Backend(String),
}

/// Control over the single primary window.
///
/// Implementations report [`WindowState::Gone`] rather than an error when the
/// window has already been destroyed.
#[cfg_attr(test, mockall::automock)]
pub trait WindowControl: Send + Sync {
    fn minimize(&self) -> Result<WindowState, WindowError>;

    /// Toggle between maximized and restored.
    fn maximize(&self) -> Result<WindowState, WindowError>;

    fn close(&self) -> Result<WindowState, WindowError>;
}

/// Process-wide quit request.
///
/// Cloned into whatever needs to end the application; `main` waits on a
/// receiver and stops the window event loop when it fires.
#[derive(Clone, Debug)]
pub struct QuitSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl QuitSignal {
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
