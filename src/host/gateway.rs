// Host gateway - binds each bridge operation to its privileged implementation
// and produces menu events for the UI context.

use crate::bridge::contract::{
    BridgeError, BridgeOperation, BridgeResponse, BridgeResult, MenuChannel,
};
use crate::bridge::transport::{BridgeEnvelope, MenuClock, MenuEvent};
use crate::host::window::{QuitSignal, WindowControl, WindowError, WindowState};
use crate::metrics::BridgeMetrics;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What the gateway does with a request.
#[derive(Debug, PartialEq)]
pub enum Dispatch {
    /// Send this result back to the caller
    Reply(BridgeResult<BridgeResponse>),
    /// The application is quitting; nobody gets a reply
    Quit,
}

/// Privileged handler for bridge requests.
///
/// Runs on the host's tokio runtime. Window operations go through a
/// [`WindowControl`], which marshals them onto the window's event loop.
///
/// # Example
/// ```ignore
/// let (host_end, ui_end) = bridge::link(REQUEST_BUFFER);
/// let gateway = HostGateway::new(Arc::new(window), quit, metrics);
/// runtime.spawn(gateway.run(host_end.requests));
/// ```
pub struct HostGateway<W: WindowControl> {
    window: Arc<W>,
    quit: QuitSignal,
    metrics: Arc<BridgeMetrics>,
    version: String,
}

impl<W: WindowControl> HostGateway<W> {
    pub fn new(window: Arc<W>, quit: QuitSignal, metrics: Arc<BridgeMetrics>) -> Self {
        Self {
            window,
            quit,
            metrics,
            version: crate::VERSION.to_string(),
        }
    }

    /// Override the reported version (packaged builds stamp their own).
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Run one operation.
    pub fn handle(&self, operation: BridgeOperation) -> Dispatch {
        match operation {
            BridgeOperation::GetAppVersion => Dispatch::Reply(Ok(BridgeResponse::Version {
                version: self.version.clone(),
            })),
            BridgeOperation::QuitApp => {
                tracing::info!("Quit requested over the bridge");
                self.quit.trigger();
                Dispatch::Quit
            }
            BridgeOperation::MinimizeWindow => {
                Dispatch::Reply(self.window_op(operation, |w| w.minimize()))
            }
            BridgeOperation::MaximizeWindow => {
                Dispatch::Reply(self.window_op(operation, |w| w.maximize()))
            }
            BridgeOperation::CloseWindow => {
                Dispatch::Reply(self.window_op(operation, |w| w.close()))
            }
        }
    }

    fn window_op<F>(&self, operation: BridgeOperation, op: F) -> BridgeResult<BridgeResponse>
    where
        F: FnOnce(&W) -> Result<WindowState, WindowError>,
    {
        match op(self.window.as_ref()) {
            Ok(WindowState::Applied) => Ok(BridgeResponse::Done),
            Ok(WindowState::Gone) => {
                tracing::debug!("Window already gone, {} treated as satisfied", operation);
                Ok(BridgeResponse::Done)
            }
            Err(e) => {
                tracing::error!("{} failed: {}", operation, e);
                Err(BridgeError::ActionFailed {
                    operation,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Serve requests in arrival order until every sender is dropped or a
    /// quit request arrives.
    pub async fn run(self, mut requests: mpsc::Receiver<BridgeEnvelope>) {
        tracing::info!("Host gateway listening for bridge requests");

        while let Some(BridgeEnvelope { operation, reply }) = requests.recv().await {
            tracing::debug!("Bridge request: {}", operation);

            match self.handle(operation) {
                Dispatch::Reply(result) => {
                    self.metrics.record_request(result.is_ok());
                    if reply.send(result).is_err() {
                        tracing::debug!("Caller of {} went away before the reply", operation);
                    }
                }
                Dispatch::Quit => {
                    self.metrics.record_request(true);
                    drop(reply);
                    break;
                }
            }
        }

        tracing::info!("Host gateway stopped");
    }
}

/// Producer side of the menu channels.
///
/// Held by the host menu UI. Each event is stamped from the link's
/// [`MenuClock`] and delivered on the UI context's next dispatch turn, only
/// to listeners registered before the stamp.
#[derive(Clone)]
pub struct MenuEmitter {
    events: mpsc::UnboundedSender<MenuEvent>,
    clock: MenuClock,
    metrics: Arc<BridgeMetrics>,
}

impl MenuEmitter {
    pub fn new(
        events: mpsc::UnboundedSender<MenuEvent>,
        clock: MenuClock,
        metrics: Arc<BridgeMetrics>,
    ) -> Self {
        Self {
            events,
            clock,
            metrics,
        }
    }

    /// Fire a menu event. Returns false if the UI context is gone.
    pub fn emit(&self, channel: MenuChannel) -> bool {
        match self.events.send(self.clock.stamp(channel)) {
            Ok(()) => {
                tracing::debug!("Menu event emitted: {}", channel);
                self.metrics.record_menu_event();
                true
            }
            Err(_) => {
                tracing::warn!("UI context gone, dropping menu event {}", channel);
                self.metrics.record_menu_event_dropped();
                false
            }
        }
    }
}
