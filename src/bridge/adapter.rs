// Bridge adapter - the UI side of the trust boundary.
//
// ClientApi republishes exactly the bridge contract to UI code: five async
// queries, four menu subscriptions and listener teardown. It forwards calls
// unchanged and holds no application state. Host events reach only the
// listeners that were registered before the event was emitted.

use crate::bridge::contract::{
    BridgeError, BridgeOperation, BridgeResponse, BridgeResult, MenuChannel,
};
use crate::bridge::transport::{BridgeEnvelope, MenuClock, MenuEvent};
use indexmap::IndexMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

type Listener = Arc<dyn Fn() + Send + Sync>;

/// A callback and the clock reading when it was registered.
struct Registration {
    since: u64,
    listener: Listener,
}

/// Callbacks registered per menu channel, kept in registration order.
struct ListenerRegistry {
    clock: MenuClock,
    channels: Mutex<IndexMap<MenuChannel, Vec<Registration>>>,
}

impl ListenerRegistry {
    fn new(clock: MenuClock) -> Self {
        Self {
            clock,
            channels: Mutex::new(IndexMap::new()),
        }
    }

    fn register(&self, channel: MenuChannel, listener: Listener) {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let since = self.clock.now();
        channels
            .entry(channel)
            .or_default()
            .push(Registration { since, listener });
    }

    fn remove_all(&self, channel: MenuChannel) -> usize {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels
            .shift_remove(&channel)
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }

    fn count(&self, channel: MenuChannel) -> usize {
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels.get(&channel).map(Vec::len).unwrap_or(0)
    }

    fn dispatch(&self, event: MenuEvent) -> usize {
        // Copy the list out so a callback may register or remove listeners.
        let listeners: Vec<Listener> = {
            let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
            channels
                .get(&event.channel)
                .map(|registrations| {
                    registrations
                        .iter()
                        .filter(|r| r.since < event.seq)
                        .map(|r| Arc::clone(&r.listener))
                        .collect()
                })
                .unwrap_or_default()
        };

        for listener in &listeners {
            listener();
        }
        listeners.len()
    }
}

/// The contract object installed in the UI global namespace.
///
/// # Example
/// ```ignore
/// let api = ClientApi::new(ui_end.requests, ui_end.clock);
/// api.on_menu_settings(|| tracing::info!("settings selected"));
///
/// let version = api.get_app_version().await?;
/// api.minimize_window().await?;
/// ```
pub struct ClientApi {
    requests: mpsc::Sender<BridgeEnvelope>,
    listeners: ListenerRegistry,
}

impl ClientApi {
    pub fn new(requests: mpsc::Sender<BridgeEnvelope>, clock: MenuClock) -> Self {
        Self {
            requests,
            listeners: ListenerRegistry::new(clock),
        }
    }

    /// The emission clock this API's listeners are registered against.
    pub fn clock(&self) -> &MenuClock {
        &self.listeners.clock
    }

    // Queries

    pub async fn get_app_version(&self) -> BridgeResult<String> {
        let operation = BridgeOperation::GetAppVersion;
        match self.call(operation).await? {
            BridgeResponse::Version { version } => Ok(version),
            BridgeResponse::Done => Err(BridgeError::UnexpectedResponse { operation }),
        }
    }

    /// Ask the host to terminate the application.
    ///
    /// The host does not reply to this request; the call completes once the
    /// host has gone away.
    pub async fn quit_app(&self) -> BridgeResult<()> {
        self.call_lifecycle(BridgeOperation::QuitApp).await
    }

    pub async fn minimize_window(&self) -> BridgeResult<()> {
        self.call_lifecycle(BridgeOperation::MinimizeWindow).await
    }

    pub async fn maximize_window(&self) -> BridgeResult<()> {
        self.call_lifecycle(BridgeOperation::MaximizeWindow).await
    }

    pub async fn close_window(&self) -> BridgeResult<()> {
        self.call_lifecycle(BridgeOperation::CloseWindow).await
    }

    // Subscriptions

    pub fn on_menu_new_game<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.register(MenuChannel::NewGame, Arc::new(callback));
    }

    pub fn on_menu_load_game<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.register(MenuChannel::LoadGame, Arc::new(callback));
    }

    pub fn on_menu_settings<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.register(MenuChannel::Settings, Arc::new(callback));
    }

    pub fn on_menu_about<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.register(MenuChannel::About, Arc::new(callback));
    }

    /// Remove every callback registered on `channel`. Removing from an empty
    /// channel is a no-op.
    pub fn remove_all_listeners(&self, channel: MenuChannel) {
        let removed = self.listeners.remove_all(channel);
        tracing::debug!("Removed {} listener(s) from {}", removed, channel);
    }

    /// Number of callbacks currently registered on `channel`.
    pub fn listener_count(&self, channel: MenuChannel) -> usize {
        self.listeners.count(channel)
    }

    /// Emit `channel` locally and deliver it at once.
    pub fn deliver(&self, channel: MenuChannel) -> usize {
        self.deliver_event(self.clock().stamp(channel))
    }

    /// Deliver a host event, in registration order, to the callbacks that
    /// were registered before it was emitted. Called by the UI runtime as
    /// events arrive.
    pub fn deliver_event(&self, event: MenuEvent) -> usize {
        let invoked = self.listeners.dispatch(event);
        tracing::debug!(
            "Delivered {} #{} to {} listener(s)",
            event.channel,
            event.seq,
            invoked
        );
        invoked
    }

    async fn call(&self, operation: BridgeOperation) -> BridgeResult<BridgeResponse> {
        let (reply, reply_rx) = oneshot::channel();

        if self
            .requests
            .send(BridgeEnvelope { operation, reply })
            .await
            .is_err()
        {
            return Err(BridgeError::HostUnavailable);
        }

        reply_rx
            .await
            .unwrap_or(Err(BridgeError::HostUnavailable))
    }

    /// Window lifecycle and quit requests are satisfied when the host is gone.
    async fn call_lifecycle(&self, operation: BridgeOperation) -> BridgeResult<()> {
        match self.call(operation).await {
            Ok(_) => Ok(()),
            Err(BridgeError::HostUnavailable) => {
                tracing::debug!("Host gone during {}, treating as satisfied", operation);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Race a bridge query against a local timer.
///
/// The contract has no timeout of its own; callers that need one wrap the
/// query here.
///
/// # Example
/// ```ignore
/// let version = with_timeout(
///     BridgeOperation::GetAppVersion,
///     Duration::from_secs(2),
///     api.get_app_version(),
/// )
/// .await?;
/// ```
pub async fn with_timeout<T, F>(
    operation: BridgeOperation,
    duration: Duration,
    query: F,
) -> BridgeResult<T>
where
    F: Future<Output = BridgeResult<T>>,
{
    match tokio::time::timeout(duration, query).await {
        Ok(result) => result,
        Err(_) => Err(BridgeError::TimedOut {
            operation,
            timeout_ms: duration.as_millis() as u64,
        }),
    }
}
