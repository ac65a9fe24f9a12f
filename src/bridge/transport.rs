// Message-passing link between the host and UI contexts.
//
// Requests travel UI -> host on a bounded mpsc channel, each carrying a
// oneshot for its reply. Menu events travel host -> UI on an unbounded
// channel so the host never waits on the UI. Both ends share a MenuClock so
// an event only reaches listeners that were registered before it was emitted.

use crate::bridge::contract::{BridgeOperation, BridgeResponse, BridgeResult, MenuChannel};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};

/// Default capacity of the request channel.
pub const REQUEST_BUFFER: usize = 32;

/// A request in flight from the UI to the host.
#[derive(Debug)]
pub struct BridgeEnvelope {
    pub operation: BridgeOperation,
    pub reply: oneshot::Sender<BridgeResult<BridgeResponse>>,
}

/// A menu occurrence, stamped with its place in the emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuEvent {
    pub channel: MenuChannel,
    pub seq: u64,
}

/// Emission counter shared by the producer and the listener registry.
///
/// `now()` is the sequence number of the latest emission; a listener
/// registered at `now() == n` only sees events with `seq > n`.
#[derive(Clone, Debug, Default)]
pub struct MenuClock(Arc<AtomicU64>);

impl MenuClock {
    pub fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Allocate the next sequence number for an emission on `channel`.
    pub fn stamp(&self, channel: MenuChannel) -> MenuEvent {
        let seq = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        MenuEvent { channel, seq }
    }
}

/// Host side of the link.
pub struct HostEnd {
    pub requests: mpsc::Receiver<BridgeEnvelope>,
    pub events: mpsc::UnboundedSender<MenuEvent>,
    pub clock: MenuClock,
}

/// UI side of the link.
pub struct UiEnd {
    pub requests: mpsc::Sender<BridgeEnvelope>,
    pub events: mpsc::UnboundedReceiver<MenuEvent>,
    pub clock: MenuClock,
}

/// Create a connected pair of link ends.
pub fn link(request_buffer: usize) -> (HostEnd, UiEnd) {
    let (request_tx, request_rx) = mpsc::channel(request_buffer);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let clock = MenuClock::default();

    (
        HostEnd {
            requests: request_rx,
            events: event_tx,
            clock: clock.clone(),
        },
        UiEnd {
            requests: request_tx,
            events: event_rx,
            clock,
        },
    )
}
