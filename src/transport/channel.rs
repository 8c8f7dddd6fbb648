//! In-memory loopback link over tokio channels.
//!
//! Each side of a [`LoopbackLink`] is an [`Endpoint`]: an event queue
//! the peer drains, plus a [`ChannelTransport`] that encodes messages and
//! pushes them as frames into the other side's queue. Both sides share
//! one connected flag, so a disconnect is seen by both.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use super::{Transport, TransportError};
use crate::protocol::Message;
use crate::session::{LocalInput, PeerEvent, Seat};

/// Transport half of a loopback endpoint.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    remote: UnboundedSender<PeerEvent>,
    connected: Arc<AtomicBool>,
}

impl ChannelTransport {
    /// Drop the link. The other side receives `PeerEvent::Disconnected`.
    pub fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            debug!("loopback link disconnected");
            let _ = self.remote.send(PeerEvent::Disconnected);
        }
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: &Message) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        let frame = message.to_bytes()?;
        self.remote
            .send(PeerEvent::Frame(frame))
            .map_err(|_| TransportError::ChannelClosed)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// One side of a loopback link.
#[derive(Debug)]
pub struct Endpoint {
    /// Sends to the other side.
    pub transport: ChannelTransport,
    /// This side's event queue.
    pub events: UnboundedReceiver<PeerEvent>,
    /// Sender into this side's own queue, for local input.
    pub inbox: UnboundedSender<PeerEvent>,
}

impl Endpoint {
    /// Queue the seat assignment for this side.
    pub fn ready(&self, seat: Seat) {
        let _ = self.inbox.send(PeerEvent::Ready(seat));
    }

    /// Queue a local input for this side.
    pub fn input(&self, input: LocalInput) {
        let _ = self.inbox.send(PeerEvent::Input(input));
    }
}

/// A connected pair of endpoints.
#[derive(Debug)]
pub struct LoopbackLink {
    pub host: Endpoint,
    pub guest: Endpoint,
}

impl LoopbackLink {
    /// Connected link with no events queued yet.
    #[must_use]
    pub fn new() -> Self {
        let (host_tx, host_rx) = mpsc::unbounded_channel();
        let (guest_tx, guest_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(true));

        let host = Endpoint {
            transport: ChannelTransport {
                remote: guest_tx.clone(),
                connected: Arc::clone(&connected),
            },
            events: host_rx,
            inbox: host_tx.clone(),
        };
        let guest = Endpoint {
            transport: ChannelTransport {
                remote: host_tx,
                connected,
            },
            events: guest_rx,
            inbox: guest_tx,
        };
        Self { host, guest }
    }

    /// Connected link with both seat assignments already queued.
    #[must_use]
    pub fn connected() -> Self {
        let link = Self::new();
        link.host.ready(Seat::Host);
        link.guest.ready(Seat::Guest);
        link
    }
}

impl Default for LoopbackLink {
    fn default() -> Self {
        Self::new()
    }
}
