//! Transport abstraction between the two peers.
//!
//! A transport delivers whole messages to the other peer, reliably and in
//! order while connected. There is no retry or acknowledgement on top:
//! sending while disconnected fails with [`TransportError::NotConnected`]
//! and sessions treat that as a no-op.
//!
//! # Implementations
//!
//! - [`ChannelTransport`]: in-memory loopback over tokio channels
//! - [`MockTransport`]: records sent messages for tests

mod channel;
mod lobby;
mod mock;

pub use channel::{ChannelTransport, Endpoint, LoopbackLink};
pub use lobby::RoomCode;
pub use mock::MockTransport;

use thiserror::Error;

use crate::core::GameState;
use crate::error::CodecError;
use crate::protocol::Message;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Not connected.
    #[error("not connected")]
    NotConnected,

    /// The receiving side has gone away.
    #[error("channel closed")]
    ChannelClosed,

    /// Message could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Delivers messages to the other peer.
pub trait Transport {
    /// Send one message to the other peer.
    fn send(&self, message: &Message) -> Result<(), TransportError>;

    /// Check if currently connected.
    fn is_connected(&self) -> bool;

    /// Host convenience for sending a full snapshot.
    fn broadcast(&self, state: &GameState) -> Result<(), TransportError> {
        self.send(&Message::State(state.clone()))
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, message: &Message) -> Result<(), TransportError> {
        (**self).send(message)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}
