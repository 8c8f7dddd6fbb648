//! Mock transport for testing.
//!
//! Captures sent messages for verification and can be told to fail.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Transport, TransportError};
use crate::core::GameState;
use crate::protocol::Message;

/// Mock transport for testing.
///
/// Clones share the same recorded state.
#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug)]
struct MockTransportInner {
    connected: bool,
    sent_messages: Vec<Message>,
    fail_next_send: Option<String>,
}

impl Default for MockTransportInner {
    fn default() -> Self {
        Self {
            connected: true,
            sent_messages: Vec::new(),
            fail_next_send: None,
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner::default())),
        }
    }
}

impl MockTransport {
    /// Create a connected mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get all messages that were sent.
    pub fn sent_messages(&self) -> Vec<Message> {
        self.lock().sent_messages.clone()
    }

    /// Get the last message that was sent.
    pub fn last_sent(&self) -> Option<Message> {
        self.lock().sent_messages.last().cloned()
    }

    /// Snapshots sent so far, in order.
    pub fn sent_states(&self) -> Vec<GameState> {
        self.lock()
            .sent_messages
            .iter()
            .filter_map(|m| match m {
                Message::State(state) => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    /// Remove and return everything sent so far.
    pub fn take_sent(&self) -> Vec<Message> {
        std::mem::take(&mut self.lock().sent_messages)
    }

    pub fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    /// Cause the next send() to fail with the given error.
    pub fn fail_next_send(&self, error: &str) {
        self.lock().fail_next_send = Some(error.to_string());
    }
}

impl Transport for MockTransport {
    fn send(&self, message: &Message) -> Result<(), TransportError> {
        let mut inner = self.lock();

        if !inner.connected {
            return Err(TransportError::NotConnected);
        }

        if let Some(error) = inner.fail_next_send.take() {
            return Err(TransportError::SendFailed(error));
        }

        inner.sent_messages.push(message.clone());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }
}
