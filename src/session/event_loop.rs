//! Driving a [`Peer`] from its event queue.
//!
//! Events are handled strictly one at a time; each runs to completion
//! before the next is taken off the queue.

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::render::Renderer;
use crate::transport::Transport;

use super::event::PeerEvent;
use super::peer::{Flow, Peer};

/// Run until the peer disconnects or every sender is gone.
pub async fn run<T, R>(peer: &mut Peer<T, R>, events: &mut UnboundedReceiver<PeerEvent>)
where
    T: Transport,
    R: Renderer,
{
    while let Some(event) = events.recv().await {
        if peer.handle(event) == Flow::Stop {
            return;
        }
    }
    debug!("event queue closed");
}

/// Handle everything already queued without waiting.
///
/// Returns `Flow::Stop` once the peer has stopped or the queue is closed.
pub fn pump<T, R>(peer: &mut Peer<T, R>, events: &mut UnboundedReceiver<PeerEvent>) -> Flow
where
    T: Transport,
    R: Renderer,
{
    loop {
        match events.try_recv() {
            Ok(event) => {
                if peer.handle(event) == Flow::Stop {
                    return Flow::Stop;
                }
            }
            Err(TryRecvError::Empty) => return Flow::Continue,
            Err(TryRecvError::Disconnected) => {
                debug!("event queue closed");
                return Flow::Stop;
            }
        }
    }
}
