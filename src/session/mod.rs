//! Sessions: host authority, guest prediction, and the per-peer event loop.
//!
//! - `HostSession`: owns the live round, applies rules and broadcasts
//! - `GuestSession`: turns local input into intents
//! - `LocalView`: confirmed snapshot, optional prediction and the board
//! - `PresentationGate`: ordering of round overlays
//! - `Peer`: seat assignment and dispatch of every queued event

mod event;
pub mod event_loop;
mod gate;
mod guest;
mod host;
mod peer;
mod view;

pub use event::{LocalInput, PeerEvent, Seat};
pub use event_loop::{pump, run};
pub use gate::PresentationGate;
pub use guest::GuestSession;
pub use host::{Committed, HostSession};
pub use peer::{Authority, Flow, Peer};
pub use view::{LocalView, PredictedAction, Prediction};
