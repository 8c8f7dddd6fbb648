//! # card-feel
//!
//! A two-player card duel with one authoritative host.
//!
//! ## Design Principles
//!
//! 1. **Host Authority**: Only the host mutates the round. The guest sends
//!    intents and renders whatever the host broadcasts.
//!
//! 2. **Full Snapshots**: Every accepted transition broadcasts the whole
//!    `GameState`. A snapshot always supersedes any local prediction.
//!
//! 3. **Idempotent Reconciliation**: Applying the same snapshot twice
//!    changes nothing on screen.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) snapshot clones via `im-rs` for
//!   broadcasting and guest prediction.
//!
//! - **Monotonic Versions**: Snapshot versions are strictly increasing
//!   millisecond stamps; stale snapshots are dropped.
//!
//! ## Modules
//!
//! - `cards`: Card identity, deck and catalog
//! - `core`: Players, RNG, configuration, round snapshot
//! - `rules`: Round transitions and control legality
//! - `zones`: Viewer zones and snapshot reconciliation
//! - `render`: Render operations and the `Renderer` seam
//! - `protocol`: Wire messages
//! - `transport`: `Transport` trait, loopback link, room codes
//! - `session`: Host, guest, local view and the event loop

pub mod cards;
pub mod core;
pub mod error;
pub mod protocol;
pub mod render;
pub mod rules;
pub mod session;
pub mod transport;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{GameRng, GameState, PlayerId, PlayerMap, SessionConfig};

pub use crate::cards::{CardCatalog, CardId, CardMeta, Suit, DECK_SIZE};

pub use crate::error::{CardIdError, CodecError, ConfigError};

pub use crate::rules::{controls, guess_candidates, Controls, RoundRules, TurnCheck};

pub use crate::zones::{reconcile, ReconcileMode, Zone, ZoneBoard, ZoneTargets};

pub use crate::render::{
    LogRenderer, Presentation, RecordingRenderer, RenderOp, Renderer, Sfx, TurnHint, ViewUpdate,
};

pub use crate::protocol::{Intent, Message, Reveal};

pub use crate::transport::{ChannelTransport, LoopbackLink, MockTransport, RoomCode, Transport, TransportError};

pub use crate::session::{
    Flow, GuestSession, HostSession, LocalInput, LocalView, Peer, PeerEvent, Seat,
};
