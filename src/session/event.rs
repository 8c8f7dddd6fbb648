//! Events a peer consumes, one at a time, from its queue.

use crate::cards::CardId;
use crate::core::PlayerId;

/// The seat a peer was assigned once the connection is up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Seat {
    Host,
    Guest,
}

impl Seat {
    /// Player id that plays from this seat.
    #[must_use]
    pub const fn role(self) -> PlayerId {
        match self {
            Seat::Host => PlayerId::P1,
            Seat::Guest => PlayerId::P2,
        }
    }

    #[must_use]
    pub const fn is_host(self) -> bool {
        matches!(self, Seat::Host)
    }

    /// Seat for a transport role label (`host`, `guest`, `p1`, `p2`).
    #[must_use]
    pub fn from_role_label(label: &str) -> Option<Self> {
        PlayerId::from_role_label(label).map(|p| match p {
            PlayerId::P1 => Seat::Host,
            PlayerId::P2 => Seat::Guest,
        })
    }
}

/// Something the local player did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalInput {
    /// Toggle selection of a hand card.
    Select(CardId),
    /// Play the selected card.
    Play,
    EndTurn,
    NewRound,
    OpenGuessPicker,
    CloseGuessPicker,
    /// Name the hidden card.
    Guess(CardId),
}

/// One unit of work for a peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerEvent {
    /// Connection established and seat assigned.
    Ready(Seat),
    /// Raw frame from the other peer.
    Frame(Vec<u8>),
    Input(LocalInput),
    /// The other peer is gone.
    Disconnected,
}
