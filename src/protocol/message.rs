//! Messages exchanged between host and guest.
//!
//! Every frame is a JSON object `{"type": ..., "payload": ...}`. The
//! three kinds each travel one way only:
//!
//! | type     | direction      | payload                  |
//! |----------|----------------|--------------------------|
//! | `intent` | guest → host   | [`Intent`]               |
//! | `state`  | host → guest   | full [`GameState`]       |
//! | `reveal` | host → guest   | [`Reveal`]               |

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{GameState, PlayerId};
use crate::error::CodecError;

/// All protocol messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum Message {
    /// A guest request for the host to attempt a transition.
    Intent(Intent),
    /// Complete authoritative snapshot, never a diff.
    State(GameState),
    /// One-shot guess comparison.
    Reveal(Reveal),
}

impl Message {
    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(CodecError::Encode)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }

    /// Wire name of this message kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Message::Intent(_) => "intent",
            Message::State(_) => "state",
            Message::Reveal(_) => "reveal",
        }
    }
}

/// Guest intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum Intent {
    /// Play a card from the sender's hand.
    Play { id: CardId },
    /// End the sender's turn.
    End,
    /// Deal a new round.
    New,
    /// Name the hidden card. `from` overrides the sender as guesser.
    Guess {
        id: CardId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<PlayerId>,
    },
}

/// The guessed card and the real hidden card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reveal {
    pub chosen_id: CardId,
    pub hidden_id: CardId,
}
