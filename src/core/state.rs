//! The authoritative round snapshot.
//!
//! ## GameState
//!
//! One aggregate holds everything about a live round: whose turn it is,
//! both hands, both stages, the open and hidden specials, the card
//! catalog, one-shot flags and a version stamp. The host is the only
//! writer; every broadcast carries the whole value, never a diff.
//!
//! Uses `im` persistent collections so that cloning a snapshot for
//! broadcast or for a guest-side prediction is O(1).
//!
//! ## Card location partition
//!
//! Every card of the deck sits in exactly one of: `hands[p1]`,
//! `hands[p2]`, `stage[p1]`, `stage[p2]`, the open slot or the hidden
//! slot. [`GameState::partition_holds`] checks this.

use std::time::{SystemTime, UNIX_EPOCH};

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap};
use crate::cards::{full_deck, CardCatalog, CardId, DECK_SIZE};

/// The face-down special card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenCard {
    pub id: CardId,
    pub revealed: bool,
}

/// The two special cards set aside at deal time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCards {
    /// Publicly known card.
    pub open: CardId,
    /// Card whose identity the guess action targets.
    pub hidden: HiddenCard,
}

/// Transient signaling bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundFlags {
    /// Set for exactly one outgoing broadcast after a deal.
    #[serde(default)]
    pub is_new_round: bool,
    /// The round ended through a guess rather than normal play.
    #[serde(default)]
    pub resolved_by_guess: bool,
    /// The card the guesser named.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen: Option<CardId>,
}

/// Full authoritative round state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Acting player.
    pub turn: PlayerId,

    /// Once true, hands, stages and turn are frozen.
    pub ended: bool,

    /// Set only when `ended`.
    #[serde(default)]
    pub winner: Option<PlayerId>,

    /// The acting player already moved a card to their stage this turn.
    pub turn_has_played: bool,

    /// Cards held per player.
    pub hands: PlayerMap<Vector<CardId>>,

    /// Cards played this round and not yet passed on, per player.
    pub stage: PlayerMap<Vector<CardId>>,

    pub special: SpecialCards,

    /// Metadata for every card of the round.
    pub card_catalog: CardCatalog,

    #[serde(default)]
    pub flags: RoundFlags,

    /// Ordering marker, strictly increasing on the host.
    pub version: u64,
}

impl GameState {
    /// True when every deck card appears exactly once across all locations.
    #[must_use]
    pub fn partition_holds(&self) -> bool {
        let mut seen = FxHashSet::default();
        let mut total = 0usize;

        let located = PlayerId::ALL
            .iter()
            .flat_map(|&p| self.hands[p].iter().chain(self.stage[p].iter()))
            .copied()
            .chain([self.special.open, self.special.hidden.id]);

        for card in located {
            total += 1;
            if !seen.insert(card) {
                return false;
            }
        }

        total == DECK_SIZE && full_deck().iter().all(|c| seen.contains(c))
    }

    /// Is it `player`'s live turn?
    #[must_use]
    pub fn is_turn_of(&self, player: PlayerId) -> bool {
        !self.ended && self.turn == player
    }

    /// Bump `version` past its current value.
    pub fn stamp(&mut self) {
        self.version = next_version(self.version);
    }
}

/// A version greater than `previous`, tracking wall-clock milliseconds.
#[must_use]
pub fn next_version(previous: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
    now.max(previous.saturating_add(1))
}
