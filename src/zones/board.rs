//! The local board: which card element sits in which zone, in what order.
//!
//! `ZoneBoard` is the viewer-side mirror of what has been rendered. It
//! knows nothing about rules; the reconciler diffs it against a snapshot
//! and rewrites it to match.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// A rendered zone, seen from the viewer's seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    /// The viewer's own hand.
    Hand,
    /// The viewer's own stage.
    Stage,
    /// The opponent's stage.
    Pile,
    /// The open special card.
    Open,
    /// The hidden special card.
    Hidden,
}

impl Zone {
    /// Zones in reconciliation order.
    pub const ALL: [Zone; 5] = [Zone::Hand, Zone::Stage, Zone::Pile, Zone::Open, Zone::Hidden];

    /// Special slots hold exactly one card and never animate arrivals.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(self, Zone::Open | Zone::Hidden)
    }
}

/// Card element placement across the viewer's zones.
///
/// ```
/// use card_feel::zones::{Zone, ZoneBoard};
///
/// let mut board = ZoneBoard::new();
/// let g1 = "g1".parse().unwrap();
/// let g2 = "g2".parse().unwrap();
///
/// board.place(g1, Zone::Hand, 0);
/// board.place(g2, Zone::Hand, 0);
/// assert_eq!(board.cards_in(Zone::Hand), &[g2, g1]);
///
/// assert_eq!(board.move_to(g1, Zone::Stage, 0), Some(Zone::Hand));
/// assert_eq!(board.zone_of(g1), Some(Zone::Stage));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneBoard {
    /// Card → zone it is rendered in.
    locations: FxHashMap<CardId, Zone>,

    /// Rendered order per zone.
    order: FxHashMap<Zone, Vec<CardId>>,

    /// Cards rendered back-up.
    face_down: FxHashSet<CardId>,

    /// Placeholder count for the opponent's hand. `None` until first drawn.
    opponent_hand: Option<usize>,

    /// Pile contents as of the previous reconciliation.
    seen_pile: FxHashSet<CardId>,
}

impl ZoneBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card element to `zone` at `index` (clamped to the zone size).
    ///
    /// A card already on the board is relocated instead.
    pub fn place(&mut self, card: CardId, zone: Zone, index: usize) {
        if self.locations.contains_key(&card) {
            self.move_to(card, zone, index);
            return;
        }
        self.locations.insert(card, zone);
        insert_clamped(self.order.entry(zone).or_default(), card, index);
    }

    /// Move a card element to `zone` at `index`.
    ///
    /// Returns the zone it came from, or `None` if the card isn't on the board.
    pub fn move_to(&mut self, card: CardId, zone: Zone, index: usize) -> Option<Zone> {
        let old_zone = self.locations.get(&card).copied()?;

        if let Some(order) = self.order.get_mut(&old_zone) {
            order.retain(|&c| c != card);
        }
        self.locations.insert(card, zone);
        insert_clamped(self.order.entry(zone).or_default(), card, index);

        Some(old_zone)
    }

    /// Remove a card element entirely.
    ///
    /// Returns the zone it was in, or `None` if not found.
    pub fn remove(&mut self, card: CardId) -> Option<Zone> {
        let zone = self.locations.remove(&card)?;
        if let Some(order) = self.order.get_mut(&zone) {
            order.retain(|&c| c != card);
        }
        self.face_down.remove(&card);
        Some(zone)
    }

    /// Drop every element and counter.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.order.clear();
        self.face_down.clear();
        self.opponent_hand = None;
        self.seen_pile.clear();
    }

    /// Get the zone a card is rendered in.
    #[must_use]
    pub fn zone_of(&self, card: CardId) -> Option<Zone> {
        self.locations.get(&card).copied()
    }

    /// Rendered cards of a zone, in order.
    #[must_use]
    pub fn cards_in(&self, zone: Zone) -> &[CardId] {
        self.order.get(&zone).map_or(&[], Vec::as_slice)
    }

    /// Index of `card` within its zone.
    #[must_use]
    pub fn position_of(&self, card: CardId) -> Option<usize> {
        let zone = self.zone_of(card)?;
        self.cards_in(zone).iter().position(|&c| c == card)
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.locations.contains_key(&card)
    }

    #[must_use]
    pub fn is_face_down(&self, card: CardId) -> bool {
        self.face_down.contains(&card)
    }

    /// Set a card's facing. Returns true if it changed.
    pub fn set_face_down(&mut self, card: CardId, face_down: bool) -> bool {
        if face_down {
            self.face_down.insert(card)
        } else {
            self.face_down.remove(&card)
        }
    }

    #[must_use]
    pub fn opponent_hand(&self) -> Option<usize> {
        self.opponent_hand
    }

    /// Set the opponent placeholder count. Returns true if it changed.
    pub fn set_opponent_hand(&mut self, count: usize) -> bool {
        let changed = self.opponent_hand != Some(count);
        self.opponent_hand = Some(count);
        changed
    }

    /// Record the current pile, returning cards that were not in the previous one.
    pub fn note_pile(&mut self, pile: &[CardId]) -> Vec<CardId> {
        let fresh: Vec<CardId> = pile
            .iter()
            .copied()
            .filter(|c| !self.seen_pile.contains(c))
            .collect();
        self.seen_pile = pile.iter().copied().collect();
        fresh
    }
}

fn insert_clamped(order: &mut Vec<CardId>, card: CardId, index: usize) {
    let idx = index.min(order.len());
    order.insert(idx, card);
}
