//! Card identity and display metadata.
//!
//! A card is fully identified by `(suit, rank)`. Its wire form is the
//! suit letter followed by the rank, e.g. `g1` or `k7`.

use serde::{Deserialize, Serialize};

use crate::error::CardIdError;

/// Card suit, declared in canonical display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "g")]
    Green,
    #[serde(rename = "r")]
    Red,
    #[serde(rename = "y")]
    Yellow,
    #[serde(rename = "k")]
    Black,
}

impl Suit {
    /// All suits in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Green, Suit::Red, Suit::Yellow, Suit::Black];

    /// Wire letter for this suit.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Suit::Green => 'g',
            Suit::Red => 'r',
            Suit::Yellow => 'y',
            Suit::Black => 'k',
        }
    }

    /// Parse a wire letter (case-insensitive).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'g' => Some(Suit::Green),
            'r' => Some(Suit::Red),
            'y' => Some(Suit::Yellow),
            'k' => Some(Suit::Black),
            _ => None,
        }
    }

    /// Ranks that exist in this suit.
    #[must_use]
    pub const fn ranks(self) -> std::ops::RangeInclusive<u8> {
        match self {
            Suit::Black => 5..=7,
            _ => 1..=4,
        }
    }
}

/// Immutable card identity.
///
/// The derived ordering is the canonical display order: suit first,
/// then ascending rank.
///
/// ```
/// use card_feel::cards::CardId;
///
/// let id: CardId = " G3 ".parse().unwrap();
/// assert_eq!(id.to_string(), "g3");
/// assert!("k4".parse::<CardId>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CardId {
    suit: Suit,
    rank: u8,
}

impl CardId {
    /// Build a card id, rejecting ranks outside the suit.
    pub fn new(suit: Suit, rank: u8) -> Result<Self, CardIdError> {
        if suit.ranks().contains(&rank) {
            Ok(Self { suit, rank })
        } else {
            Err(CardIdError(format!("{}{}", suit.letter(), rank)))
        }
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.suit
    }

    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.suit.letter(), self.rank)
    }
}

impl std::str::FromStr for CardId {
    type Err = CardIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let suit = chars
            .next()
            .and_then(Suit::from_letter)
            .ok_or_else(|| CardIdError(s.to_string()))?;
        let rank: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| CardIdError(s.to_string()))?;
        Self::new(suit, rank).map_err(|_| CardIdError(s.to_string()))
    }
}

impl From<CardId> for String {
    fn from(id: CardId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CardId {
    type Error = CardIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Display metadata a peer needs to render a card without the deck logic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMeta {
    pub id: CardId,
    pub suit: Suit,
    pub rank: u8,
    /// Face text (the rank).
    pub text: String,
    /// Front sprite path.
    pub front_src: String,
}

impl CardMeta {
    /// Metadata for `id` with sprites under `asset_root`.
    #[must_use]
    pub fn new(id: CardId, asset_root: &str) -> Self {
        Self {
            id,
            suit: id.suit(),
            rank: id.rank(),
            text: id.rank().to_string(),
            front_src: format!("{}/{}.png", asset_root.trim_end_matches('/'), id),
        }
    }
}
