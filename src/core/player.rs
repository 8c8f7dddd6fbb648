//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! The duel has exactly two seats, `p1` and `p2`. The host always sits
//! in `p1` and the guest in `p2`.
//!
//! ## PlayerMap
//!
//! Fixed two-entry storage indexed by `PlayerId`. Serializes as
//! `{"p1": .., "p2": ..}` so snapshots keep the wire shape peers expect.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two fixed seats at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    #[serde(rename = "p1")]
    P1,
    #[serde(rename = "p2")]
    P2,
}

impl PlayerId {
    /// Both seats, in seat order.
    pub const ALL: [PlayerId; 2] = [PlayerId::P1, PlayerId::P2];

    /// The other seat.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    /// Normalize a role label handed out by the transport.
    ///
    /// ```
    /// use card_feel::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::from_role_label("host"), Some(PlayerId::P1));
    /// assert_eq!(PlayerId::from_role_label("guest"), Some(PlayerId::P2));
    /// assert_eq!(PlayerId::from_role_label("p2"), Some(PlayerId::P2));
    /// assert_eq!(PlayerId::from_role_label("spectator"), None);
    /// ```
    #[must_use]
    pub fn from_role_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "p1" | "host" => Some(PlayerId::P1),
            "p2" | "guest" => Some(PlayerId::P2),
            _ => None,
        }
    }

    /// Wire label (`p1` / `p2`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PlayerId::P1 => "p1",
            PlayerId::P2 => "p2",
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-player data storage for the two seats.
///
/// ## Example
///
/// ```
/// use card_feel::core::{PlayerId, PlayerMap};
///
/// let mut counts: PlayerMap<u32> = PlayerMap::new(|_| 0);
/// counts[PlayerId::P2] += 3;
///
/// assert_eq!(counts[PlayerId::P1], 0);
/// assert_eq!(counts[PlayerId::P2], 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    p1: T,
    p2: T,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            p1: factory(PlayerId::P1),
            p2: factory(PlayerId::P2),
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        match player {
            PlayerId::P1 => &self.p1,
            PlayerId::P2 => &self.p2,
        }
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        match player {
            PlayerId::P1 => &mut self.p1,
            PlayerId::P2 => &mut self.p2,
        }
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        [(PlayerId::P1, &self.p1), (PlayerId::P2, &self.p2)].into_iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
