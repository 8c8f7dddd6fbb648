//! Room codes used to pair a host with a guest.
//!
//! A room code is two digits. The host registers under a peer id derived
//! from it and the guest dials that id.

use std::fmt;

use crate::core::GameRng;

/// Two-digit room code, `01` through `99` (or `00` if typed in).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// Normalize user input: keep the digits, take the last two, pad to two.
    ///
    /// ```
    /// use card_feel::transport::RoomCode;
    ///
    /// assert_eq!(RoomCode::normalize("room 7").unwrap().as_str(), "07");
    /// assert_eq!(RoomCode::normalize("12345").unwrap().as_str(), "45");
    /// assert!(RoomCode::normalize("abc").is_none());
    /// ```
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        let tail: String = digits[digits.len().saturating_sub(2)..].iter().collect();
        Some(Self(format!("{tail:0>2}")))
    }

    /// Fresh random code in `01..=99`.
    pub fn generate(rng: &mut GameRng) -> Self {
        let n = rng.gen_range_usize(1..100);
        Self(format!("{n:02}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Peer id the host registers under.
    #[must_use]
    pub fn host_peer_id(&self) -> String {
        format!("pg-room-{}-host", self.0)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
