//! Session configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! starter_hand_size = 7
//! follower_hand_size = 6
//! seed = 42
//! optimistic_guest = true
//! asset_root = "assets/cards"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::DECK_SIZE;
use crate::error::ConfigError;

/// Cards set aside as the open and hidden specials each round.
const SPECIAL_CARDS: usize = 2;

/// Configuration shared by host and guest sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cards dealt to the starting player.
    pub starter_hand_size: usize,

    /// Cards dealt to the other player.
    pub follower_hand_size: usize,

    /// Fixed RNG seed. `None` draws a seed from OS entropy.
    pub seed: Option<u64>,

    /// Render guest plays and end-turns before the host confirms them.
    pub optimistic_guest: bool,

    /// Directory prefix for card front sprites.
    pub asset_root: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starter_hand_size: 7,
            follower_hand_size: 6,
            seed: None,
            optimistic_guest: true,
            asset_root: "assets/cards".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_hand_sizes(mut self, starter: usize, follower: usize) -> Self {
        self.starter_hand_size = starter;
        self.follower_hand_size = follower;
        self
    }

    #[must_use]
    pub fn with_optimistic_guest(mut self, enabled: bool) -> Self {
        self.optimistic_guest = enabled;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that a deal with these sizes places every card of the deck.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starter_hand_size == 0 {
            return Err(ConfigError::Invalid(
                "starter_hand_size must be at least 1".to_string(),
            ));
        }
        let dealt = self.starter_hand_size + self.follower_hand_size + SPECIAL_CARDS;
        if dealt != DECK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "hands of {} and {} plus {} specials deal {} cards, deck has {}",
                self.starter_hand_size, self.follower_hand_size, SPECIAL_CARDS, dealt, DECK_SIZE
            )));
        }
        Ok(())
    }
}
