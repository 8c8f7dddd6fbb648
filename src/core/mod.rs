//! Core types: players, RNG, configuration and the round snapshot.
//!
//! Everything here is transport- and rendering-agnostic. The round rules
//! in `rules` mutate a `GameState`; sessions own one.

pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use config::SessionConfig;
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::{next_version, GameState, HiddenCard, RoundFlags, SpecialCards};
