//! Round rules.
//!
//! `RoundRules` owns every transition of a `GameState`: deal, play, end
//! turn and resolve guess. The legality queries `controls` and
//! `guess_candidates` tell a viewer which inputs are currently live.

pub mod engine;

pub use engine::{controls, guess_candidates, Controls, GuessOutcome, RoundRules, TurnCheck};
