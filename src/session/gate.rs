//! Sequencing of round overlays.
//!
//! Overlays must not trip over each other: the end-of-round overlay of a
//! guessed round waits for the reveal comparison, and no end-of-round
//! overlay covers an open guess picker. `PresentationGate` holds just
//! enough per-round memory to enforce that, whatever order the `state`
//! and `reveal` messages arrive in.

use crate::cards::CardId;
use crate::core::{GameState, PlayerId};
use crate::render::Presentation;

/// Per-round overlay bookkeeping for one viewer.
#[derive(Clone, Debug)]
pub struct PresentationGate {
    viewer: PlayerId,
    /// Winner of the last seen ended state.
    ended_winner: Option<PlayerId>,
    resolved_by_guess: bool,
    reveal_shown: bool,
    round_over_shown: bool,
    picker_open: bool,
}

impl PresentationGate {
    #[must_use]
    pub fn new(viewer: PlayerId) -> Self {
        Self {
            viewer,
            ended_winner: None,
            resolved_by_guess: false,
            reveal_shown: false,
            round_over_shown: false,
            picker_open: false,
        }
    }

    #[must_use]
    pub fn picker_open(&self) -> bool {
        self.picker_open
    }

    #[must_use]
    pub fn round_over_shown(&self) -> bool {
        self.round_over_shown
    }

    /// A freshly dealt round is on screen.
    pub fn on_new_round(&mut self, open: CardId) -> Vec<Presentation> {
        let mut out = Vec::new();
        if self.round_over_shown {
            out.push(Presentation::DismissRoundOver);
        }
        if self.picker_open {
            out.push(Presentation::CloseGuessPicker);
        }
        *self = Self::new(self.viewer);
        out.push(Presentation::RoundIntro { open });
        out
    }

    /// A snapshot has been reconciled.
    pub fn on_state(&mut self, state: &GameState) -> Vec<Presentation> {
        let mut out = Vec::new();
        if state.ended {
            self.ended_winner = state.winner;
            self.resolved_by_guess = state.flags.resolved_by_guess;
        } else {
            self.ended_winner = None;
            self.resolved_by_guess = false;
            if self.round_over_shown {
                self.round_over_shown = false;
                out.push(Presentation::DismissRoundOver);
            }
        }
        self.flush_round_over(&mut out);
        out
    }

    /// The reveal notification has arrived (or, on the host, was just produced).
    pub fn on_reveal(&mut self, chosen: CardId, hidden: CardId) -> Vec<Presentation> {
        let mut out = Vec::new();
        if !self.reveal_shown {
            self.reveal_shown = true;
            out.push(Presentation::RevealComparison { chosen, hidden });
        }
        self.flush_round_over(&mut out);
        out
    }

    /// Open the guess picker with `candidates`.
    pub fn open_picker(&mut self, candidates: Vec<CardId>) -> Vec<Presentation> {
        if self.picker_open {
            return Vec::new();
        }
        self.picker_open = true;
        vec![Presentation::GuessPicker { candidates }]
    }

    /// Close the guess picker and release any deferred end-of-round overlay.
    pub fn close_picker(&mut self) -> Vec<Presentation> {
        let mut out = Vec::new();
        if self.picker_open {
            self.picker_open = false;
            out.push(Presentation::CloseGuessPicker);
        }
        self.flush_round_over(&mut out);
        out
    }

    fn flush_round_over(&mut self, out: &mut Vec<Presentation>) {
        let Some(winner) = self.ended_winner else {
            return;
        };
        if self.round_over_shown || self.picker_open {
            return;
        }
        if self.resolved_by_guess && !self.reveal_shown {
            return;
        }
        self.round_over_shown = true;
        out.push(Presentation::RoundOver {
            winner,
            viewer_won: winner == self.viewer,
        });
    }
}
