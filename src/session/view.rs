//! One peer's local view of the table.
//!
//! ## Confirmed vs predicted
//!
//! `LocalView` keeps the last confirmed snapshot from the host and, on a
//! guest, at most one local prediction layered on top of it. Everything
//! rendered is derived from the effective state (the prediction if there
//! is one, the confirmed snapshot otherwise). Every applied snapshot
//! discards the prediction: the host's word replaces it wholesale, field
//! by field merging never happens.
//!
//! ## Rebuild vs incremental
//!
//! The first application of a snapshot flagged `is_new_round` wipes and
//! rebuilds the board. Everything else is an incremental reconcile, which
//! makes re-applying a snapshot a no-op.

use tracing::debug;

use crate::cards::CardId;
use crate::core::{GameState, PlayerId};
use crate::protocol::Reveal;
use crate::render::{RenderOp, Sfx, TurnHint, ViewUpdate};
use crate::rules::{controls, guess_candidates, Controls, RoundRules, TurnCheck};
use crate::zones::{reconcile, ReconcileMode, ZoneBoard, ZoneTargets};

use super::gate::PresentationGate;

/// A local move rendered ahead of the host's confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictedAction {
    Play(CardId),
    EndTurn,
}

/// Predicted state, always superseded by the next confirmed snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prediction {
    pub action: PredictedAction,
    pub state: GameState,
}

/// Local view for one seat.
#[derive(Clone, Debug)]
pub struct LocalView {
    viewer: PlayerId,
    confirmed: Option<GameState>,
    prediction: Option<Prediction>,
    board: ZoneBoard,
    selected: Option<CardId>,
    shown_controls: Option<Controls>,
    shown_hint: Option<TurnHint>,
    gate: PresentationGate,
}

impl LocalView {
    #[must_use]
    pub fn new(viewer: PlayerId) -> Self {
        Self {
            viewer,
            confirmed: None,
            prediction: None,
            board: ZoneBoard::new(),
            selected: None,
            shown_controls: None,
            shown_hint: None,
            gate: PresentationGate::new(viewer),
        }
    }

    #[must_use]
    pub fn viewer(&self) -> PlayerId {
        self.viewer
    }

    /// Last snapshot received from the host.
    #[must_use]
    pub fn confirmed(&self) -> Option<&GameState> {
        self.confirmed.as_ref()
    }

    #[must_use]
    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    /// The state the view is rendering.
    #[must_use]
    pub fn effective(&self) -> Option<&GameState> {
        self.prediction
            .as_ref()
            .map(|p| &p.state)
            .or(self.confirmed.as_ref())
    }

    #[must_use]
    pub fn board(&self) -> &ZoneBoard {
        &self.board
    }

    #[must_use]
    pub fn selected(&self) -> Option<CardId> {
        self.selected
    }

    #[must_use]
    pub fn gate(&self) -> &PresentationGate {
        &self.gate
    }

    /// Controls enabled for the viewer right now.
    #[must_use]
    pub fn controls(&self) -> Controls {
        controls(self.effective(), self.viewer)
    }

    #[must_use]
    pub fn turn_hint(&self) -> TurnHint {
        match self.effective() {
            None => TurnHint::Waiting,
            Some(state) if state.ended => TurnHint::RoundOver,
            Some(state) if state.turn == self.viewer => TurnHint::Yours,
            Some(_) => TurnHint::Opponent,
        }
    }

    /// Replace local state with an authoritative snapshot.
    pub fn apply_snapshot(&mut self, state: GameState) -> ViewUpdate {
        let previous = self.confirmed.as_ref().map(|s| s.version);
        let new_round = state.flags.is_new_round && previous != Some(state.version);

        if !new_round {
            if let Some(previous) = previous.filter(|&v| state.version < v) {
                debug!(
                    viewer = %self.viewer,
                    incoming = state.version,
                    confirmed = previous,
                    "stale snapshot ignored"
                );
                return ViewUpdate::default();
            }
        }

        if let Some(prediction) = self.prediction.take() {
            debug!(viewer = %self.viewer, action = ?prediction.action, "prediction superseded");
        }

        let mode = if new_round {
            ReconcileMode::Rebuild
        } else {
            ReconcileMode::Incremental
        };
        let targets = ZoneTargets::for_viewer(&state, self.viewer);
        let mut update = reconcile(&mut self.board, &targets, mode);

        if new_round {
            self.selected = None;
            self.shown_controls = None;
            self.shown_hint = None;
            update.sfx.push(Sfx::CardDeal);
            update
                .presentations
                .extend(self.gate.on_new_round(state.special.open));
        }

        let gated = self.gate.on_state(&state);
        self.confirmed = Some(state);
        self.refresh_chrome(&mut update);
        update.presentations.extend(gated);
        update
    }

    /// Render a local play before the host confirms it.
    ///
    /// Returns `None` (and changes nothing) if the play is not legal on
    /// the effective state.
    pub fn predict_play(&mut self, rules: &RoundRules, card: CardId) -> Option<ViewUpdate> {
        let mut state = self.effective()?.clone();
        if !rules.play(&mut state, self.viewer, card, TurnCheck::Enforce) {
            return None;
        }
        Some(self.show_prediction(PredictedAction::Play(card), state))
    }

    /// Render a local end-turn before the host confirms it.
    pub fn predict_end_turn(&mut self, rules: &RoundRules) -> Option<ViewUpdate> {
        let mut state = self.effective()?.clone();
        rules.end_turn(&mut state, self.viewer)?;
        Some(self.show_prediction(PredictedAction::EndTurn, state))
    }

    fn show_prediction(&mut self, action: PredictedAction, state: GameState) -> ViewUpdate {
        let targets = ZoneTargets::for_viewer(&state, self.viewer);
        self.prediction = Some(Prediction { action, state });
        let mut update = reconcile(&mut self.board, &targets, ReconcileMode::Incremental);
        self.refresh_chrome(&mut update);
        update
    }

    /// Toggle selection of a hand card.
    pub fn select(&mut self, card: CardId) -> ViewUpdate {
        let mut update = ViewUpdate::default();
        let Some(state) = self.effective() else {
            return update;
        };
        if !self.controls().play || !state.hands[self.viewer].contains(&card) {
            return update;
        }

        if self.selected == Some(card) {
            self.selected = None;
        } else {
            self.selected = Some(card);
            update.sfx.push(Sfx::CardChoose);
        }
        update.ops.push(RenderOp::Selection(self.selected));
        update
    }

    /// Handle the host's reveal notification.
    pub fn on_reveal(&mut self, reveal: Reveal) -> ViewUpdate {
        ViewUpdate {
            presentations: self.gate.on_reveal(reveal.chosen_id, reveal.hidden_id),
            ..ViewUpdate::default()
        }
    }

    /// Open the guess picker if a guess is currently allowed.
    pub fn open_guess_picker(&mut self) -> ViewUpdate {
        let mut update = ViewUpdate::default();
        if !self.controls().guess {
            return update;
        }
        if let Some(state) = self.effective() {
            let candidates = guess_candidates(state, self.viewer);
            update.presentations = self.gate.open_picker(candidates);
        }
        update
    }

    pub fn close_guess_picker(&mut self) -> ViewUpdate {
        ViewUpdate {
            presentations: self.gate.close_picker(),
            ..ViewUpdate::default()
        }
    }

    /// Sync selection, controls and turn hint with the effective state.
    fn refresh_chrome(&mut self, update: &mut ViewUpdate) {
        let controls = self.controls();

        if let Some(card) = self.selected {
            let still_held = self
                .effective()
                .is_some_and(|s| s.hands[self.viewer].contains(&card));
            if !still_held || !controls.play {
                self.selected = None;
                update.ops.push(RenderOp::Selection(None));
            }
        }

        if !controls.guess && self.gate.picker_open() {
            update.presentations.extend(self.gate.close_picker());
        }

        if self.shown_controls != Some(controls) {
            self.shown_controls = Some(controls);
            update.ops.push(RenderOp::Controls(controls));
        }

        let hint = self.turn_hint();
        if self.shown_hint != Some(hint) {
            self.shown_hint = Some(hint);
            update.ops.push(RenderOp::TurnHint(hint));
        }
    }
}
