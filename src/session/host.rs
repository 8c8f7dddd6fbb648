//! The authoritative side of a table.
//!
//! `HostSession` exclusively owns the live `GameState`. Each successful
//! transition is committed the same way: the full snapshot is broadcast
//! (followed by the reveal notification for a guess), then the one-shot
//! `is_new_round` flag is cleared. The committed snapshot is handed back
//! so the host can reconcile its own view from exactly what was sent.

use tracing::{debug, info, warn};

use crate::cards::CardId;
use crate::core::{GameRng, GameState, PlayerId, SessionConfig};
use crate::error::ConfigError;
use crate::protocol::{Intent, Message, Reveal};
use crate::rules::{RoundRules, TurnCheck};
use crate::transport::{Transport, TransportError};

/// A transition that was applied and broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed {
    /// The snapshot exactly as broadcast.
    pub snapshot: GameState,
    /// Reveal notification sent after the snapshot, for guesses.
    pub reveal: Option<Reveal>,
}

/// Host-side owner of the round state.
#[derive(Debug)]
pub struct HostSession<T> {
    transport: T,
    rules: RoundRules,
    rng: GameRng,
    state: Option<GameState>,
}

impl<T: Transport> HostSession<T> {
    /// Host for `config`. Fails if the config does not deal the whole deck.
    pub fn new(transport: T, config: &SessionConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_rules(
            transport,
            RoundRules::new(config)?,
            GameRng::from_seed_option(config.seed),
        ))
    }

    pub(crate) fn with_rules(transport: T, rules: RoundRules, rng: GameRng) -> Self {
        debug!(seed = rng.seed(), "host session created");
        Self {
            transport,
            rules,
            rng,
            state: None,
        }
    }

    /// Current authoritative state, if a round has been dealt.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// Deal a new round, replacing any round in progress.
    pub fn deal(&mut self) -> Committed {
        let previous = self.state.as_ref().map_or(0, |s| s.version);
        if self.state.as_ref().is_some_and(|s| !s.ended) {
            info!("round abandoned for a new deal");
        }
        let state = self.state.insert(self.rules.deal(&mut self.rng, previous));
        commit(&self.transport, state, None)
    }

    /// Play `card` for `actor`.
    pub fn play(&mut self, actor: PlayerId, card: CardId, check: TurnCheck) -> Option<Committed> {
        let state = self.state.as_mut()?;
        if !self.rules.play(state, actor, card, check) {
            return None;
        }
        Some(commit(&self.transport, state, None))
    }

    /// End `actor`'s turn.
    pub fn end_turn(&mut self, actor: PlayerId) -> Option<Committed> {
        let state = self.state.as_mut()?;
        self.rules.end_turn(state, actor)?;
        Some(commit(&self.transport, state, None))
    }

    /// Resolve `guesser`'s call of the hidden card.
    pub fn resolve_guess(&mut self, guesser: PlayerId, chosen: CardId) -> Option<Committed> {
        let state = self.state.as_mut()?;
        let outcome = self.rules.resolve_guess(state, guesser, chosen)?;
        let reveal = Reveal {
            chosen_id: outcome.chosen,
            hidden_id: outcome.hidden,
        };
        Some(commit(&self.transport, state, Some(reveal)))
    }

    /// Apply an intent received from the peer seated as `sender`.
    ///
    /// Play, end-turn and guess intents whose actor is not the current
    /// turn holder are dropped. A guess may name its guesser in `from`;
    /// that claim is taken at face value.
    pub fn handle_intent(&mut self, intent: Intent, sender: PlayerId) -> Option<Committed> {
        if let Intent::New = intent {
            return Some(self.deal());
        }

        let turn = self.state.as_ref()?.turn;
        match intent {
            Intent::Play { id } if turn == sender => self.play(sender, id, TurnCheck::TrustIntent),
            Intent::End if turn == sender => self.end_turn(sender),
            Intent::Guess { id, from } => {
                let guesser = from.unwrap_or(sender);
                if guesser != turn {
                    debug!(%guesser, %turn, "guess intent out of turn");
                    return None;
                }
                self.resolve_guess(guesser, id)
            }
            other => {
                debug!(intent = ?other, %sender, %turn, "intent out of turn");
                None
            }
        }
    }
}

/// Broadcast a settled state, then clear its one-shot flags.
fn commit<T: Transport>(transport: &T, state: &mut GameState, reveal: Option<Reveal>) -> Committed {
    let snapshot = state.clone();
    state.flags.is_new_round = false;

    log_send(transport.broadcast(&snapshot), "state");
    if let Some(reveal) = reveal {
        log_send(transport.send(&Message::Reveal(reveal)), "reveal");
    }

    Committed { snapshot, reveal }
}

/// Sending is fire-and-forget: failures are logged, never surfaced.
pub(crate) fn log_send(result: Result<(), TransportError>, kind: &str) {
    match result {
        Ok(()) => {}
        Err(TransportError::NotConnected) => debug!(kind, "not connected, message dropped"),
        Err(err) => warn!(kind, %err, "send failed, message dropped"),
    }
}
