//! The non-authoritative side of a table.
//!
//! A guest never changes the round itself. It turns local input into
//! intents for the host and, for plays and end-turns, may render the
//! expected result right away. Deals and guesses wait for the host.

use tracing::debug;

use crate::cards::CardId;
use crate::core::SessionConfig;
use crate::error::ConfigError;
use crate::protocol::{Intent, Message};
use crate::render::ViewUpdate;
use crate::rules::RoundRules;
use crate::transport::Transport;

use super::host::log_send;
use super::view::LocalView;

/// Guest-side intent sender.
#[derive(Debug)]
pub struct GuestSession<T> {
    transport: T,
    rules: RoundRules,
    optimistic: bool,
}

impl<T: Transport> GuestSession<T> {
    pub fn new(transport: T, config: &SessionConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_rules(
            transport,
            RoundRules::new(config)?,
            config.optimistic_guest,
        ))
    }

    pub(crate) fn with_rules(transport: T, rules: RoundRules, optimistic: bool) -> Self {
        Self {
            transport,
            rules,
            optimistic,
        }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send_intent(&self, intent: Intent) {
        debug!(?intent, "sending intent");
        log_send(self.transport.send(&Message::Intent(intent)), "intent");
    }

    /// Ask the host to play `card`.
    pub fn play(&self, view: &mut LocalView, card: CardId) -> ViewUpdate {
        if !view.controls().play {
            debug!(%card, "play not available");
            return ViewUpdate::default();
        }
        let update = if self.optimistic {
            view.predict_play(&self.rules, card).unwrap_or_default()
        } else {
            ViewUpdate::default()
        };
        self.send_intent(Intent::Play { id: card });
        update
    }

    /// Ask the host to end the turn.
    pub fn end_turn(&self, view: &mut LocalView) -> ViewUpdate {
        if !view.controls().end {
            debug!("end turn not available");
            return ViewUpdate::default();
        }
        let update = if self.optimistic {
            view.predict_end_turn(&self.rules).unwrap_or_default()
        } else {
            ViewUpdate::default()
        };
        self.send_intent(Intent::End);
        update
    }

    /// Ask the host for a new round.
    pub fn new_round(&self) {
        self.send_intent(Intent::New);
    }

    /// Name the hidden card. Closes the picker; the outcome arrives from the host.
    pub fn guess(&self, view: &mut LocalView, card: CardId) -> ViewUpdate {
        if !view.controls().guess {
            debug!(%card, "guess not available");
            return ViewUpdate::default();
        }
        let update = view.close_guess_picker();
        self.send_intent(Intent::Guess {
            id: card,
            from: Some(view.viewer()),
        });
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, GameState, PlayerId};
    use crate::transport::MockTransport;
    use crate::zones::Zone;

    fn guest_turn_state() -> GameState {
        let rules = RoundRules::default();
        let mut rng = GameRng::new(1);
        loop {
            let state = rules.deal(&mut rng, 0);
            if state.turn == PlayerId::P2 {
                return state;
            }
        }
    }

    fn setup(optimistic: bool) -> (GuestSession<MockTransport>, MockTransport, LocalView, GameState) {
        let transport = MockTransport::new();
        let config = SessionConfig::new().with_optimistic_guest(optimistic);
        let guest = GuestSession::new(transport.clone(), &config).unwrap();
        let state = guest_turn_state();
        let mut view = LocalView::new(PlayerId::P2);
        view.apply_snapshot(state.clone());
        (guest, transport, view, state)
    }

    #[test]
    fn test_optimistic_play_renders_and_sends() {
        let (guest, transport, mut view, state) = setup(true);
        let card = state.hands[PlayerId::P2][0];

        let update = guest.play(&mut view, card);

        assert!(!update.is_empty());
        assert_eq!(view.board().cards_in(Zone::Stage), &[card]);
        assert_eq!(
            transport.last_sent(),
            Some(Message::Intent(Intent::Play { id: card }))
        );
    }

    #[test]
    fn test_pessimistic_play_only_sends() {
        let (guest, transport, mut view, state) = setup(false);
        let card = state.hands[PlayerId::P2][0];

        let update = guest.play(&mut view, card);

        assert!(update.is_empty());
        assert!(view.prediction().is_none());
        assert!(view.board().cards_in(Zone::Stage).is_empty());
        assert_eq!(transport.sent_messages().len(), 1);
    }

    #[test]
    fn test_optimistic_end_turn() {
        let (guest, transport, mut view, state) = setup(true);
        let card = state.hands[PlayerId::P2][0];
        guest.play(&mut view, card);
        guest.end_turn(&mut view);

        assert_eq!(view.effective().unwrap().turn, PlayerId::P1);
        assert_eq!(view.board().cards_in(Zone::Pile), &[card]);
        assert_eq!(transport.last_sent(), Some(Message::Intent(Intent::End)));
    }

    #[test]
    fn test_disabled_controls_send_nothing() {
        let (guest, transport, mut view, state) = setup(true);
        guest.end_turn(&mut view);

        let foreign = state.hands[PlayerId::P1][0];
        guest.play(&mut view, state.hands[PlayerId::P2][0]);
        guest.play(&mut view, foreign);

        // Only the first play was allowed; end turn came before any play.
        assert_eq!(transport.sent_messages().len(), 1);
    }

    #[test]
    fn test_guess_has_no_prediction() {
        let (guest, transport, mut view, state) = setup(true);
        let hidden = state.special.hidden.id;

        guest.guess(&mut view, hidden);

        assert!(view.prediction().is_none());
        assert!(!view.effective().unwrap().ended);
        assert_eq!(
            transport.last_sent(),
            Some(Message::Intent(Intent::Guess {
                id: hidden,
                from: Some(PlayerId::P2),
            }))
        );
    }

    #[test]
    fn test_new_round_request() {
        let (guest, transport, _, _) = setup(true);
        guest.new_round();
        assert_eq!(transport.last_sent(), Some(Message::Intent(Intent::New)));
    }
}
