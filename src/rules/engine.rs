//! Round rules: the only code that mutates a `GameState`.
//!
//! Every transition is guard-then-mutate. An unmet precondition leaves the
//! state untouched and reports nothing more than `false`/`None`; a blocked
//! action is the same as a button that was never enabled.

use im::Vector;
use tracing::{debug, info};

use crate::cards::{build_catalog, full_deck, sort_canonical, CardId};
use crate::core::{
    next_version, GameRng, GameState, HiddenCard, PlayerId, PlayerMap, RoundFlags, SessionConfig,
    SpecialCards,
};
use crate::error::ConfigError;

/// How strictly `play` checks the actor against the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnCheck {
    /// Require `state.turn == actor`.
    Enforce,
    /// The caller vouches that the actor holds the turn; the move is
    /// applied to the turn holder. Card ownership and the one-play limit
    /// are still checked.
    TrustIntent,
}

/// Result of a resolved guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessOutcome {
    pub guesser: PlayerId,
    pub chosen: CardId,
    pub hidden: CardId,
    pub winner: PlayerId,
}

impl GuessOutcome {
    /// Did the guesser name the hidden card?
    #[must_use]
    pub fn correct(&self) -> bool {
        self.chosen == self.hidden
    }
}

/// Which controls a viewer may use right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub play: bool,
    pub end: bool,
    pub guess: bool,
    pub new: bool,
}

/// Dealing and transition rules for one table.
#[derive(Clone, Debug)]
pub struct RoundRules {
    starter_hand_size: usize,
    follower_hand_size: usize,
    asset_root: String,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self::from_valid(&SessionConfig::default())
    }
}

impl RoundRules {
    /// Rules for `config`. Hand sizes that would leave cards undealt are
    /// refused.
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: &SessionConfig) -> Self {
        Self {
            starter_hand_size: config.starter_hand_size,
            follower_hand_size: config.follower_hand_size,
            asset_root: config.asset_root.clone(),
        }
    }

    /// Deal a fresh round.
    ///
    /// Shuffles the full deck, sets aside the open and hidden specials,
    /// picks the starter at random and deals the starter's hand first.
    /// The result carries `flags.is_new_round` and a version greater than
    /// `previous_version`.
    pub fn deal(&self, rng: &mut GameRng, previous_version: u64) -> GameState {
        let mut deck = full_deck();
        rng.shuffle(&mut deck);

        let starter = if rng.gen_bool(0.5) {
            PlayerId::P1
        } else {
            PlayerId::P2
        };

        let open = deck[0];
        let hidden = deck[1];
        let mut cards = deck[2..].iter().copied();

        let mut starter_hand: Vec<CardId> = cards.by_ref().take(self.starter_hand_size).collect();
        let mut follower_hand: Vec<CardId> = cards.by_ref().take(self.follower_hand_size).collect();
        sort_canonical(&mut starter_hand);
        sort_canonical(&mut follower_hand);

        let hands = PlayerMap::new(|p| {
            let hand = if p == starter { &starter_hand } else { &follower_hand };
            hand.iter().copied().collect::<Vector<_>>()
        });

        let state = GameState {
            turn: starter,
            ended: false,
            winner: None,
            turn_has_played: false,
            hands,
            stage: PlayerMap::default(),
            special: SpecialCards {
                open,
                hidden: HiddenCard {
                    id: hidden,
                    revealed: false,
                },
            },
            card_catalog: build_catalog(deck.iter().copied(), &self.asset_root),
            flags: RoundFlags {
                is_new_round: true,
                ..RoundFlags::default()
            },
            version: next_version(previous_version),
        };

        info!(
            starter = %starter,
            open = %open,
            version = state.version,
            "dealt new round"
        );
        state
    }

    /// Move `card` from the actor's hand to their stage.
    pub fn play(
        &self,
        state: &mut GameState,
        actor: PlayerId,
        card: CardId,
        check: TurnCheck,
    ) -> bool {
        if state.ended {
            debug!(%actor, %card, "play ignored: round over");
            return false;
        }
        let actor = match check {
            TurnCheck::Enforce if state.turn != actor => {
                debug!(%actor, turn = %state.turn, "play ignored: not actor's turn");
                return false;
            }
            TurnCheck::Enforce => actor,
            TurnCheck::TrustIntent => state.turn,
        };
        if state.turn_has_played {
            debug!(%actor, %card, "play ignored: already played this turn");
            return false;
        }
        let Some(index) = state.hands[actor].index_of(&card) else {
            debug!(%actor, %card, "play ignored: card not in hand");
            return false;
        };

        state.hands[actor].remove(index);
        state.stage[actor].push_back(card);
        state.turn_has_played = true;
        state.stamp();
        debug!(%actor, %card, version = state.version, "played");
        true
    }

    /// Pass the actor's last played card to the opponent and flip the turn.
    ///
    /// Returns the passed card.
    pub fn end_turn(&self, state: &mut GameState, actor: PlayerId) -> Option<CardId> {
        if !state.is_turn_of(actor) || !state.turn_has_played {
            debug!(%actor, turn = %state.turn, "end turn ignored");
            return None;
        }
        let Some(card) = state.stage[actor].pop_back() else {
            debug!(%actor, "end turn ignored: empty stage");
            return None;
        };

        let opponent = actor.other();
        state.stage[opponent].push_back(card);
        state.turn = opponent;
        state.turn_has_played = false;
        state.stamp();
        debug!(%actor, %card, version = state.version, "turn ended");
        Some(card)
    }

    /// Reveal the hidden card and end the round on `guesser`'s call.
    pub fn resolve_guess(
        &self,
        state: &mut GameState,
        guesser: PlayerId,
        chosen: CardId,
    ) -> Option<GuessOutcome> {
        if state.ended {
            debug!(%guesser, %chosen, "guess ignored: round over");
            return None;
        }

        let hidden = state.special.hidden.id;
        let winner = if chosen == hidden {
            guesser
        } else {
            guesser.other()
        };

        state.special.hidden.revealed = true;
        state.winner = Some(winner);
        state.ended = true;
        state.turn_has_played = false;
        state.flags.resolved_by_guess = true;
        state.flags.chosen = Some(chosen);
        state.stamp();

        info!(%guesser, %chosen, %hidden, %winner, "round resolved by guess");
        Some(GuessOutcome {
            guesser,
            chosen,
            hidden,
            winner,
        })
    }
}

/// Controls available to `viewer`. With no state only a new round is possible.
#[must_use]
pub fn controls(state: Option<&GameState>, viewer: PlayerId) -> Controls {
    let Some(state) = state else {
        return Controls {
            new: true,
            ..Controls::default()
        };
    };
    let mine = state.is_turn_of(viewer);
    Controls {
        play: mine && !state.turn_has_played,
        end: mine && state.turn_has_played,
        guess: mine && !state.turn_has_played,
        new: true,
    }
}

/// Cards `viewer` could still name as the hidden one, in canonical order.
///
/// Everything the viewer can see is excluded: their own hand, both
/// stages and the open card.
#[must_use]
pub fn guess_candidates(state: &GameState, viewer: PlayerId) -> Vec<CardId> {
    full_deck()
        .into_iter()
        .filter(|card| {
            *card != state.special.open
                && !state.hands[viewer].contains(card)
                && !PlayerId::ALL
                    .iter()
                    .any(|&p| state.stage[p].contains(card))
        })
        .collect()
}
