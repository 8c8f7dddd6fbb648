//! Round rule integration tests.
//!
//! Random sequences of plays, end-turns and guesses, legal or not, must
//! never break the card partition or the version ordering.

use card_feel::cards::full_deck;
use card_feel::core::{GameRng, GameState, PlayerId};
use card_feel::rules::{controls, guess_candidates, RoundRules, TurnCheck};
use card_feel::SessionConfig;
use proptest::prelude::*;

#[derive(Clone, Copy, Debug)]
enum Step {
    Play { p2: bool, card: usize },
    End { p2: bool },
    Guess { p2: bool, card: usize },
}

fn actor(p2: bool) -> PlayerId {
    if p2 {
        PlayerId::P2
    } else {
        PlayerId::P1
    }
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (any::<bool>(), 0usize..15).prop_map(|(p2, card)| Step::Play { p2, card }),
        4 => any::<bool>().prop_map(|p2| Step::End { p2 }),
        1 => (any::<bool>(), 0usize..15).prop_map(|(p2, card)| Step::Guess { p2, card }),
    ]
}

/// Apply `step`; returns whether the state changed.
fn apply(rules: &RoundRules, state: &mut GameState, step: Step) -> bool {
    let deck = full_deck();
    match step {
        Step::Play { p2, card } => rules.play(state, actor(p2), deck[card], TurnCheck::Enforce),
        Step::End { p2 } => rules.end_turn(state, actor(p2)).is_some(),
        Step::Guess { p2, card } => rules.resolve_guess(state, actor(p2), deck[card]).is_some(),
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_partition_always_holds(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 0..60)) {
        let rules = RoundRules::default();
        let mut state = rules.deal(&mut GameRng::new(seed), 0);
        prop_assert!(state.partition_holds());

        for step in steps {
            apply(&rules, &mut state, step);
            prop_assert!(state.partition_holds());
        }
    }

    #[test]
    fn prop_versions_only_move_on_change(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 0..60)) {
        let rules = RoundRules::default();
        let mut state = rules.deal(&mut GameRng::new(seed), 0);

        for step in steps {
            let before = state.clone();
            if apply(&rules, &mut state, step) {
                prop_assert!(state.version > before.version);
            } else {
                prop_assert_eq!(&state, &before);
            }
        }
    }

    #[test]
    fn prop_one_play_per_turn(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 0..60)) {
        let rules = RoundRules::default();
        let mut state = rules.deal(&mut GameRng::new(seed), 0);

        for step in steps {
            let before = state.clone();
            apply(&rules, &mut state, step);
            if state.turn == before.turn {
                let grown = state.stage[state.turn].len().saturating_sub(before.stage[before.turn].len());
                prop_assert!(grown <= 1);
                if before.turn_has_played {
                    prop_assert!(grown == 0);
                }
            }
        }
    }

    #[test]
    fn prop_end_turn_alternates(seed in any::<u64>(), steps in prop::collection::vec(step_strategy(), 0..60)) {
        let rules = RoundRules::default();
        let mut state = rules.deal(&mut GameRng::new(seed), 0);

        for step in steps {
            let before = state.turn;
            let ended_turn = matches!(step, Step::End { .. }) && apply(&rules, &mut state, step);
            if ended_turn {
                prop_assert_eq!(state.turn, before.other());
            } else if !matches!(step, Step::End { .. }) {
                apply(&rules, &mut state, step);
                prop_assert_eq!(state.turn, before);
            }
        }
    }

    #[test]
    fn prop_nothing_changes_after_end(seed in any::<u64>(), guess in 0usize..15, steps in prop::collection::vec(step_strategy(), 0..30)) {
        let rules = RoundRules::default();
        let mut state = rules.deal(&mut GameRng::new(seed), 0);
        let guesser = state.turn;
        rules.resolve_guess(&mut state, guesser, full_deck()[guess]);
        prop_assert!(state.ended);

        let frozen = state.clone();
        for step in steps {
            prop_assert!(!apply(&rules, &mut state, step));
        }
        prop_assert_eq!(state, frozen);
    }
}

// =============================================================================
// Deal
// =============================================================================

#[test]
fn test_deal_sizes_follow_config() {
    let config = SessionConfig::new().with_hand_sizes(8, 5);
    let rules = RoundRules::new(&config).unwrap();
    let state = rules.deal(&mut GameRng::new(5), 0);

    assert_eq!(state.hands[state.turn].len(), 8);
    assert_eq!(state.hands[state.turn.other()].len(), 5);
    assert!(state.stage.iter().all(|(_, s)| s.is_empty()));
    assert!(state.flags.is_new_round);
    assert_eq!(state.card_catalog.len(), 15);
}

#[test]
fn test_same_seed_same_deal() {
    let rules = RoundRules::default();
    let a = rules.deal(&mut GameRng::new(99), 0);
    let b = rules.deal(&mut GameRng::new(99), 0);
    assert_eq!(a.hands, b.hands);
    assert_eq!(a.special, b.special);
    assert_eq!(a.turn, b.turn);
}

#[test]
fn test_redeal_version_strictly_greater() {
    let rules = RoundRules::default();
    let mut rng = GameRng::new(1);
    let first = rules.deal(&mut rng, 0);
    let second = rules.deal(&mut rng, first.version);
    assert!(second.version > first.version);
}

// =============================================================================
// Full Turn Cycle
// =============================================================================

#[test]
fn test_card_travels_to_opponent_hand() {
    let rules = RoundRules::default();
    let mut state = rules.deal(&mut GameRng::new(21), 0);
    let starter = state.turn;
    let card = state.hands[starter][0];

    assert!(rules.play(&mut state, starter, card, TurnCheck::Enforce));
    assert!(controls(Some(&state), starter).end);
    assert_eq!(rules.end_turn(&mut state, starter), Some(card));

    assert_eq!(state.turn, starter.other());
    assert!(state.hands[starter.other()].contains(&card));
    assert!(state.stage[starter].is_empty());
    assert!(!state.turn_has_played);
}

#[test]
fn test_candidates_shrink_with_visible_cards() {
    let rules = RoundRules::default();
    let mut state = rules.deal(&mut GameRng::new(4), 0);
    let viewer = state.turn;
    let before = guess_candidates(&state, viewer);

    // Own hand and open card are excluded.
    assert_eq!(before.len(), 15 - 1 - state.hands[viewer].len());
    assert!(before.contains(&state.special.hidden.id));

    let card = state.hands[viewer][0];
    rules.play(&mut state, viewer, card, TurnCheck::Enforce);
    rules.end_turn(&mut state, viewer);

    // The passed card is in the opponent's hand now.
    let opponent = viewer.other();
    let theirs = guess_candidates(&state, opponent);
    assert!(!theirs.contains(&card));
    assert!(theirs.contains(&state.special.hidden.id));
}

#[test]
fn test_wrong_guess_gives_round_to_opponent() {
    let rules = RoundRules::default();
    let mut state = rules.deal(&mut GameRng::new(8), 0);
    let guesser = state.turn;
    let wrong = state.special.open;

    let outcome = rules.resolve_guess(&mut state, guesser, wrong).unwrap();

    assert!(!outcome.correct());
    assert_eq!(state.winner, Some(guesser.other()));
    assert!(state.special.hidden.revealed);
    assert!(state.flags.resolved_by_guess);
    assert_eq!(state.flags.chosen, Some(wrong));
}
