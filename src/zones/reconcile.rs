//! Snapshot reconciliation.
//!
//! Given any authoritative snapshot, rewrite the viewer's board to match
//! it and describe each change as a render op. The board may be empty,
//! one transition behind, or showing a wrong prediction; the result is
//! the same board either way.
//!
//! Three passes over [`Zone::ALL`]: elements sitting in the wrong zone are
//! moved to the zone that wants them, elements no zone wants are removed,
//! then missing cards are materialized and misplaced ones reordered. A
//! card changing zones is therefore always moved, never recreated.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::board::{Zone, ZoneBoard};
use crate::cards::{sort_canonical, CardId};
use crate::core::{GameState, PlayerId};
use crate::render::{RenderOp, Sfx, ViewUpdate};

/// Incremental diff or full wipe-and-rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileMode {
    Incremental,
    /// Clear the board and materialize everything without animation.
    Rebuild,
}

type ZoneList = SmallVec<[CardId; 8]>;

/// What each zone should hold for one viewer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneTargets {
    pub hand: ZoneList,
    pub stage: ZoneList,
    pub pile: ZoneList,
    pub open: CardId,
    pub hidden: CardId,
    pub hidden_face_down: bool,
    pub opponent_hand: usize,
}

impl ZoneTargets {
    /// Project a snapshot onto `viewer`'s zones.
    ///
    /// The hand is sorted canonically. The hidden card is kept out of
    /// every zone but its own, and a card listed twice is placed once.
    #[must_use]
    pub fn for_viewer(state: &GameState, viewer: PlayerId) -> Self {
        let open = state.special.open;
        let hidden = state.special.hidden.id;
        let mut seen: FxHashSet<CardId> = [open, hidden].into_iter().collect();

        let mut take = |cards: &im::Vector<CardId>| -> ZoneList {
            cards.iter().copied().filter(|c| seen.insert(*c)).collect()
        };

        let mut hand = take(&state.hands[viewer]);
        let stage = take(&state.stage[viewer]);
        let pile = take(&state.stage[viewer.other()]);
        sort_canonical(&mut hand);

        Self {
            hand,
            stage,
            pile,
            open,
            hidden,
            hidden_face_down: !state.special.hidden.revealed,
            opponent_hand: state.hands[viewer.other()].len(),
        }
    }

    /// Target cards of `zone`, in order.
    #[must_use]
    pub fn cards(&self, zone: Zone) -> &[CardId] {
        match zone {
            Zone::Hand => &self.hand,
            Zone::Stage => &self.stage,
            Zone::Pile => &self.pile,
            Zone::Open => std::slice::from_ref(&self.open),
            Zone::Hidden => std::slice::from_ref(&self.hidden),
        }
    }

    fn face_down(&self, zone: Zone) -> bool {
        zone == Zone::Hidden && self.hidden_face_down
    }
}

/// Should a cross-zone move into `to` animate?
///
/// Special slots never animate arrivals, and the pile only animates
/// cards passed over from the viewer's own stage.
#[must_use]
pub fn animates(from: Zone, to: Zone) -> bool {
    if to.is_special() {
        return false;
    }
    if to == Zone::Pile {
        return from == Zone::Stage;
    }
    true
}

/// Rewrite `board` to match `targets`.
///
/// Ops are emitted in the order they were applied to `board`, and every
/// index is a position at the moment its op applies, so a renderer that
/// replays them in order ends with the same layout.
pub fn reconcile(board: &mut ZoneBoard, targets: &ZoneTargets, mode: ReconcileMode) -> ViewUpdate {
    let mut update = ViewUpdate::default();

    if mode == ReconcileMode::Rebuild {
        board.clear();
        update.ops.push(RenderOp::ClearAll);
    }

    // Relocate elements that exist in the wrong zone.
    for zone in Zone::ALL {
        for (index, &card) in targets.cards(zone).iter().enumerate() {
            let Some(from) = board.zone_of(card) else {
                continue;
            };
            if from == zone {
                continue;
            }
            let animate = mode == ReconcileMode::Incremental && animates(from, zone);
            board.move_to(card, zone, index);
            update.ops.push(RenderOp::Move {
                card,
                from,
                to: zone,
                index,
                animate,
            });
            if animate {
                update.sfx.push(Sfx::CardFly);
            }
        }
    }

    // Anything still sitting outside its target list is wanted nowhere.
    for zone in Zone::ALL {
        let wanted: FxHashSet<CardId> = targets.cards(zone).iter().copied().collect();
        let stale: Vec<CardId> = board
            .cards_in(zone)
            .iter()
            .copied()
            .filter(|c| !wanted.contains(c))
            .collect();
        for card in stale {
            board.remove(card);
            update.ops.push(RenderOp::Remove { card, zone });
        }
    }

    // Every zone now holds a subset of its targets: fill gaps and fix order.
    for zone in Zone::ALL {
        let face_down = targets.face_down(zone);
        for (index, &card) in targets.cards(zone).iter().enumerate() {
            match board.position_of(card) {
                None => {
                    board.place(card, zone, index);
                    board.set_face_down(card, face_down);
                    update.ops.push(RenderOp::Materialize {
                        card,
                        zone,
                        index,
                        face_down,
                    });
                }
                Some(current) if current != index => {
                    board.move_to(card, zone, index);
                    update.ops.push(RenderOp::Reorder { card, zone, index });
                }
                Some(_) => {}
            }

            if board.set_face_down(card, face_down) {
                update.ops.push(RenderOp::SetFaceDown { card, face_down });
            }
        }
    }

    if board.set_opponent_hand(targets.opponent_hand) {
        update.ops.push(RenderOp::OpponentHandCount(targets.opponent_hand));
    }

    for card in board.note_pile(&targets.pile) {
        update.ops.push(RenderOp::MarkOpponentPlay(card));
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;
    use crate::rules::{RoundRules, TurnCheck};

    fn dealt() -> (RoundRules, GameState) {
        let rules = RoundRules::default();
        let state = rules.deal(&mut GameRng::new(42), 0);
        (rules, state)
    }

    fn board_matches(board: &ZoneBoard, targets: &ZoneTargets) -> bool {
        Zone::ALL
            .iter()
            .all(|&z| board.cards_in(z) == targets.cards(z))
    }

    #[test]
    fn test_fresh_board_materializes_everything() {
        let (_, state) = dealt();
        let me = PlayerId::P1;
        let targets = ZoneTargets::for_viewer(&state, me);
        let mut board = ZoneBoard::new();

        let update = reconcile(&mut board, &targets, ReconcileMode::Incremental);

        assert!(board_matches(&board, &targets));
        let materialized = update
            .ops
            .iter()
            .filter(|op| matches!(op, RenderOp::Materialize { .. }))
            .count();
        assert_eq!(materialized, state.hands[me].len() + 2);
        assert!(board.is_face_down(state.special.hidden.id));
        assert!(update
            .ops
            .contains(&RenderOp::OpponentHandCount(state.hands[me.other()].len())));
    }

    #[test]
    fn test_second_application_is_noop() {
        let (_, state) = dealt();
        let targets = ZoneTargets::for_viewer(&state, PlayerId::P2);
        let mut board = ZoneBoard::new();

        reconcile(&mut board, &targets, ReconcileMode::Incremental);
        let again = reconcile(&mut board, &targets, ReconcileMode::Incremental);

        assert!(again.is_empty(), "unexpected ops: {:?}", again.ops);
        assert!(board_matches(&board, &targets));
    }

    #[test]
    fn test_play_moves_hand_card_to_stage_with_animation() {
        let (rules, mut state) = dealt();
        let me = state.turn;
        let mut board = ZoneBoard::new();
        reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        let card = state.hands[me][2];
        rules.play(&mut state, me, card, TurnCheck::Enforce);
        let update = reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        assert_eq!(
            update.ops,
            vec![RenderOp::Move {
                card,
                from: Zone::Hand,
                to: Zone::Stage,
                index: 0,
                animate: true,
            }]
        );
        assert_eq!(update.sfx, vec![Sfx::CardFly]);
    }

    #[test]
    fn test_end_turn_animates_stage_to_pile() {
        let (rules, mut state) = dealt();
        let me = state.turn;
        let card = state.hands[me][0];
        rules.play(&mut state, me, card, TurnCheck::Enforce);

        let mut board = ZoneBoard::new();
        reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        rules.end_turn(&mut state, me);
        let update = reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        assert!(update.ops.contains(&RenderOp::Move {
            card,
            from: Zone::Stage,
            to: Zone::Pile,
            index: 0,
            animate: true,
        }));
        // Passed-over card counts as a new pile arrival.
        assert!(update.ops.contains(&RenderOp::MarkOpponentPlay(card)));
    }

    #[test]
    fn test_opponent_play_materializes_in_pile_and_marks() {
        let (rules, mut state) = dealt();
        let opponent = state.turn;
        let me = opponent.other();
        let mut board = ZoneBoard::new();
        reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        let card = state.hands[opponent][0];
        rules.play(&mut state, opponent, card, TurnCheck::Enforce);
        let update = reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        assert!(update.ops.contains(&RenderOp::Materialize {
            card,
            zone: Zone::Pile,
            index: 0,
            face_down: false,
        }));
        assert!(update.ops.contains(&RenderOp::MarkOpponentPlay(card)));
        assert!(update
            .ops
            .contains(&RenderOp::OpponentHandCount(state.hands[opponent].len())));
    }

    #[test]
    fn test_reveal_flips_hidden_card() {
        let (rules, mut state) = dealt();
        let me = state.turn;
        let mut board = ZoneBoard::new();
        reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        let hidden = state.special.hidden.id;
        rules.resolve_guess(&mut state, me, hidden);
        let update = reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        assert_eq!(
            update.ops,
            vec![RenderOp::SetFaceDown {
                card: hidden,
                face_down: false,
            }]
        );
        assert!(!board.is_face_down(hidden));
    }

    #[test]
    fn test_wrong_prediction_is_corrected() {
        let (_, state) = dealt();
        let me = state.turn;
        let targets = ZoneTargets::for_viewer(&state, me);
        let mut board = ZoneBoard::new();
        reconcile(&mut board, &targets, ReconcileMode::Incremental);

        // Local prediction moved a card that the host never moved.
        let card = state.hands[me][0];
        board.move_to(card, Zone::Stage, 0);

        let update = reconcile(&mut board, &targets, ReconcileMode::Incremental);
        assert!(board_matches(&board, &targets));
        assert!(update.ops.iter().any(|op| matches!(
            op,
            RenderOp::Move { card: c, from: Zone::Stage, to: Zone::Hand, .. } if *c == card
        )));
    }

    #[test]
    fn test_unknown_elements_are_removed() {
        let (_, state) = dealt();
        let me = state.turn;
        let targets = ZoneTargets::for_viewer(&state, me);
        let mut board = ZoneBoard::new();
        reconcile(&mut board, &targets, ReconcileMode::Incremental);

        // An opponent card has no element in any of the viewer's zones.
        let stray = state.hands[me.other()][0];
        board.place(stray, Zone::Stage, 0);

        let update = reconcile(&mut board, &targets, ReconcileMode::Incremental);
        assert!(update.ops.contains(&RenderOp::Remove {
            card: stray,
            zone: Zone::Stage,
        }));
        assert!(!board.contains(stray));
    }

    #[test]
    fn test_rebuild_clears_and_never_animates() {
        let (rules, state) = dealt();
        let me = PlayerId::P1;
        let mut board = ZoneBoard::new();
        reconcile(&mut board, &ZoneTargets::for_viewer(&state, me), ReconcileMode::Incremental);

        let next = rules.deal(&mut GameRng::new(7), state.version);
        let targets = ZoneTargets::for_viewer(&next, me);
        let update = reconcile(&mut board, &targets, ReconcileMode::Rebuild);

        assert_eq!(update.ops.first(), Some(&RenderOp::ClearAll));
        assert!(update.sfx.is_empty());
        assert!(update
            .ops
            .iter()
            .all(|op| !matches!(op, RenderOp::Move { .. } | RenderOp::Remove { .. })));
        assert!(board_matches(&board, &targets));
    }

    #[test]
    fn test_animation_policy() {
        assert!(animates(Zone::Hand, Zone::Stage));
        assert!(animates(Zone::Pile, Zone::Stage));
        assert!(animates(Zone::Stage, Zone::Pile));
        assert!(!animates(Zone::Hand, Zone::Pile));
        assert!(!animates(Zone::Hand, Zone::Open));
        assert!(!animates(Zone::Stage, Zone::Hidden));
    }

    #[test]
    fn test_hidden_card_never_leaves_its_slot() {
        let (_, mut state) = dealt();
        let me = state.turn;
        let hidden = state.special.hidden.id;
        // Corrupt snapshot listing the hidden card in a hand.
        state.hands[me].push_back(hidden);

        let targets = ZoneTargets::for_viewer(&state, me);
        assert!(!targets.hand.contains(&hidden));
        assert_eq!(targets.cards(Zone::Hidden), &[hidden]);
    }
}
