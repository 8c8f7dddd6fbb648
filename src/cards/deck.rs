//! The fixed 15-card deck.
//!
//! Three suits (`g`, `r`, `y`) carry ranks 1-4 and the `k` suit carries
//! ranks 5-7. Every round is dealt from a fresh copy of this deck.

use super::definition::{CardId, Suit};

/// Number of cards in the deck.
pub const DECK_SIZE: usize = 15;

/// Build the full deck in canonical order.
///
/// ```
/// use card_feel::cards::{full_deck, DECK_SIZE};
///
/// let deck = full_deck();
/// assert_eq!(deck.len(), DECK_SIZE);
/// assert_eq!(deck[0].to_string(), "g1");
/// assert_eq!(deck[14].to_string(), "k7");
/// ```
#[must_use]
pub fn full_deck() -> Vec<CardId> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| {
            suit.ranks()
                .filter_map(move |rank| CardId::new(suit, rank).ok())
        })
        .collect()
}

/// Sort ids into canonical display order (suit, then rank).
///
/// Purely cosmetic: no rule depends on the order of a hand.
pub fn sort_canonical(ids: &mut [CardId]) {
    ids.sort_unstable();
}
