//! Card system: identity, metadata, deck and catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Immutable `(suit, rank)` identity, wire form `g1`..`k7`
//! - `CardMeta`: Display metadata shipped with snapshots
//! - `CardCatalog`: Id → metadata map for one round

pub mod catalog;
pub mod deck;
pub mod definition;

pub use catalog::{build_catalog, CardCatalog};
pub use deck::{full_deck, sort_canonical, DECK_SIZE};
pub use definition::{CardId, CardMeta, Suit};
