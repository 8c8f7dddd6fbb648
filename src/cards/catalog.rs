//! Card catalog carried inside every snapshot.
//!
//! The catalog maps each card id of the round to its display metadata so
//! a receiving peer can render cards it has never dealt itself.

use im::OrdMap;

use super::definition::{CardId, CardMeta};

/// Card id → metadata, shared structurally between snapshots.
pub type CardCatalog = OrdMap<CardId, CardMeta>;

/// Build a catalog for `ids` with sprites under `asset_root`.
///
/// ```
/// use card_feel::cards::{build_catalog, full_deck};
///
/// let catalog = build_catalog(full_deck(), "assets/cards");
/// assert_eq!(catalog.len(), 15);
/// ```
#[must_use]
pub fn build_catalog(ids: impl IntoIterator<Item = CardId>, asset_root: &str) -> CardCatalog {
    ids.into_iter()
        .map(|id| (id, CardMeta::new(id, asset_root)))
        .collect()
}
