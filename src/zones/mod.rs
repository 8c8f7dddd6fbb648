//! Viewer-side zones and snapshot reconciliation.
//!
//! ## Key Types
//!
//! - `Zone`: the five rendered zones seen from one seat
//! - `ZoneBoard`: where each card element currently sits
//! - `ZoneTargets`: where a snapshot says each card should sit
//! - `reconcile`: rewrite a board to match targets, emitting render ops

pub mod board;
pub mod reconcile;

pub use board::{Zone, ZoneBoard};
pub use reconcile::{animates, reconcile, ReconcileMode, ZoneTargets};
