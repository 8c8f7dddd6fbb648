//! Wire protocol between the two peers.

pub mod message;

pub use message::{Intent, Message, Reveal};
