//! Error types shared across the crate.
//!
//! Invalid game actions are not errors: the round rules treat them as
//! silent no-ops. These types cover malformed input and I/O only.

use std::path::PathBuf;

use thiserror::Error;

/// A card id string that does not name a card of the deck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card id: {0:?}")]
pub struct CardIdError(pub String);

/// Wire encoding/decoding failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Message could not be serialized.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Frame is not a well-formed message.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for `SessionConfig`.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parse but cannot describe a playable round.
    #[error("invalid config: {0}")]
    Invalid(String),
}
