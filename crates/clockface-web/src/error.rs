#![forbid(unsafe_code)]

//! Glue-layer errors.
//!
//! None of these reach the reconciler: a failed message leaves the display
//! exactly as it was.

use thiserror::Error;

/// Convenience alias for glue results.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors raised while turning transport input into snapshots.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A message payload was not a valid snapshot.
    #[error("snapshot decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// An event-stream line could not be framed.
    #[error("event stream framing error on line {line}: {reason}")]
    Framing { line: u64, reason: String },

    /// A configuration value was rejected.
    #[error("invalid config `{key}` = `{value}`: {reason}")]
    Config {
        key: String,
        value: String,
        reason: String,
    },

    /// The transport reported a failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl BoardError {
    /// Build a [`BoardError::Config`].
    #[must_use]
    pub fn config(key: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Self::Config {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
