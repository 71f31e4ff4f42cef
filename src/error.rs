//! Error taxonomy
//!
//! Nothing here is fatal: every failure degrades to a no-op plus a toast or
//! a log line.

use std::str::Utf8Error;

use thiserror::Error;

/// A sequence that cannot be a [`NumberSet`](crate::NumberSet)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("expected {expected} numbers, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("number {0} is outside 1..=45")]
    OutOfRange(u8),
    #[error("number {0} appears more than once")]
    Repeated(u8),
}

/// Persistence failures (read side is recovered by `SetStore::load`)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cookie jar unreadable: {0}")]
    Read(String),
    #[error("stored value is not valid UTF-8 after decoding: {0}")]
    Encoding(#[from] Utf8Error),
    #[error("stored value is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("stored set is invalid: {0}")]
    Invalid(#[from] SetError),
    #[error("could not serialize saved sets: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("cookie jar rejected write: {0}")]
    Write(String),
}

/// Ticket rendering failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No saved sets to put on the ticket
    #[error("no saved sets to render")]
    Empty,
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("image export failed: {0}")]
    Export(String),
}

/// Reasons a save request is turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SaveRejection {
    #[error("set is already saved")]
    Duplicate,
    #[error("no complete set to save")]
    Incomplete,
    #[error("draw still in progress")]
    Busy,
}
