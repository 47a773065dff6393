//! Error types for batch operations.

use cloudevent_codec::CodecError;
use thiserror::Error;

/// Errors that can occur during batch operations.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Nothing to check: the input is undefined or null.
    #[error("batch undefined or null")]
    UndefinedOrNull,
    /// The input is defined but is not an array.
    #[error("the given {0} should be an array")]
    NotAnArray(&'static str),
    /// Invalid JSON text.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// A single item failed and the batch was aborted.
    #[error("batch item {index} failed: {source}")]
    Item {
        /// Position of the item in the input batch.
        index: usize,
        /// Codec failure for that item.
        source: CodecError,
    },
}
