use cloudevent_core::{BoxError, EventError, TimeError};
use thiserror::Error;

/// Errors that can occur while serializing or deserializing an event.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The event failed validation and only valid events were requested.
    #[error("unable to process a not valid CloudEvent ({} error(s))", .errors.len())]
    NotValid {
        /// Validation findings for the rejected event.
        errors: Vec<cloudevent_core::ValidationError>,
    },
    /// The serialized form reached the 64 KB limit.
    #[error("serialized CloudEvent size {size} bytes reaches the limit of {max} bytes")]
    TooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Exclusive maximum size in bytes.
        max: usize,
    },
    /// Invalid JSON text.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON text is not a single object.
    #[error("serialized CloudEvent must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    /// The `specversion` attribute is missing or unsupported.
    #[error("unsupported specversion {found}, expected {expected}")]
    VersionMismatch {
        /// Supported version.
        expected: &'static str,
        /// Version found in the input.
        found: String,
    },
    /// A standard attribute has the wrong JSON type.
    #[error("attribute '{name}' must be {expected}")]
    InvalidAttribute {
        /// Attribute name.
        name: &'static str,
        /// Accepted JSON type.
        expected: &'static str,
    },
    /// The `time` attribute is not an RFC 3339 timestamp, or the timezone
    /// offset moves it out of range.
    #[error("invalid time: {0}")]
    InvalidTime(#[from] TimeError),
    /// Non-JSON data with no way to encode it.
    #[error("missing encoder function or encoded data for content type '{0}'")]
    MissingEncoder(String),
    /// Non-JSON data with no way to decode it.
    #[error("missing decoder function or decoded data for content type '{0}'")]
    MissingDecoder(String),
    /// The injected encoder failed.
    #[error("encoder failed: {0}")]
    Encoder(BoxError),
    /// The injected decoder failed.
    #[error("decoder failed: {0}")]
    Decoder(BoxError),
    /// Rebuilding the event failed.
    #[error(transparent)]
    Event(#[from] EventError),
}
