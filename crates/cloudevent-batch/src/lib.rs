//! Batch triage for CloudEvents.
//!
//! This crate provides:
//! - [`BatchItem`] for batches of untrusted, mixed values
//! - Lazy event filtering with [`events`] and [`get_events`]
//! - Flattened batch validation with [`validate_batch`]
//! - The `application/cloudevents-batch+json` array format
//!
//! Triage never mutates its input: events are borrowed from the batch.

#![deny(missing_docs)]

/// JSON batch wire format.
pub mod codec;
/// Error types for batch operations.
pub mod error;
/// Event filtering API.
pub mod filter;
/// Batch elements.
pub mod item;
/// Batch validation.
pub mod validate;

pub use codec::{
    deserialize_events, serialize_events, BatchDeserializeOptions, BatchSerializeOptions,
    MEDIA_TYPE,
};
pub use error::BatchError;
pub use filter::{events, get_events, Events, FilterOptions};
pub use item::BatchItem;
pub use validate::{is_batch, is_valid_batch, validate_batch, validate_item, BatchValidateOptions};
