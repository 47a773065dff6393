//! JSON wire format codec for CloudEvents.
//!
//! This crate provides:
//! - [`serialize`] / [`deserialize`] between [`CloudEvent`](cloudevent_core::CloudEvent)
//!   and the `application/cloudevents+json` wire form
//! - Pluggable [`Encoder`] / [`Decoder`] hooks for non-JSON content types
//! - Optional validity and 64 KB size gates
//!
//! ## Quick Start
//!
//! ```rust
//! use cloudevent_codec::{deserialize, serialize, DeserializeOptions, SerializeOptions};
//! use cloudevent_core::{CloudEvent, EventOptions};
//! use serde_json::json;
//!
//! let event = CloudEvent::new(
//!     Some("1".into()),
//!     Some("com.example.test".into()),
//!     Some("/".into()),
//!     Some(json!({"hello": "world"})),
//!     EventOptions::default(),
//!     None,
//! )?;
//!
//! let options = SerializeOptions {
//!     only_valid: true,
//!     ..SerializeOptions::default()
//! };
//! let text = serialize(&event, &options)?;
//! let back = deserialize(&text, &DeserializeOptions::default())?;
//! assert_eq!(back.payload(), event.payload());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Event deserialization.
pub mod deserializer;
/// Error types for codec operations.
pub mod errors;
/// Size and validity gates.
pub mod limits;
/// Event serialization.
pub mod serializer;

pub use deserializer::{deserialize, deserialize_value, Decoder, DeserializeOptions};
pub use errors::CodecError;
pub use limits::{size_in_bytes, MAX_EVENT_SIZE};
pub use serializer::{serialize, Encoder, SerializeOptions};
