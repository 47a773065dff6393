//! CloudEvent record, value classification and validation.
//!
//! This crate provides:
//! - [`CloudEvent`], the CloudEvents 1.0 envelope, with strict and lenient
//!   construction
//! - Value classification predicates the other rules are built on
//! - A two-tier validation engine that collects findings instead of failing
//!
//! Serialization to and from the JSON wire format lives in
//! `cloudevent-codec`; batch triage lives in `cloudevent-batch`.
//!
//! ## Quick Start
//!
//! ```rust
//! use cloudevent_core::{CloudEvent, EventOptions, ValidateOptions};
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
//! assert!(event.is_valid(&ValidateOptions::default()));
//! assert_eq!(event.payload(), Some(json!({"hello": "world"})));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
#![deny(missing_docs)]

/// Value classification predicates and their `ensure_*` variants.
pub mod classify;
/// Construction error types.
pub mod errors;
/// The event record.
pub mod event;
/// Extension attribute helpers.
pub mod extensions;
/// Timestamp parsing and formatting.
pub mod time;
/// Validation findings.
pub mod validation;
/// Validation engine.
pub mod validator;

pub use errors::EventError;
pub use event::{is_datacontenttype_json, Attr, CloudEvent, DataType, EventOptions};
pub use extensions::{
    get_extensions_of, get_strict_of, is_extension_name_valid, is_extension_value_valid,
    is_standard_property, set_extensions_in, set_strict_in, Extensions,
};
pub use time::TimeError;
pub use validation::{dump_validation_results, ErrorKind, ValidationError};
pub use validator::{is_valid, validate, BoxError, SchemaValidator, ValidateOptions};
