use thiserror::Error;

/// Errors raised while constructing a [`CloudEvent`](crate::CloudEvent).
///
/// Only conditions that are unrecoverable under the requested strict mode end
/// up here; everything else is reported later by validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    /// A mandatory attribute is absent or empty in strict mode.
    #[error("unable to create CloudEvent instance, mandatory field '{0}' missing")]
    MissingMandatory(&'static str),
    /// `data` and `data_base64` were both given in strict mode.
    #[error("unable to create CloudEvent instance, data and data_base64 are mutually exclusive")]
    DataConflict,
    /// An empty extensions object was supplied in strict mode.
    #[error("unable to create CloudEvent instance, extensions must not be empty")]
    EmptyExtensions,
    /// An extension uses the name of a standard property in strict mode.
    #[error("unable to create CloudEvent instance, extension '{0}' collides with a standard property")]
    ExtensionCollision(String),
    /// Extension input tried to set the reserved strict flag.
    #[error("unable to create CloudEvent instance, extension '{0}' is reserved")]
    ReservedExtension(String),
    /// The reserved strict flag is present but not a boolean.
    #[error("strict flag must be a boolean, found {0}")]
    InvalidStrictFlag(&'static str),
}
