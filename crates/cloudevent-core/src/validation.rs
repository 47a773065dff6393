use thiserror::Error;

/// Broad category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The argument is the wrong kind of thing entirely.
    Type,
    /// The argument has the right kind but unacceptable content.
    Content,
}

/// A single validation finding.
///
/// Validation never stops at the first finding: every rule contributes at most
/// one entry to the result list, so these values are collected, not thrown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required value is absent or null.
    #[error("{field} undefined or null")]
    UndefinedOrNull {
        /// Name of the offending attribute.
        field: String,
    },
    /// A string attribute is empty.
    #[error("{field} must be a non-empty string")]
    EmptyString {
        /// Name of the offending attribute.
        field: String,
    },
    /// A value does not have the expected shape.
    #[error("{field} must be {expected}")]
    WrongType {
        /// Name of the offending attribute.
        field: String,
        /// Human readable description of the accepted shapes.
        expected: &'static str,
    },
    /// Two attributes that exclude each other are both present.
    #[error("{field} and {other} are mutually exclusive")]
    MutuallyExclusive {
        /// First attribute.
        field: String,
        /// Second attribute.
        other: String,
    },
    /// A value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Name of the offending attribute.
        field: String,
        /// Offending value.
        value: String,
    },
    /// A date attribute is missing or not a valid date.
    #[error("{field} must be a valid date")]
    InvalidDate {
        /// Name of the offending attribute.
        field: String,
    },
    /// A date attribute lies in the future.
    #[error("{field} ({value}) must not be in the future")]
    FutureDate {
        /// Name of the offending attribute.
        field: String,
        /// Offending value, RFC 3339 formatted.
        value: String,
    },
    /// The data does not fit the declared content type.
    #[error("data is not compatible with content type '{content_type}': {reason}")]
    IncompatibleData {
        /// Declared content type.
        content_type: String,
        /// What was wrong with the data.
        reason: &'static str,
    },
    /// The injected dataschema validator rejected the data.
    #[error("data does not conform to dataschema {dataschema}")]
    SchemaRejected {
        /// Schema reference the data was checked against.
        dataschema: String,
    },
    /// The injected dataschema validator failed.
    #[error("dataschema validation failed: {reason}")]
    SchemaCheckFailed {
        /// Failure message.
        reason: String,
    },
    /// An extension name is not lowercase alphanumeric, 1 to 20 chars.
    #[error("extension name '{name}' is not valid")]
    InvalidExtensionName {
        /// Offending extension name.
        name: String,
    },
    /// An extension shadows a standard or reserved property.
    #[error("extension name '{name}' is reserved")]
    ReservedExtensionName {
        /// Offending extension name.
        name: String,
    },
    /// An extension value is not a string, boolean, number or null.
    #[error("extension '{name}' must have a string, boolean, number or null value")]
    InvalidExtensionValue {
        /// Name of the extension holding the value.
        name: String,
    },
    /// A value that should be an event is something else.
    #[error("the given {found} is not a CloudEvent")]
    NotAnEvent {
        /// Kind of the value that was found.
        found: &'static str,
    },
    /// A value that should be a batch is something else.
    #[error("the given {found} should be an array")]
    NotABatch {
        /// Kind of the value that was found.
        found: &'static str,
    },
}

impl ValidationError {
    /// Returns whether this is a type mismatch or a content problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::WrongType { .. }
            | ValidationError::InvalidExtensionValue { .. }
            | ValidationError::NotAnEvent { .. }
            | ValidationError::NotABatch { .. } => ErrorKind::Type,
            _ => ErrorKind::Content,
        }
    }

    /// Returns the attribute this finding refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::UndefinedOrNull { field }
            | ValidationError::EmptyString { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::MutuallyExclusive { field, .. }
            | ValidationError::PatternMismatch { field, .. }
            | ValidationError::InvalidDate { field }
            | ValidationError::FutureDate { field, .. } => Some(field.as_str()),
            ValidationError::IncompatibleData { .. } => Some("data"),
            ValidationError::SchemaRejected { .. } | ValidationError::SchemaCheckFailed { .. } => {
                Some("dataschema")
            }
            ValidationError::InvalidExtensionName { name }
            | ValidationError::ReservedExtensionName { name }
            | ValidationError::InvalidExtensionValue { name } => Some(name.as_str()),
            ValidationError::NotAnEvent { .. } | ValidationError::NotABatch { .. } => None,
        }
    }
}

/// Flattens a sequence of ensure results into the list of failures.
pub fn collect_errors<I>(results: I) -> Vec<ValidationError>
where
    I: IntoIterator<Item = Result<(), ValidationError>>,
{
    results.into_iter().filter_map(Result::err).collect()
}

/// Formats validation findings as a short multi-line report.
pub fn dump_validation_results(name: &str, errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return format!("Validation results for '{}': valid", name);
    }
    let mut out = format!(
        "Validation results for '{}': {} error(s)",
        name,
        errors.len()
    );
    for error in errors {
        out.push_str("\n  - ");
        out.push_str(&error.to_string());
    }
    out
}
