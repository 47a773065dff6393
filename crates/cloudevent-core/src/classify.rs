//! Value classification predicates.
//!
//! Every predicate is total: it answers a yes/no question about any value and
//! never fails. Attributes that may be absent are passed as `Option<&Value>`,
//! where `None` stands for "undefined" and `Some(Value::Null)` for an explicit
//! null. The `ensure_*` variants turn a predicate into a
//! `Result<(), ValidationError>` so callers can collect findings in bulk.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::validation::ValidationError;

macro_rules! pattern {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("invalid regex"));
    };
}

pattern!(
    VERSION,
    "Loose version string (`v?N(.N)*`).",
    r"^v?\d+(\.\d+)*$"
);
pattern!(
    ABSOLUTE_URI,
    "Absolute URI: a scheme followed by a whitespace-free remainder. A `//` \
     authority must be non-empty unless an absolute path follows it.",
    r"^[A-Za-z][A-Za-z0-9+.\-]*:(?://(?:[^\s/?#]+[^\s]*|/[^\s]+)|/?[^/\s][^\s]*)$"
);
pattern!(
    RELATIVE_REF,
    "Relative reference: no scheme, no whitespace, not empty.",
    r"^(?:[^\s:/?#]+(?:[/?#][^\s]*)?|[/?#][^\s]*)$"
);
pattern!(
    BASE64,
    "Standard base64 alphabet with optional padding.",
    r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$"
);

/// Returns true when the value is absent.
pub fn is_undefined(value: Option<&Value>) -> bool {
    value.is_none()
}

/// Returns true when the value is an explicit null.
pub fn is_null(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Null))
}

/// Returns true when the value is absent or null.
pub fn is_undefined_or_null(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Returns true when the value is present and not null.
pub fn is_defined_and_not_null(value: Option<&Value>) -> bool {
    !is_undefined_or_null(value)
}

/// Returns true for strings.
pub fn is_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(_)))
}

/// Returns true for strings with at least one character.
pub fn is_string_not_empty(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.is_empty())
}

/// Returns true for numbers.
pub fn is_number(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(_)))
}

/// Returns true for booleans.
pub fn is_boolean(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(_)))
}

/// Returns true for arrays.
pub fn is_array(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(_)))
}

/// Returns true for plain objects.
pub fn is_object(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(_)))
}

/// Returns true for structured values: plain objects and collections.
///
/// Arrays are the only collection JSON can express, so they count here.
pub fn is_object_or_collection(value: Option<&Value>) -> bool {
    is_object(value) || is_array(value)
}

/// Returns true for primitive values: strings, booleans and numbers.
pub fn is_value(value: Option<&Value>) -> bool {
    is_string(value) || is_boolean(value) || is_number(value)
}

/// Returns true for structured values or strings.
pub fn is_object_or_collection_or_string(value: Option<&Value>) -> bool {
    is_object_or_collection(value) || is_string(value)
}

/// Returns true for structured values or primitive values.
pub fn is_object_or_collection_or_value(value: Option<&Value>) -> bool {
    is_object_or_collection(value) || is_value(value)
}

/// Returns true for structured values that are not primitive values.
pub fn is_object_or_collection_not_value(value: Option<&Value>) -> bool {
    is_object_or_collection(value) && !is_value(value)
}

/// Returns true when `date` is not later than `now`.
pub fn is_date_past(date: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    date <= now
}

/// Returns true when `date` is later than `now`.
pub fn is_date_future(date: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    date > now
}

/// Returns true when the string parses as an RFC 3339 timestamp.
pub fn is_date_valid_str(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
}

/// Returns true when `url` is a valid URI.
///
/// Without a base only the absolute form is accepted. With an absolute base a
/// relative reference is accepted as well, since it resolves against the base.
pub fn is_uri(url: &str, base: Option<&str>) -> bool {
    if ABSOLUTE_URI.is_match(url) {
        return true;
    }
    match base {
        Some(base) if ABSOLUTE_URI.is_match(base) => is_relative_ref(url),
        _ => false,
    }
}

/// Returns true for absolute URIs and relative references.
pub fn is_uri_reference(value: &str) -> bool {
    ABSOLUTE_URI.is_match(value) || is_relative_ref(value)
}

fn is_relative_ref(value: &str) -> bool {
    !value.is_empty() && RELATIVE_REF.is_match(value)
}

/// Returns true for loose version strings such as `1.0` or `v2`.
pub fn is_version(value: &str) -> bool {
    VERSION.is_match(value)
}

/// Returns true for non-empty standard base64 text.
pub fn is_base64(value: &str) -> bool {
    !value.is_empty() && BASE64.is_match(value)
}

/// Short name of the JSON kind of a value, used in error messages.
pub fn kind_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Ensures a string attribute is present and non-empty.
pub fn ensure_is_string_not_empty(
    value: Option<&str>,
    field: &str,
) -> Result<(), ValidationError> {
    match value {
        None => Err(ValidationError::UndefinedOrNull {
            field: field.to_string(),
        }),
        Some("") => Err(ValidationError::EmptyString {
            field: field.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Ensures a version attribute matches the loose version pattern.
pub fn ensure_is_version(value: &str, field: &str) -> Result<(), ValidationError> {
    if is_version(value) {
        return Ok(());
    }
    Err(ValidationError::PatternMismatch {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Ensures an attribute is a URI reference (absolute or relative).
pub fn ensure_is_uri_reference(value: Option<&str>, field: &str) -> Result<(), ValidationError> {
    let value = value.ok_or_else(|| ValidationError::UndefinedOrNull {
        field: field.to_string(),
    })?;
    if is_uri_reference(value) {
        return Ok(());
    }
    Err(ValidationError::PatternMismatch {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Ensures an attribute is a URI, resolving relative forms against `base`.
pub fn ensure_is_uri(value: &str, base: Option<&str>, field: &str) -> Result<(), ValidationError> {
    if is_uri(value, base) {
        return Ok(());
    }
    Err(ValidationError::PatternMismatch {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Ensures a date is present and not later than `now`.
pub fn ensure_is_date_past(
    date: Option<&DateTime<Utc>>,
    now: &DateTime<Utc>,
    field: &str,
) -> Result<(), ValidationError> {
    let date = date.ok_or_else(|| ValidationError::InvalidDate {
        field: field.to_string(),
    })?;
    if is_date_past(date, now) {
        return Ok(());
    }
    Err(ValidationError::FutureDate {
        field: field.to_string(),
        value: date.to_rfc3339(),
    })
}

/// Ensures a value is a plain object or a collection.
pub fn ensure_is_object_or_collection(
    value: Option<&Value>,
    field: &str,
) -> Result<(), ValidationError> {
    if is_object_or_collection(value) {
        return Ok(());
    }
    Err(ValidationError::WrongType {
        field: field.to_string(),
        expected: "an object or a collection",
    })
}

/// Ensures a value is a plain object, a collection or a primitive value.
pub fn ensure_is_object_or_collection_or_value(
    value: Option<&Value>,
    field: &str,
) -> Result<(), ValidationError> {
    if is_object_or_collection_or_value(value) {
        return Ok(());
    }
    Err(ValidationError::WrongType {
        field: field.to_string(),
        expected: "an object, a collection or a primitive value",
    })
}
