//! Timestamp helpers for the `time` attribute.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use thiserror::Error;

/// Errors that can occur while reading a timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The value is not an RFC 3339 timestamp.
    #[error("invalid RFC 3339 timestamp: {0}")]
    Parse(#[from] chrono::ParseError),
    /// Shifting by the offset leaves the representable range.
    #[error("timezone offset of {0} minutes is out of range")]
    OutOfRange(i64),
}

/// Parses an RFC 3339 timestamp and shifts it by `timezone_offset` minutes.
///
/// # Errors
///
/// Returns [`TimeError::Parse`] when `value` is not RFC 3339 and
/// [`TimeError::OutOfRange`] when the shifted timestamp cannot be represented.
pub fn timestamp_from_string(
    value: &str,
    timezone_offset: i64,
) -> Result<DateTime<Utc>, TimeError> {
    let parsed = DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc);
    TimeDelta::try_minutes(timezone_offset)
        .and_then(|offset| parsed.checked_add_signed(offset))
        .ok_or(TimeError::OutOfRange(timezone_offset))
}

/// Formats a timestamp as RFC 3339 UTC with millisecond precision (`...Z`).
pub fn timestamp_to_string(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Milliseconds since the Unix epoch.
pub fn timestamp_to_millis(value: &DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}
