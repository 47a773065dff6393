use cloudevent_core::{CloudEvent, ValidateOptions};

use crate::errors::CodecError;

/// Size limit for a serialized event: 64 KB, exclusive.
pub const MAX_EVENT_SIZE: usize = 64 * 1024;

/// UTF-8 byte length of a serialized event.
pub fn size_in_bytes(text: &str) -> usize {
    text.len()
}

/// Rejects texts of [`MAX_EVENT_SIZE`] bytes or more when `enabled`.
pub(crate) fn ensure_size(text: &str, enabled: bool) -> Result<(), CodecError> {
    let size = size_in_bytes(text);
    if enabled && size >= MAX_EVENT_SIZE {
        return Err(CodecError::TooLarge {
            size,
            max: MAX_EVENT_SIZE,
        });
    }
    Ok(())
}

/// Rejects events with validation findings when `enabled`.
///
/// Uses the strict flag the event was created with.
pub(crate) fn ensure_valid(event: &CloudEvent, enabled: bool) -> Result<(), CodecError> {
    if !enabled {
        return Ok(());
    }
    let errors = event.validate(&ValidateOptions::default());
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CodecError::NotValid { errors })
    }
}
