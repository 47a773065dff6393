//! Batch validation.

use cloudevent_core::{classify, ValidateOptions, ValidationError};
use serde_json::Value;

use crate::error::BatchError;
use crate::item::BatchItem;

/// Options for [`validate_batch`] and [`is_valid_batch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchValidateOptions {
    /// Validate every event strictly; also rejects a lone event.
    pub strict: bool,
}

impl BatchValidateOptions {
    fn validate_options(&self) -> ValidateOptions<'static> {
        ValidateOptions {
            strict: Some(self.strict),
            dataschema_validator: None,
        }
    }
}

/// Returns whether `item` is a batch.
///
/// # Errors
///
/// Returns [`BatchError::UndefinedOrNull`] when there is nothing to check.
pub fn is_batch(item: &BatchItem) -> Result<bool, BatchError> {
    match item {
        BatchItem::Undefined | BatchItem::Value(Value::Null) => Err(BatchError::UndefinedOrNull),
        BatchItem::List(_) | BatchItem::Value(Value::Array(_)) => Ok(true),
        _ => Ok(false),
    }
}

/// Validates a single batch element.
///
/// Events are validated with `options`; any other element yields one finding.
pub fn validate_item(item: &BatchItem, options: &ValidateOptions<'_>) -> Vec<ValidationError> {
    match item {
        BatchItem::Event(event) => event.validate(options),
        other if other.is_undefined_or_null() => vec![ValidationError::UndefinedOrNull {
            field: "CloudEvent".into(),
        }],
        other => vec![ValidationError::NotAnEvent {
            found: other.kind_name(),
        }],
    }
}

/// Validates a batch and flattens the findings of all its elements.
///
/// A lone event is validated directly; in strict mode it also gets a finding
/// for not being an array.
pub fn validate_batch(item: &BatchItem, options: BatchValidateOptions) -> Vec<ValidationError> {
    let validate_options = options.validate_options();
    match item {
        BatchItem::List(items) => items
            .iter()
            .flat_map(|item| validate_item(item, &validate_options))
            .collect(),
        BatchItem::Value(Value::Array(values)) => values
            .iter()
            .map(|value| match value {
                Value::Null => ValidationError::UndefinedOrNull {
                    field: "CloudEvent".into(),
                },
                other => ValidationError::NotAnEvent {
                    found: classify::kind_name(Some(other)),
                },
            })
            .collect(),
        BatchItem::Event(event) => {
            let mut errors = event.validate(&validate_options);
            if options.strict {
                errors.push(ValidationError::NotABatch {
                    found: item.kind_name(),
                });
            }
            errors
        }
        other if other.is_undefined_or_null() => vec![ValidationError::UndefinedOrNull {
            field: "batch".into(),
        }],
        other => vec![ValidationError::NotABatch {
            found: other.kind_name(),
        }],
    }
}

/// Returns true when every element is either discarded by filtering or a
/// valid event.
pub fn is_valid_batch(batch: &[BatchItem], options: BatchValidateOptions) -> bool {
    let validate_options = options.validate_options();
    batch.iter().all(|item| {
        item.as_event()
            .map_or(true, |event| event.is_valid(&validate_options))
    })
}

