//! Validation engine.
//!
//! Standard checks always run. Strict checks run when the effective strict
//! flag is set: the per-call override if given, otherwise the flag the event
//! was created with. Findings are collected, never thrown.

use chrono::Utc;
use serde_json::Value;

use crate::classify::{self, ensure_is_string_not_empty};
use crate::event::{Attr, CloudEvent};
use crate::extensions;
use crate::validation::{collect_errors, ValidationError};

/// Boxed error returned by injected collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Checks event data against its `dataschema`.
///
/// Implemented for any `Fn(Option<&Value>, Option<&str>) -> Result<bool, BoxError>`.
pub trait SchemaValidator {
    /// Returns `Ok(true)` when `data` conforms to `dataschema`.
    fn check(&self, data: Option<&Value>, dataschema: Option<&str>) -> Result<bool, BoxError>;
}

impl<F> SchemaValidator for F
where
    F: Fn(Option<&Value>, Option<&str>) -> Result<bool, BoxError>,
{
    fn check(&self, data: Option<&Value>, dataschema: Option<&str>) -> Result<bool, BoxError> {
        self(data, dataschema)
    }
}

/// Options for [`validate`].
#[derive(Clone, Copy, Default)]
pub struct ValidateOptions<'a> {
    /// Overrides the strict flag of the event when set.
    pub strict: Option<bool>,
    /// Injected dataschema check, run in strict mode only.
    pub dataschema_validator: Option<&'a dyn SchemaValidator>,
}

impl ValidateOptions<'_> {
    /// Options forcing strict validation.
    pub fn strict() -> Self {
        Self {
            strict: Some(true),
            ..Self::default()
        }
    }

    /// Options forcing lenient validation.
    pub fn lenient() -> Self {
        Self {
            strict: Some(false),
            ..Self::default()
        }
    }
}

/// Validates an event and returns every finding, in rule order.
pub fn validate(event: &CloudEvent, options: &ValidateOptions<'_>) -> Vec<ValidationError> {
    let strict = options.strict.unwrap_or_else(|| event.is_strict());

    let mut errors = collect_errors([
        ensure_is_string_not_empty(event.id.as_deref(), "id"),
        ensure_is_string_not_empty(event.event_type.as_deref(), "type"),
        ensure_is_string_not_empty(event.source.as_deref(), "source"),
        ensure_optional_string(&event.dataschema, "dataschema"),
        ensure_optional_string(&event.subject, "subject"),
    ]);
    if let Some(data_base64) = &event.data_base64 {
        errors.extend(collect_errors([
            ensure_is_string_not_empty(Some(data_base64.as_str()), "data_base64"),
            ensure_data_exclusive(event),
        ]));
    }

    if strict {
        errors.extend(validate_strict(event, options));
    }
    errors
}

/// Returns true when [`validate`] reports nothing.
pub fn is_valid(event: &CloudEvent, options: &ValidateOptions<'_>) -> bool {
    validate(event, options).is_empty()
}

fn validate_strict(event: &CloudEvent, options: &ValidateOptions<'_>) -> Vec<ValidationError> {
    let now = Utc::now();
    let mut errors = collect_errors([
        classify::ensure_is_version(&event.specversion, "specversion"),
        event
            .source
            .as_deref()
            .map_or(Ok(()), |source| classify::ensure_is_uri_reference(Some(source), "source")),
        classify::ensure_is_date_past(event.time.as_ref(), &now, "time"),
        ensure_is_string_not_empty(Some(event.datacontenttype.as_str()), "datacontenttype"),
        event
            .dataschema
            .as_value()
            .map_or(Ok(()), |schema| classify::ensure_is_uri(schema, None, "dataschema")),
        event.data_base64.as_deref().map_or(Ok(()), ensure_base64),
        options
            .dataschema_validator
            .map_or(Ok(()), |validator| ensure_schema(validator, event)),
        ensure_data_matches_content_type(event),
    ]);

    for (name, value) in event.extensions().unwrap_or_default() {
        errors.extend(collect_errors([
            ensure_extension_name(&name),
            ensure_extension_value(&name, &value),
        ]));
    }
    errors
}

fn ensure_optional_string(attr: &Attr<String>, field: &str) -> Result<(), ValidationError> {
    match attr.as_value() {
        Some(value) => ensure_is_string_not_empty(Some(value.as_str()), field),
        None => Ok(()),
    }
}

fn ensure_data_exclusive(event: &CloudEvent) -> Result<(), ValidationError> {
    if classify::is_defined_and_not_null(event.data.as_ref()) {
        return Err(ValidationError::MutuallyExclusive {
            field: "data".to_string(),
            other: "data_base64".to_string(),
        });
    }
    Ok(())
}

fn ensure_base64(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || classify::is_base64(value) {
        // Emptiness is already reported by the standard checks.
        return Ok(());
    }
    Err(ValidationError::PatternMismatch {
        field: "data_base64".to_string(),
        value: value.to_string(),
    })
}

fn ensure_schema(
    validator: &dyn SchemaValidator,
    event: &CloudEvent,
) -> Result<(), ValidationError> {
    let dataschema = event.dataschema.as_value().map(String::as_str);
    match validator.check(event.data.as_ref(), dataschema) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ValidationError::SchemaRejected {
            dataschema: dataschema.unwrap_or("undefined").to_string(),
        }),
        Err(err) => Err(ValidationError::SchemaCheckFailed {
            reason: err.to_string(),
        }),
    }
}

fn ensure_data_matches_content_type(event: &CloudEvent) -> Result<(), ValidationError> {
    let data = event.data.as_ref();
    if !classify::is_defined_and_not_null(data) {
        return Ok(());
    }
    let content_type = &event.datacontenttype;
    if content_type == CloudEvent::DATACONTENTTYPE_DEFAULT {
        let reason = match data {
            Some(Value::String(text)) => {
                if serde_json::from_str::<Value>(text).is_ok() {
                    return Ok(());
                }
                "string data is not valid JSON"
            }
            _ if classify::is_object_or_collection(data) => return Ok(()),
            _ => "data must be an object, a collection or a JSON string",
        };
        return Err(ValidationError::IncompatibleData {
            content_type: content_type.clone(),
            reason,
        });
    }
    if classify::is_object_or_collection_or_value(data) {
        return Ok(());
    }
    Err(ValidationError::IncompatibleData {
        content_type: content_type.clone(),
        reason: "data must be an object, a collection or a primitive value",
    })
}

fn ensure_extension_name(name: &str) -> Result<(), ValidationError> {
    if extensions::is_standard_property(name) {
        return Err(ValidationError::ReservedExtensionName {
            name: name.to_string(),
        });
    }
    if !extensions::is_extension_name_valid(name) {
        return Err(ValidationError::InvalidExtensionName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn ensure_extension_value(name: &str, value: &Value) -> Result<(), ValidationError> {
    if extensions::is_extension_value_valid(value) {
        return Ok(());
    }
    Err(ValidationError::InvalidExtensionValue {
        name: name.to_string(),
    })
}

impl CloudEvent {
    /// Validates this event; see [`validate`].
    pub fn validate(&self, options: &ValidateOptions<'_>) -> Vec<ValidationError> {
        validate(self, options)
    }

    /// Returns true when this event has no validation findings.
    pub fn is_valid(&self, options: &ValidateOptions<'_>) -> bool {
        is_valid(self, options)
    }
}
