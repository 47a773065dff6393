//! Event deserialization.

use cloudevent_core::time::timestamp_from_string;
use cloudevent_core::{
    classify, get_extensions_of, get_strict_of, Attr, BoxError, CloudEvent, DataType,
    EventOptions,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::CodecError;
use crate::limits::{ensure_size, ensure_valid};

/// Decodes the raw data of an event with a non-JSON content type.
///
/// Implemented for any `Fn(Option<&Value>) -> Result<Value, BoxError>`.
pub trait Decoder {
    /// Returns the decoded form of `data`.
    fn decode(&self, data: Option<&Value>) -> Result<Value, BoxError>;
}

impl<F> Decoder for F
where
    F: Fn(Option<&Value>) -> Result<Value, BoxError>,
{
    fn decode(&self, data: Option<&Value>) -> Result<Value, BoxError> {
        self(data)
    }
}

/// Options for [`deserialize`].
#[derive(Clone, Default)]
pub struct DeserializeOptions<'a> {
    /// Decoder for non-JSON content types; takes priority over `decoded_data`.
    pub decoder: Option<&'a dyn Decoder>,
    /// Already decoded data for non-JSON content types.
    pub decoded_data: Option<Value>,
    /// Fail instead of returning an event with validation findings.
    pub only_valid: bool,
    /// Fail when the input reaches 64 KB.
    pub only_if_less_than_64kb: bool,
    /// Minutes added to the parsed `time`.
    pub timezone_offset: i64,
}

/// Deserializes an event from its JSON wire form.
///
/// Every key that is not a standard attribute becomes an extension, except
/// `strictvalidation`, which restores the strict flag. The event is rebuilt
/// through [`CloudEvent::new`], so strict events are checked again.
///
/// # Example
///
/// ```rust
/// use cloudevent_codec::{deserialize, DeserializeOptions};
///
/// let text = r#"{"id":"1","type":"com.example.test","source":"/","specversion":"1.0","data":{"k":"v"},"ext":"x"}"#;
/// let event = deserialize(text, &DeserializeOptions::default())?;
/// assert_eq!(event.id.as_deref(), Some("1"));
/// assert_eq!(event.extension("ext").and_then(|v| v.as_str()), Some("x"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`CodecError`] if:
/// - the text is not a JSON object, or `specversion` is not `1.0`
/// - a standard attribute has the wrong JSON type or `time` is not RFC 3339
/// - the event cannot be rebuilt (strict events only)
/// - the content type is not the default and the data cannot be decoded
/// - `only_valid` or `only_if_less_than_64kb` rejects the result
pub fn deserialize(text: &str, options: &DeserializeOptions<'_>) -> Result<CloudEvent, CodecError> {
    ensure_size(text, options.only_if_less_than_64kb)?;
    let value: Value = serde_json::from_str(text)?;
    let event = decode_event(value, options)?;
    ensure_valid(&event, options.only_valid)?;
    Ok(event)
}

/// Deserializes an event from an already parsed JSON value.
///
/// The size gate measures the compact serialization of `value`.
///
/// # Errors
///
/// Same as [`deserialize`], minus JSON syntax errors.
pub fn deserialize_value(
    value: Value,
    options: &DeserializeOptions<'_>,
) -> Result<CloudEvent, CodecError> {
    if options.only_if_less_than_64kb {
        ensure_size(&value.to_string(), true)?;
    }
    let event = decode_event(value, options)?;
    ensure_valid(&event, options.only_valid)?;
    Ok(event)
}

fn decode_event(value: Value, options: &DeserializeOptions<'_>) -> Result<CloudEvent, CodecError> {
    let mut object = match value {
        Value::Object(object) => object,
        other => return Err(CodecError::NotAnObject(classify::kind_name(Some(&other)))),
    };

    match object.get("specversion") {
        Some(Value::String(version)) if version == CloudEvent::VERSION => {}
        other => {
            return Err(CodecError::VersionMismatch {
                expected: CloudEvent::VERSION,
                found: match other {
                    Some(Value::String(version)) => version.clone(),
                    Some(value) => value.to_string(),
                    None => "undefined".to_string(),
                },
            })
        }
    }

    let strict = get_strict_of(&object)?;
    let extensions = get_extensions_of(&object);
    let time = match object.get("time") {
        None | Some(Value::Null) => Attr::Null,
        Some(Value::String(time)) => {
            Attr::Value(timestamp_from_string(time, options.timezone_offset)?)
        }
        Some(_) => {
            return Err(CodecError::InvalidAttribute {
                name: "time",
                expected: "an RFC 3339 string",
            })
        }
    };
    let event_options = EventOptions {
        strict,
        time,
        data_base64: string_attr(&object, "data_base64")?,
        datacontenttype: string_attr(&object, "datacontenttype")?,
        dataschema: optional_attr(&object, "dataschema")?,
        subject: optional_attr(&object, "subject")?,
    };

    let mut event = CloudEvent::new(
        string_attr(&object, "id")?,
        string_attr(&object, "type")?,
        string_attr(&object, "source")?,
        object.remove("data"),
        event_options,
        extensions,
    )?;

    if event.datacontenttype != CloudEvent::DATACONTENTTYPE_DEFAULT {
        if let Some(decoded) = decode_data(&event, options)? {
            event.data = Some(decoded);
        }
    }
    Ok(event)
}

/// Resolves the decoded form of the data; `None` keeps it unchanged.
fn decode_data(
    event: &CloudEvent,
    options: &DeserializeOptions<'_>,
) -> Result<Option<Value>, CodecError> {
    let data = event.data.as_ref();
    if event.data_type() == DataType::Binary && classify::is_undefined_or_null(data) {
        return Ok(None);
    }
    if let Some(decoder) = options.decoder {
        return decoder.decode(data).map(Some).map_err(CodecError::Decoder);
    }
    if let Some(decoded) = &options.decoded_data {
        return Ok(Some(decoded.clone()));
    }
    if classify::is_value(data) {
        debug!(content_type = %event.datacontenttype, "primitive data kept as is");
        return Ok(None);
    }
    if classify::is_undefined_or_null(data) {
        return Ok(None);
    }
    Err(CodecError::MissingDecoder(event.datacontenttype.clone()))
}

fn string_attr(
    object: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, CodecError> {
    match object.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(CodecError::InvalidAttribute {
            name,
            expected: "a string",
        }),
    }
}

fn optional_attr(
    object: &Map<String, Value>,
    name: &'static str,
) -> Result<Attr<String>, CodecError> {
    match object.get(name) {
        None => Ok(Attr::Absent),
        Some(Value::Null) => Ok(Attr::Null),
        Some(Value::String(value)) => Ok(Attr::Value(value.clone())),
        Some(_) => Err(CodecError::InvalidAttribute {
            name,
            expected: "a string or null",
        }),
    }
}
