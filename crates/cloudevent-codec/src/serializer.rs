//! Event serialization.

use cloudevent_core::{classify, BoxError, CloudEvent, DataType};
use serde_json::Value;
use tracing::debug;

use crate::errors::CodecError;
use crate::limits::{ensure_size, ensure_valid};

/// Encodes the payload of an event with a non-JSON content type.
///
/// Implemented for any `Fn(Option<&Value>) -> Result<String, BoxError>`.
pub trait Encoder {
    /// Returns the wire form of `payload`.
    fn encode(&self, payload: Option<&Value>) -> Result<String, BoxError>;
}

impl<F> Encoder for F
where
    F: Fn(Option<&Value>) -> Result<String, BoxError>,
{
    fn encode(&self, payload: Option<&Value>) -> Result<String, BoxError> {
        self(payload)
    }
}

/// Options for [`serialize`].
#[derive(Clone, Default)]
pub struct SerializeOptions<'a> {
    /// Encoder for non-JSON content types; takes priority over `encoded_data`.
    pub encoder: Option<&'a dyn Encoder>,
    /// Already encoded data for non-JSON content types.
    pub encoded_data: Option<String>,
    /// Fail instead of serializing an event with validation findings.
    pub only_valid: bool,
    /// Fail when the output reaches 64 KB.
    pub only_if_less_than_64kb: bool,
}

/// Serializes an event to its JSON wire form.
///
/// With the default content type the event is written as is. With any other
/// content type the payload is first encoded to a string (see
/// [`SerializeOptions`]) and that string replaces `data` in the output.
/// Numbers and booleans without an encoder are written unchanged.
///
/// # Example
///
/// ```rust
/// use cloudevent_codec::{serialize, SerializeOptions};
/// use cloudevent_core::{CloudEvent, EventOptions};
/// use serde_json::json;
///
/// let event = CloudEvent::new(
///     Some("1".into()),
///     Some("com.example.test".into()),
///     Some("/".into()),
///     Some(json!({"hello": "world"})),
///     EventOptions::default(),
///     None,
/// )?;
/// let text = serialize(&event, &SerializeOptions::default())?;
/// assert!(text.contains(r#""data":{"hello":"world"}"#));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`CodecError`] if:
/// - `only_valid` is set and the event has validation findings
/// - the content type is not the default and the payload cannot be encoded
/// - `only_if_less_than_64kb` is set and the output is too large
pub fn serialize(event: &CloudEvent, options: &SerializeOptions<'_>) -> Result<String, CodecError> {
    if event.datacontenttype == CloudEvent::DATACONTENTTYPE_DEFAULT {
        ensure_valid(event, options.only_valid)?;
        let text = serde_json::to_string(event)?;
        ensure_size(&text, options.only_if_less_than_64kb)?;
        return Ok(text);
    }

    let encoded_event = match encode_data(event, options)? {
        Some(encoded) => {
            let mut encoded_event = event.clone();
            encoded_event.data = Some(Value::String(encoded));
            encoded_event
        }
        None => event.clone(),
    };
    ensure_valid(&encoded_event, options.only_valid)?;
    let text = serde_json::to_string(&encoded_event)?;
    ensure_size(&text, options.only_if_less_than_64kb)?;
    Ok(text)
}

/// Resolves the encoded form of the data; `None` keeps the event unchanged.
fn encode_data(
    event: &CloudEvent,
    options: &SerializeOptions<'_>,
) -> Result<Option<String>, CodecError> {
    let data = event.data.as_ref();
    if event.data_type() == DataType::Binary && classify::is_undefined_or_null(data) {
        return Ok(None);
    }
    if let Some(encoder) = options.encoder {
        let payload = event.payload();
        return encoder
            .encode(payload.as_ref())
            .map(Some)
            .map_err(CodecError::Encoder);
    }
    if let Some(encoded) = options.encoded_data.as_ref().filter(|e| !e.is_empty()) {
        return Ok(Some(encoded.clone()));
    }
    match data {
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(value) if classify::is_value(Some(value)) => {
            debug!(content_type = %event.datacontenttype, "primitive data kept as is");
            Ok(None)
        }
        None | Some(Value::Null) => Ok(None),
        Some(_) => Err(CodecError::MissingEncoder(event.datacontenttype.clone())),
    }
}
