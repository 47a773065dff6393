use std::fmt;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify;
use crate::errors::EventError;
use crate::extensions::{self, Extensions, STRICT_EXTENSION};
use crate::time::timestamp_to_string;

/// An optional attribute that distinguishes "not given" from "explicitly null".
///
/// `Absent` lets the attribute take its default; `Null` is kept verbatim and
/// serialized as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr<T> {
    /// The attribute was not given.
    Absent,
    /// The attribute was explicitly set to null.
    Null,
    /// The attribute has a value.
    Value(T),
}

impl<T> Default for Attr<T> {
    fn default() -> Self {
        Attr::Absent
    }
}

impl<T> From<T> for Attr<T> {
    fn from(value: T) -> Self {
        Attr::Value(value)
    }
}

impl<T> Attr<T> {
    /// Returns the value, if any.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Attr::Value(value) => Some(value),
            Attr::Absent | Attr::Null => None,
        }
    }

    /// Returns true when the attribute was not given.
    pub fn is_absent(&self) -> bool {
        matches!(self, Attr::Absent)
    }

    /// Returns true when the attribute was explicitly null.
    pub fn is_null(&self) -> bool {
        matches!(self, Attr::Null)
    }
}

/// Optional attributes and flags for [`CloudEvent::new`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOptions {
    /// Create the event in strict mode (default: false).
    pub strict: bool,
    /// Event time; `Absent` means "now".
    pub time: Attr<DateTime<Utc>>,
    /// Binary payload, base64 encoded.
    pub data_base64: Option<String>,
    /// Content type of `data`; `None` means `application/json`.
    pub datacontenttype: Option<String>,
    /// Schema the data adheres to.
    pub dataschema: Attr<String>,
    /// Subject of the event in the context of the source.
    pub subject: Attr<String>,
}

/// How the payload of an event is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `data` holds the payload.
    Text,
    /// `data_base64` holds the payload.
    Binary,
    /// No payload.
    Unknown,
}

/// A CloudEvent (CloudEvents 1.0).
///
/// Standard attributes are public fields. Extensions are kept apart from them
/// and flattened as sibling keys when serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudEvent {
    /// Event identifier, unique within the scope of the source.
    pub id: Option<String>,
    /// Event type (`type` on the wire).
    pub event_type: Option<String>,
    /// Context in which the event happened, a URI reference.
    pub source: Option<String>,
    /// CloudEvents version this event conforms to (`specversion`).
    pub specversion: String,
    /// Payload in its raw form. `Some(Value::Null)` is an explicit null.
    pub data: Option<Value>,
    /// Binary payload, base64 encoded.
    pub data_base64: Option<String>,
    /// Content type of `data`.
    pub datacontenttype: String,
    /// Schema the data adheres to.
    pub dataschema: Attr<String>,
    /// Event time; `None` when explicitly set to null.
    pub time: Option<DateTime<Utc>>,
    /// Subject of the event in the context of the source.
    pub subject: Attr<String>,
    extensions: Extensions,
    strict: bool,
}

impl CloudEvent {
    /// CloudEvents version implemented by this crate.
    pub const VERSION: &'static str = "1.0";
    /// Media type of a single serialized event.
    pub const MEDIA_TYPE: &'static str = "application/cloudevents+json";
    /// Content type assumed when none is given.
    pub const DATACONTENTTYPE_DEFAULT: &'static str = "application/json";

    /// Creates an event.
    ///
    /// In strict mode the identity triple is mandatory, `data` and
    /// `data_base64` exclude each other, supplied extensions must be non-empty
    /// and must not shadow standard attributes. Outside strict mode those
    /// problems are left for [`validate`](crate::validator::validate) to report.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] for the strict-mode violations above, and in any
    /// mode when extensions try to set the reserved `strictvalidation` flag.
    pub fn new(
        id: Option<String>,
        event_type: Option<String>,
        source: Option<String>,
        data: Option<Value>,
        options: EventOptions,
        extensions: Option<Extensions>,
    ) -> Result<Self, EventError> {
        let EventOptions {
            strict,
            time,
            data_base64,
            datacontenttype,
            dataschema,
            subject,
        } = options;

        if strict {
            for (field, value) in [("id", &id), ("type", &event_type), ("source", &source)] {
                if value.as_deref().map_or(true, str::is_empty) {
                    return Err(EventError::MissingMandatory(field));
                }
            }
            if classify::is_defined_and_not_null(data.as_ref()) && data_base64.is_some() {
                return Err(EventError::DataConflict);
            }
        }

        let extensions = match extensions {
            None => Extensions::new(),
            Some(extensions) => {
                if strict && extensions.is_empty() {
                    return Err(EventError::EmptyExtensions);
                }
                for name in extensions.keys() {
                    if name == STRICT_EXTENSION {
                        return Err(EventError::ReservedExtension(name.clone()));
                    }
                    if extensions::is_standard_property(name) {
                        if strict {
                            return Err(EventError::ExtensionCollision(name.clone()));
                        }
                        warn!(extension = %name, "extension collides with a standard property");
                    }
                }
                extensions
            }
        };

        let time = match time {
            Attr::Absent => Some(Utc::now()),
            Attr::Null => None,
            Attr::Value(time) => Some(time),
        };

        Ok(Self {
            id,
            event_type,
            source,
            specversion: Self::VERSION.to_string(),
            data,
            data_base64,
            datacontenttype: datacontenttype
                .unwrap_or_else(|| Self::DATACONTENTTYPE_DEFAULT.to_string()),
            dataschema,
            time,
            subject,
            extensions,
            strict,
        })
    }

    /// Creates a copy of this event with a different id, re-running construction.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] under the same rules as [`CloudEvent::new`].
    pub fn clone_with_id(&self, id: impl Into<String>) -> Result<Self, EventError> {
        let options = EventOptions {
            strict: self.strict,
            time: match self.time {
                Some(time) => Attr::Value(time),
                None => Attr::Null,
            },
            data_base64: self.data_base64.clone(),
            datacontenttype: Some(self.datacontenttype.clone()),
            dataschema: self.dataschema.clone(),
            subject: self.subject.clone(),
        };
        Self::new(
            Some(id.into()),
            self.event_type.clone(),
            self.source.clone(),
            self.data.clone(),
            options,
            self.extensions(),
        )
    }

    /// Returns true when the event was created in strict mode.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns a copy of the extensions, or `None` when there are none.
    pub fn extensions(&self) -> Option<Extensions> {
        if self.extensions.is_empty() {
            None
        } else {
            Some(self.extensions.clone())
        }
    }

    /// Returns a single extension value.
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }

    /// Returns a freshly decoded view of the payload.
    ///
    /// `data_base64` is decoded to a UTF-8 string. Otherwise string data with a
    /// JSON content type is parsed, falling back to the string itself, and any
    /// other data is returned as a copy. Mutating the result never touches the
    /// event.
    pub fn payload(&self) -> Option<Value> {
        if let Some(encoded) = &self.data_base64 {
            return Some(Value::String(decode_base64(encoded)));
        }
        match &self.data {
            Some(Value::String(text)) if is_datacontenttype_json(&self.datacontenttype) => {
                match serde_json::from_str(text) {
                    Ok(parsed) => Some(parsed),
                    Err(err) => {
                        debug!(error = %err, "string data is not JSON, returning it as is");
                        Some(Value::String(text.clone()))
                    }
                }
            }
            other => other.clone(),
        }
    }

    /// Classifies how the payload is carried.
    pub fn data_type(&self) -> DataType {
        if self.data_base64.is_some() {
            DataType::Binary
        } else if classify::is_defined_and_not_null(self.data.as_ref()) {
            DataType::Text
        } else {
            DataType::Unknown
        }
    }
}

fn decode_base64(encoded: &str) -> String {
    match base64::engine::general_purpose::STANDARD.decode(encoded) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            debug!(error = %err, "data_base64 is not valid base64, returning it as is");
            encoded.to_string()
        }
    }
}

/// Returns true for JSON media types: `application/json`, `text/json` and any
/// `+json` structured syntax suffix. Parameters such as `charset` are ignored.
pub fn is_datacontenttype_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence == "text/json" || essence.ends_with("+json")
}

impl Serialize for CloudEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        if let Some(event_type) = &self.event_type {
            map.serialize_entry("type", event_type)?;
        }
        if let Some(source) = &self.source {
            map.serialize_entry("source", source)?;
        }
        map.serialize_entry("specversion", &self.specversion)?;
        if let Some(data) = &self.data {
            map.serialize_entry("data", data)?;
        }
        if let Some(data_base64) = &self.data_base64 {
            map.serialize_entry("data_base64", data_base64)?;
        }
        map.serialize_entry("datacontenttype", &self.datacontenttype)?;
        serialize_attr(&mut map, "dataschema", &self.dataschema)?;
        match &self.time {
            Some(time) => map.serialize_entry("time", &timestamp_to_string(time))?,
            None => map.serialize_entry("time", &Value::Null)?,
        }
        serialize_attr(&mut map, "subject", &self.subject)?;
        for (name, value) in &self.extensions {
            // Standard attributes win over colliding extensions.
            if extensions::is_standard_property(name) {
                continue;
            }
            map.serialize_entry(name, value)?;
        }
        if self.strict {
            map.serialize_entry(STRICT_EXTENSION, &true)?;
        }
        map.end()
    }
}

fn serialize_attr<M: SerializeMap>(
    map: &mut M,
    key: &'static str,
    attr: &Attr<String>,
) -> Result<(), M::Error> {
    match attr {
        Attr::Absent => Ok(()),
        Attr::Null => map.serialize_entry(key, &Value::Null),
        Attr::Value(value) => map.serialize_entry(key, value),
    }
}

impl fmt::Display for CloudEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CloudEvent[specversion: {}, id: {}, type: {}, source: {}, datacontenttype: {}, \
             time: {}, data: {}, data_base64: {}]",
            self.specversion,
            dump(self.id.as_deref()),
            dump(self.event_type.as_deref()),
            dump(self.source.as_deref()),
            self.datacontenttype,
            self.time
                .as_ref()
                .map_or_else(|| "null".to_string(), timestamp_to_string),
            self.data
                .as_ref()
                .map_or_else(|| "undefined".to_string(), Value::to_string),
            dump(self.data_base64.as_deref()),
        )
    }
}

fn dump(value: Option<&str>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| format!("'{}'", v))
}
