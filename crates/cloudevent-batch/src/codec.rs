//! JSON batch wire format.

use cloudevent_codec::{
    deserialize_value, serialize, CodecError, DeserializeOptions, SerializeOptions,
};
use cloudevent_core::{classify, CloudEvent};
use serde_json::Value;
use tracing::error;

use crate::error::BatchError;
use crate::filter::FilterOptions;
use crate::item::BatchItem;

/// Media type of a serialized batch.
pub const MEDIA_TYPE: &str = "application/cloudevents-batch+json";

/// Options for [`serialize_events`].
#[derive(Clone, Default)]
pub struct BatchSerializeOptions<'a> {
    /// Selects the events to write.
    pub filter: FilterOptions,
    /// Options applied to every event.
    pub serialize: SerializeOptions<'a>,
    /// One element per line instead of a single line.
    pub pretty_print: bool,
    /// Log every item failure.
    pub log_error: bool,
    /// Abort the whole batch on the first item failure.
    pub throw_error: bool,
}

/// Options for [`deserialize_events`].
#[derive(Clone, Default)]
pub struct BatchDeserializeOptions<'a> {
    /// Options applied to every element.
    pub deserialize: DeserializeOptions<'a>,
    /// Log every item failure.
    pub log_error: bool,
    /// Abort the whole batch on the first item failure.
    pub throw_error: bool,
}

/// Serializes the events of `batch` to a JSON array.
///
/// Non-event items are skipped. An event that fails to serialize is written
/// as `null` unless `throw_error` aborts the batch.
///
/// # Errors
///
/// Returns [`BatchError::Item`] with the input index of the failing item
/// when `throw_error` is set.
pub fn serialize_events(
    batch: &[BatchItem],
    options: &BatchSerializeOptions<'_>,
) -> Result<String, BatchError> {
    let mut entries = Vec::new();
    for (index, item) in batch.iter().enumerate() {
        let event = match options.filter.select(item) {
            Some(event) => event,
            None => continue,
        };
        match serialize(event, &options.serialize) {
            Ok(text) => entries.push(text),
            Err(source) => {
                on_item_failure(index, source, options.log_error, options.throw_error)?;
                entries.push(Value::Null.to_string());
            }
        }
    }
    Ok(join_entries(&entries, options.pretty_print))
}

/// Deserializes a JSON array of events.
///
/// Elements that fail to deserialize, `null` placeholders included, become
/// `None` unless `throw_error` aborts the batch.
///
/// # Errors
///
/// Returns [`BatchError`] if:
/// - the text is not valid JSON, is null, or is not an array
/// - an element fails and `throw_error` is set
pub fn deserialize_events(
    text: &str,
    options: &BatchDeserializeOptions<'_>,
) -> Result<Vec<Option<CloudEvent>>, BatchError> {
    let values = match serde_json::from_str::<Value>(text)? {
        Value::Array(values) => values,
        Value::Null => return Err(BatchError::UndefinedOrNull),
        other => return Err(BatchError::NotAnArray(classify::kind_name(Some(&other)))),
    };

    let mut events = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match deserialize_value(value, &options.deserialize) {
            Ok(event) => events.push(Some(event)),
            Err(source) => {
                on_item_failure(index, source, options.log_error, options.throw_error)?;
                events.push(None);
            }
        }
    }
    Ok(events)
}

fn on_item_failure(
    index: usize,
    source: CodecError,
    log_error: bool,
    throw_error: bool,
) -> Result<(), BatchError> {
    if log_error {
        error!(index, error = %source, "batch item failed");
    }
    if throw_error {
        return Err(BatchError::Item { index, source });
    }
    Ok(())
}

fn join_entries(entries: &[String], pretty_print: bool) -> String {
    if entries.is_empty() {
        return "[]".to_string();
    }
    if pretty_print {
        format!("[\n  {}\n]", entries.join(",\n  "))
    } else {
        format!("[{}]", entries.join(","))
    }
}
