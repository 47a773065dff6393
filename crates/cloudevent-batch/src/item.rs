//! Heterogeneous batch elements.

use chrono::{DateTime, Utc};
use cloudevent_core::{classify, CloudEvent};
use serde_json::Value;

/// One element of a batch of untrusted values.
///
/// Only [`BatchItem::Event`] is ever treated as an event; every other variant
/// is discarded by filtering and reported by validation.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchItem {
    /// A missing value.
    Undefined,
    /// Any JSON value: null, primitives, plain objects and arrays.
    Value(Value),
    /// A timestamp.
    Date(DateTime<Utc>),
    /// An event.
    Event(CloudEvent),
    /// A nested sequence of items.
    List(Vec<BatchItem>),
}

impl BatchItem {
    /// Returns true for [`BatchItem::Undefined`] and JSON null.
    pub fn is_undefined_or_null(&self) -> bool {
        matches!(self, BatchItem::Undefined | BatchItem::Value(Value::Null))
    }

    /// Returns the event if this item is one.
    pub fn as_event(&self) -> Option<&CloudEvent> {
        match self {
            BatchItem::Event(event) => Some(event),
            _ => None,
        }
    }

    /// Short name of the item kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            BatchItem::Undefined => "undefined",
            BatchItem::Value(value) => classify::kind_name(Some(value)),
            BatchItem::Date(_) => "date",
            BatchItem::Event(_) => "CloudEvent",
            BatchItem::List(_) => "list",
        }
    }
}

impl From<CloudEvent> for BatchItem {
    fn from(event: CloudEvent) -> Self {
        BatchItem::Event(event)
    }
}

impl From<Value> for BatchItem {
    fn from(value: Value) -> Self {
        BatchItem::Value(value)
    }
}

impl From<DateTime<Utc>> for BatchItem {
    fn from(date: DateTime<Utc>) -> Self {
        BatchItem::Date(date)
    }
}

impl From<Vec<BatchItem>> for BatchItem {
    fn from(items: Vec<BatchItem>) -> Self {
        BatchItem::List(items)
    }
}

impl<T: Into<BatchItem>> From<Option<T>> for BatchItem {
    fn from(value: Option<T>) -> Self {
        value.map_or(BatchItem::Undefined, Into::into)
    }
}
