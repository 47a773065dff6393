//! Event filtering API for selective batch iteration.

use cloudevent_core::{CloudEvent, ValidateOptions};

use crate::item::BatchItem;

/// Options for [`events`] and [`get_events`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    /// Keep only events that pass validation.
    pub only_valid: bool,
    /// Strictness used for the validity check.
    pub strict: bool,
}

impl FilterOptions {
    /// Returns the event in `item` if it passes the filter.
    pub fn select<'a>(&self, item: &'a BatchItem) -> Option<&'a CloudEvent> {
        let event = item.as_event()?;
        if self.only_valid && !event.is_valid(&self.validate_options()) {
            return None;
        }
        Some(event)
    }

    fn validate_options(&self) -> ValidateOptions<'static> {
        ValidateOptions {
            strict: Some(self.strict),
            dataschema_validator: None,
        }
    }
}

/// Iterator over the events of a batch, in input order.
///
/// Non-event items are skipped silently.
#[derive(Debug, Clone)]
pub struct Events<'a> {
    /// Remaining items.
    items: std::slice::Iter<'a, BatchItem>,
    /// Filter to apply.
    options: FilterOptions,
}

impl<'a> Iterator for Events<'a> {
    type Item = &'a CloudEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.items.next()?;
            if let Some(event) = self.options.select(item) {
                return Some(event);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

/// Lazily iterates over the events of `batch`.
///
/// # Example
///
/// ```rust
/// use cloudevent_batch::{events, BatchItem, FilterOptions};
/// use cloudevent_core::{CloudEvent, EventOptions};
/// use serde_json::json;
///
/// let event = CloudEvent::new(
///     Some("1".into()),
///     Some("com.example.test".into()),
///     Some("/".into()),
///     None,
///     EventOptions::default(),
///     None,
/// )?;
/// let batch = vec![BatchItem::from(json!(42)), BatchItem::Undefined, event.into()];
/// assert_eq!(events(&batch, FilterOptions::default()).count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn events(batch: &[BatchItem], options: FilterOptions) -> Events<'_> {
    Events {
        items: batch.iter(),
        options,
    }
}

/// Collects the events of `batch`.
pub fn get_events(batch: &[BatchItem], options: FilterOptions) -> Vec<&CloudEvent> {
    events(batch, options).collect()
}
