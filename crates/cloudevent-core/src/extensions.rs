//! Extension attributes.
//!
//! On the wire, extensions are sibling keys of the standard attributes. In
//! memory they live in their own map; the helpers here move them between a
//! flat JSON object and that map.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::classify;
use crate::errors::EventError;

/// Extension map type: name to primitive value.
pub type Extensions = BTreeMap<String, Value>;

/// Names of the standard attributes, in wire order.
pub const STANDARD_PROPERTIES: [&str; 10] = [
    "id",
    "type",
    "source",
    "specversion",
    "data",
    "data_base64",
    "datacontenttype",
    "dataschema",
    "time",
    "subject",
];

/// Reserved extension recording whether an event was created in strict mode.
pub const STRICT_EXTENSION: &str = "strictvalidation";

static EXTENSION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{1,20}$").expect("invalid regex"));

/// Returns true for the name of a standard attribute.
pub fn is_standard_property(name: &str) -> bool {
    STANDARD_PROPERTIES.contains(&name)
}

/// Returns true for keys that are neither standard nor reserved.
pub fn is_extension_property(name: &str) -> bool {
    !is_standard_property(name) && name != STRICT_EXTENSION
}

/// Returns true for lowercase alphanumeric names of 1 to 20 characters.
pub fn is_extension_name_valid(name: &str) -> bool {
    EXTENSION_NAME.is_match(name)
}

/// Returns true for string, boolean, number or null values.
pub fn is_extension_value_valid(value: &Value) -> bool {
    classify::is_value(Some(value)) || value.is_null()
}

/// Copies `extensions` into `target` as sibling keys.
///
/// Keys naming a standard attribute or the reserved strict flag are rejected
/// and leave `target` untouched.
///
/// # Errors
///
/// Returns [`EventError::ExtensionCollision`] or
/// [`EventError::ReservedExtension`] for the first offending key.
pub fn set_extensions_in(
    target: &mut Map<String, Value>,
    extensions: &Extensions,
) -> Result<(), EventError> {
    for name in extensions.keys() {
        if is_standard_property(name) {
            return Err(EventError::ExtensionCollision(name.clone()));
        }
        if name == STRICT_EXTENSION {
            return Err(EventError::ReservedExtension(name.clone()));
        }
    }
    for (name, value) in extensions {
        target.insert(name.clone(), value.clone());
    }
    Ok(())
}

/// Lifts the extension keys out of a flat JSON object.
///
/// Returns `None` when the object has no extension keys.
pub fn get_extensions_of(object: &Map<String, Value>) -> Option<Extensions> {
    let extensions: Extensions = object
        .iter()
        .filter(|(name, _)| is_extension_property(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    if extensions.is_empty() {
        None
    } else {
        Some(extensions)
    }
}

/// Records the strict flag in a flat JSON object.
///
/// Only strict objects carry the key; a lenient flag removes it.
pub fn set_strict_in(target: &mut Map<String, Value>, strict: bool) {
    if strict {
        target.insert(STRICT_EXTENSION.to_string(), Value::Bool(true));
    } else {
        target.remove(STRICT_EXTENSION);
    }
}

/// Reads the strict flag from a flat JSON object.
///
/// # Errors
///
/// Returns [`EventError::InvalidStrictFlag`] when the key holds a non-boolean.
pub fn get_strict_of(object: &Map<String, Value>) -> Result<bool, EventError> {
    match object.get(STRICT_EXTENSION) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(strict)) => Ok(*strict),
        Some(other) => Err(EventError::InvalidStrictFlag(classify::kind_name(Some(
            other,
        )))),
    }
}
