//! The ordered key/value container the codecs read from and write to.
//!
//! The codecs never parse document syntax themselves. They operate on an
//! in-memory ordered mapping produced by an external reader (see the
//! `clinwire-serde` crate for the JSON one).

use serde_json::{Map, Value};

use crate::error::{CodecError, Result};

/// A decoded document object. Key order is preserved.
pub type Document = Map<String, Value>;

/// Abstract ordered key/value container.
///
/// JSON `null` is reported as absent by [`Container::get_value`], matching the
/// FHIR rule that `null` only appears as a placeholder inside aligned arrays.
pub trait Container {
    /// Returns the value stored under `key`, if any.
    fn get_value(&self, key: &str) -> Option<&Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_value(&mut self, key: &str, value: Value);

    /// Returns the value stored under `key` or fails with `MissingRequiredField`.
    fn require_value(&self, key: &str) -> Result<&Value> {
        self.get_value(key).ok_or_else(|| CodecError::missing(key))
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }
}

impl Container for Map<String, Value> {
    fn get_value(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|value| !value.is_null())
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.insert(key.to_string(), value);
    }
}

/// Returns the key of the metadata sibling for a primitive field (`_key`).
pub fn sibling_key(key: &str) -> String {
    format!("_{key}")
}

/// Reads `key` as a nested object.
pub fn object_at<'a, C>(container: &'a C, key: &str) -> Result<Option<&'a Document>>
where
    C: Container + ?Sized,
{
    match container.get_value(key) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(CodecError::type_mismatch(key, "object")),
    }
}

/// Reads `key` as an array.
pub fn array_at<'a, C>(container: &'a C, key: &str) -> Result<Option<&'a Vec<Value>>>
where
    C: Container + ?Sized,
{
    match container.get_value(key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(CodecError::type_mismatch(key, "array")),
    }
}

/// Reads `key` as a plain JSON string with no metadata sibling.
///
/// Used for element ids and `Extension.url`, which FHIR carries as bare
/// attributes rather than primitive elements.
pub fn string_at<C>(container: &C, key: &str) -> Result<Option<String>>
where
    C: Container + ?Sized,
{
    match container.get_value(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CodecError::type_mismatch(key, "string")),
    }
}

/// Unwraps an optional decoded field, failing with `MissingRequiredField`.
pub fn required<T>(value: Option<T>, key: &str) -> Result<T> {
    value.ok_or_else(|| CodecError::missing(key))
}
