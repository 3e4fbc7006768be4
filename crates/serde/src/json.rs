//! JSON reading and writing.
//!
//! The generic functions are thin wrappers around `serde_json` and work for
//! any resource type through its `Serialize` / `Deserialize` impls. The
//! `_with` variants decode through an explicit [`DecodeContext`] so callers
//! can pick the registry and decode options.

use std::io;

use clinwire_fhir::{ContainedResource, DecodeContext, Document, FhirResource, decode_resource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SerdeError};

/// Deserialize a resource from a JSON string.
///
/// # Examples
///
/// ```
/// use clinwire_fhir::Binary;
/// use clinwire_serde::json::from_json_str;
///
/// let json = r#"{"resourceType": "Binary", "contentType": "text/plain", "content": "aGk="}"#;
/// let binary: Binary = from_json_str(json).unwrap();
/// assert_eq!(binary.content.value().map(|c| c.as_str()), Some("aGk="));
/// ```
pub fn from_json_str<'a, T>(s: &'a str) -> Result<T>
where
    T: Deserialize<'a>,
{
    Ok(serde_json::from_str(s)?)
}

/// Decode a concrete resource type from a JSON string using `cx`.
pub fn from_json_str_with<R: FhirResource>(s: &str, cx: &DecodeContext<'_>) -> Result<R> {
    let doc = parse_document(s)?;
    Ok(R::from_document_with(&doc, cx)?)
}

/// Decode a resource of whichever registered type its `resourceType` names.
///
/// ```
/// use clinwire_serde::json::resource_from_json_str;
///
/// let json = r#"{"resourceType": "Binary", "contentType": "text/plain", "content": "aGk="}"#;
/// let resource = resource_from_json_str(json).unwrap();
/// assert_eq!(resource.resource_type(), "Binary");
/// ```
pub fn resource_from_json_str(s: &str) -> Result<ContainedResource> {
    resource_from_json_str_with(s, &DecodeContext::default())
}

pub fn resource_from_json_str_with(s: &str, cx: &DecodeContext<'_>) -> Result<ContainedResource> {
    let doc = parse_document(s)?;
    Ok(decode_resource(&doc, cx)?)
}

/// Parse JSON text into a top-level document object.
pub fn parse_document(s: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(s)? {
        Value::Object(doc) => Ok(doc),
        other => Err(SerdeError::ExpectedObject {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serialize a resource to a JSON string.
pub fn to_json_string<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_string(value)?)
}

/// Serialize a resource to a pretty-printed JSON string.
pub fn to_json_string_pretty<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_string_pretty(value)?)
}

/// Serialize a resource to a `serde_json::Value`.
pub fn to_json_value<T>(value: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_value(value)?)
}

/// Serialize a resource into `writer`, compact or pretty-printed.
pub fn to_json_writer<W, T>(writer: W, value: &T, pretty: bool) -> Result<()>
where
    W: io::Write,
    T: Serialize + ?Sized,
{
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }
    Ok(())
}
