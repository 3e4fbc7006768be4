//! Codec helpers for complex (object-valued) elements.

use serde_json::Value;

use crate::document::{Container, Document, array_at, object_at};
use crate::error::{CodecError, Result};
use crate::options::DecodeOptions;

/// A complex datatype carried as a nested object.
pub trait ElementCodec: Sized {
    /// Decodes the element from its own sub-document.
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self>;

    /// Encodes the element into a fresh sub-document.
    fn encode_element(&self) -> Document;

    /// True when the element carries no content at all.
    fn is_empty(&self) -> bool;
}

/// Decodes an optional complex field stored under `key`.
pub fn decode_complex<T, C>(container: &C, key: &str, options: &DecodeOptions) -> Result<Option<T>>
where
    T: ElementCodec,
    C: Container + ?Sized,
{
    match object_at(container, key)? {
        Some(doc) => T::decode_element(doc, options)
            .map(Some)
            .map_err(|err| err.within(key)),
        None => Ok(None),
    }
}

/// Decodes a required complex field stored under `key`.
pub fn decode_required_complex<T, C>(container: &C, key: &str, options: &DecodeOptions) -> Result<T>
where
    T: ElementCodec,
    C: Container + ?Sized,
{
    decode_complex(container, key, options)?.ok_or_else(|| CodecError::missing(key))
}

/// Decodes an ordered sequence of complex elements. Absent means empty.
pub fn decode_complex_list<T, C>(
    container: &C,
    key: &str,
    options: &DecodeOptions,
) -> Result<Vec<T>>
where
    T: ElementCodec,
    C: Container + ?Sized,
{
    let Some(items) = array_at(container, key)? else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = format!("{key}[{index}]");
            match item {
                Value::Object(doc) => {
                    T::decode_element(doc, options).map_err(|err| err.within(&path))
                }
                _ => Err(CodecError::type_mismatch(path, "object")),
            }
        })
        .collect()
}

/// Writes a complex field under `key`.
pub fn encode_complex<T, C>(value: &T, key: &str, container: &mut C)
where
    T: ElementCodec,
    C: Container + ?Sized,
{
    container.set_value(key, Value::Object(value.encode_element()));
}

/// Writes an optional complex field; nothing is written for `None`.
pub fn encode_optional_complex<T, C>(value: Option<&T>, key: &str, container: &mut C)
where
    T: ElementCodec,
    C: Container + ?Sized,
{
    if let Some(value) = value {
        encode_complex(value, key, container);
    }
}

/// Writes a sequence of complex elements; nothing is written when empty.
pub fn encode_complex_list<T, C>(values: &[T], key: &str, container: &mut C)
where
    T: ElementCodec,
    C: Container + ?Sized,
{
    if values.is_empty() {
        return;
    }
    let items = values
        .iter()
        .map(|value| Value::Object(value.encode_element()))
        .collect();
    container.set_value(key, Value::Array(items));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::string_at;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Label {
        text: Option<String>,
    }

    impl ElementCodec for Label {
        fn decode_element(doc: &Document, _options: &DecodeOptions) -> Result<Self> {
            Ok(Label {
                text: string_at(doc, "text")?,
            })
        }

        fn encode_element(&self) -> Document {
            let mut doc = Document::new();
            if let Some(text) = &self.text {
                doc.set_value("text", json!(text));
            }
            doc
        }

        fn is_empty(&self) -> bool {
            self.text.is_none()
        }
    }

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_decode_complex_nested_error_path() {
        let d = doc(json!({"label": {"text": 5}}));
        let err = decode_complex::<Label, _>(&d, "label", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("label.text", "string"));
    }

    #[test]
    fn test_required_complex_missing() {
        let d = doc(json!({}));
        let err =
            decode_required_complex::<Label, _>(&d, "label", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err, CodecError::missing("label"));
    }

    #[test]
    fn test_list_order_and_index_paths() {
        let d = doc(json!({"labels": [{"text": "b"}, {"text": "a"}]}));
        let labels =
            decode_complex_list::<Label, _>(&d, "labels", &DecodeOptions::default()).unwrap();
        assert_eq!(labels[0].text.as_deref(), Some("b"));
        assert_eq!(labels[1].text.as_deref(), Some("a"));

        let d = doc(json!({"labels": [{"text": "b"}, "a"]}));
        let err =
            decode_complex_list::<Label, _>(&d, "labels", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("labels[1]", "object"));
    }

    #[test]
    fn test_encode_list_skips_empty_sequence() {
        let mut d = Document::new();
        encode_complex_list::<Label, _>(&[], "labels", &mut d);
        assert!(d.is_empty());

        encode_complex_list(&[Label { text: Some("x".into()) }], "labels", &mut d);
        assert_eq!(Value::Object(d), json!({"labels": [{"text": "x"}]}));
    }
}
