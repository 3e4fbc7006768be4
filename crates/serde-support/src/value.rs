//! The primitive/extension pairing.
//!
//! A primitive field `f` is carried as two sibling keys: `f` holds the bare
//! scalar and `_f` holds an object with the element `id` and `extension`
//! list. Either may be absent. Repeating primitives use two aligned arrays
//! with `null` placeholders:
//!
//! ```json
//! { "given": ["Alice", null], "_given": [null, {"id": "g1"}] }
//! ```

use serde_json::{Map, Value};

use crate::document::{Container, Document, sibling_key};
use crate::element::ElementCodec;
use crate::error::{CodecError, Result};
use crate::options::DecodeOptions;
use crate::primitive::PrimitiveType;

/// A primitive value paired with its element metadata.
///
/// A fully empty instance is equivalent to the field being absent: the
/// decoder never produces one and the encoder writes nothing for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimitiveValue<T, E> {
    pub value: Option<T>,
    pub id: Option<String>,
    pub extension: Vec<E>,
}

impl<T, E> From<T> for PrimitiveValue<T, E> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T, E> PrimitiveValue<T, E> {
    pub fn new(value: T) -> Self {
        Self {
            value: Some(value),
            id: None,
            extension: Vec::new(),
        }
    }

    /// A primitive carrying only an extension, typically a data-absent
    /// reason. Add an element id with [`PrimitiveValue::with_id`].
    pub fn valueless(extension: E) -> Self {
        Self {
            value: None,
            id: None,
            extension: vec![extension],
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_extension(mut self, extension: E) -> Self {
        self.extension.push(extension);
        self
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && !self.has_metadata()
    }

    pub fn has_metadata(&self) -> bool {
        self.id.is_some() || !self.extension.is_empty()
    }
}

impl<T, E> PrimitiveValue<T, E>
where
    T: PrimitiveType,
    E: ElementCodec,
{
    /// Decodes the pair stored under `key` and `_key`.
    ///
    /// Returns `None` when both keys are absent or the pair carries nothing.
    pub fn decode<C>(container: &C, key: &str, options: &DecodeOptions) -> Result<Option<Self>>
    where
        C: Container + ?Sized,
    {
        let meta_key = sibling_key(key);
        Self::decode_parts(
            container.get_value(key),
            container.get_value(&meta_key),
            key,
            &meta_key,
            options,
        )
    }

    /// Like [`PrimitiveValue::decode`], failing with `MissingRequiredField`
    /// when neither key is present.
    pub fn decode_required<C>(container: &C, key: &str, options: &DecodeOptions) -> Result<Self>
    where
        C: Container + ?Sized,
    {
        Self::decode(container, key, options)?.ok_or_else(|| CodecError::missing(key))
    }

    /// Decodes a repeating primitive from the aligned `key` / `_key` arrays.
    pub fn decode_list<C>(container: &C, key: &str, options: &DecodeOptions) -> Result<Vec<Self>>
    where
        C: Container + ?Sized,
    {
        let meta_key = sibling_key(key);
        let values = list_at(container, key)?;
        let metas = list_at(container, &meta_key)?;
        let len = values.len().max(metas.len());

        let mut decoded = Vec::with_capacity(len);
        for index in 0..len {
            let raw = values.get(index).filter(|v| !v.is_null());
            let meta = metas.get(index).filter(|v| !v.is_null());
            let item = Self::decode_parts(
                raw,
                meta,
                &format!("{key}[{index}]"),
                &format!("{meta_key}[{index}]"),
                options,
            )?;
            if let Some(item) = item {
                decoded.push(item);
            }
        }
        Ok(decoded)
    }

    fn decode_parts(
        raw: Option<&Value>,
        meta: Option<&Value>,
        key: &str,
        meta_key: &str,
        options: &DecodeOptions,
    ) -> Result<Option<Self>> {
        let value = match raw {
            Some(raw) => Some(
                T::from_json(raw).ok_or_else(|| CodecError::type_mismatch(key, T::KIND))?,
            ),
            None => None,
        };

        let (id, extension) = match meta {
            Some(Value::Object(meta)) => {
                decode_metadata(meta, options).map_err(|e| e.within(meta_key))?
            }
            Some(_) => return Err(CodecError::type_mismatch(meta_key, "element")),
            None => (None, Vec::new()),
        };

        let decoded = Self {
            value,
            id,
            extension,
        };
        Ok((!decoded.is_empty()).then_some(decoded))
    }

    /// Writes `key` if a value is set and `_key` if there is metadata.
    pub fn encode<C>(&self, key: &str, container: &mut C)
    where
        C: Container + ?Sized,
    {
        if let Some(value) = &self.value {
            container.set_value(key, value.to_json());
        }
        if self.has_metadata() {
            container.set_value(&sibling_key(key), Value::Object(self.encode_metadata()));
        }
    }

    /// Writes an optional primitive; nothing is written for `None`.
    pub fn encode_optional<C>(value: Option<&Self>, key: &str, container: &mut C)
    where
        C: Container + ?Sized,
    {
        if let Some(value) = value {
            value.encode(key, container);
        }
    }

    /// Writes a repeating primitive as aligned `key` / `_key` arrays.
    ///
    /// Empty items are skipped. Each array is only written when at least one
    /// item contributes to it.
    pub fn encode_list<C>(values: &[Self], key: &str, container: &mut C)
    where
        C: Container + ?Sized,
    {
        let items: Vec<&Self> = values.iter().filter(|v| !v.is_empty()).collect();
        if items.is_empty() {
            return;
        }

        if items.iter().any(|item| item.value.is_some()) {
            let raw = items
                .iter()
                .map(|item| item.value.as_ref().map_or(Value::Null, T::to_json))
                .collect();
            container.set_value(key, Value::Array(raw));
        }

        if items.iter().any(|item| item.has_metadata()) {
            let metas = items
                .iter()
                .map(|item| {
                    if item.has_metadata() {
                        Value::Object(item.encode_metadata())
                    } else {
                        Value::Null
                    }
                })
                .collect();
            container.set_value(&sibling_key(key), Value::Array(metas));
        }
    }

    fn encode_metadata(&self) -> Document {
        let mut meta = Map::new();
        if let Some(id) = &self.id {
            meta.set_value("id", Value::String(id.clone()));
        }
        if !self.extension.is_empty() {
            let extensions = self
                .extension
                .iter()
                .map(|ext| Value::Object(ext.encode_element()))
                .collect();
            meta.set_value("extension", Value::Array(extensions));
        }
        meta
    }
}

fn list_at<'a, C>(container: &'a C, key: &str) -> Result<&'a [Value]>
where
    C: Container + ?Sized,
{
    match container.get_value(key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(CodecError::type_mismatch(key, "array")),
    }
}

fn decode_metadata<E>(meta: &Document, options: &DecodeOptions) -> Result<(Option<String>, Vec<E>)>
where
    E: ElementCodec,
{
    let id = crate::document::string_at(meta, "id")?;
    let extension = crate::element::decode_complex_list(meta, "extension", options)?;
    Ok((id, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::string_at;
    use crate::primitive::{DateTime, FhirString, PositiveInt};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Ext {
        url: String,
    }

    impl ElementCodec for Ext {
        fn decode_element(doc: &Document, _options: &DecodeOptions) -> Result<Self> {
            Ok(Ext {
                url: crate::document::required(string_at(doc, "url")?, "url")?,
            })
        }

        fn encode_element(&self) -> Document {
            let mut doc = Document::new();
            doc.set_value("url", json!(self.url));
            doc
        }

        fn is_empty(&self) -> bool {
            false
        }
    }

    type Prim<T> = PrimitiveValue<T, Ext>;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn opts() -> DecodeOptions {
        DecodeOptions::default()
    }

    #[test]
    fn test_absent_pair_is_none() {
        let d = doc(json!({"other": 1}));
        assert_eq!(Prim::<FhirString>::decode(&d, "f", &opts()).unwrap(), None);
    }

    #[test]
    fn test_value_and_metadata() {
        let d = doc(json!({
            "f": "2020-01-01",
            "_f": {"id": "a1", "extension": [{"url": "http://example.org/x"}]}
        }));
        let p = Prim::<DateTime>::decode(&d, "f", &opts()).unwrap().unwrap();
        assert_eq!(p.value.as_ref().map(DateTime::as_str), Some("2020-01-01"));
        assert_eq!(p.id.as_deref(), Some("a1"));
        assert_eq!(p.extension[0].url, "http://example.org/x");
    }

    #[test]
    fn test_valueless_primitive_keeps_metadata() {
        let absent = Ext {
            url: "http://example.org/absent".to_string(),
        };
        let p = Prim::<FhirString>::valueless(absent).with_id("x1");
        let mut d = Document::new();
        p.encode("f", &mut d);
        assert_eq!(
            Value::Object(d.clone()),
            json!({"_f": {"id": "x1", "extension": [{"url": "http://example.org/absent"}]}})
        );

        let back = Prim::<FhirString>::decode(&d, "f", &opts()).unwrap().unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_empty_sibling_is_absent() {
        let d = doc(json!({"_f": {}}));
        assert_eq!(Prim::<FhirString>::decode(&d, "f", &opts()).unwrap(), None);
        let d = doc(json!({"f": null}));
        assert_eq!(Prim::<FhirString>::decode(&d, "f", &opts()).unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_names_key_and_kind() {
        let d = doc(json!({"height": "tall"}));
        let err = Prim::<PositiveInt>::decode(&d, "height", &opts()).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("height", "positiveInt"));

        let d = doc(json!({"_height": 4}));
        let err = Prim::<PositiveInt>::decode(&d, "height", &opts()).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("_height", "element"));

        let d = doc(json!({"_height": {"id": 4}}));
        let err = Prim::<PositiveInt>::decode(&d, "height", &opts()).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("_height.id", "string"));
    }

    #[test]
    fn test_required_missing() {
        let d = doc(json!({}));
        let err = Prim::<FhirString>::decode_required(&d, "text", &opts()).unwrap_err();
        assert_eq!(err, CodecError::missing("text"));
    }

    #[test]
    fn test_encode_empty_writes_nothing() {
        let mut d = Document::new();
        let empty = Prim::<FhirString> {
            value: None,
            id: None,
            extension: Vec::new(),
        };
        empty.encode("f", &mut d);
        assert!(d.is_empty());
    }

    #[test]
    fn test_list_alignment() {
        let d = doc(json!({
            "given": ["Alice", null, "Carol"],
            "_given": [null, {"id": "g1"}]
        }));
        let items = Prim::<FhirString>::decode_list(&d, "given", &opts()).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].value, None);
        assert_eq!(items[1].id.as_deref(), Some("g1"));
        assert_eq!(items[2].value.as_ref().map(FhirString::as_str), Some("Carol"));

        let mut out = Document::new();
        Prim::encode_list(&items, "given", &mut out);
        assert_eq!(
            Value::Object(out),
            json!({
                "given": ["Alice", null, "Carol"],
                "_given": [null, {"id": "g1"}, null]
            })
        );
    }

    #[test]
    fn test_list_without_metadata_omits_sibling() {
        let items = vec![
            Prim::new(FhirString::from("a")),
            Prim::new(FhirString::from("b")),
        ];
        let mut out = Document::new();
        Prim::encode_list(&items, "line", &mut out);
        assert_eq!(Value::Object(out), json!({"line": ["a", "b"]}));
    }

    #[test]
    fn test_list_element_error_path() {
        let d = doc(json!({"profile": ["ok", 3]}));
        let err = Prim::<FhirString>::decode_list(&d, "profile", &opts()).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("profile[1]", "string"));
    }
}
