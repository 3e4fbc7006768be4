//! The resource envelope shared by every resource type.
//!
//! [`ResourceBase`] carries the `Resource` fields (`id`, `meta`,
//! `implicitRules`, `language`). [`DomainResourceBase`] layers narrative
//! text, contained resources and extensions on top of it.

use std::fmt;
use std::hash::Hash;

use clinwire_serde_support::document::{array_at, string_at};
use clinwire_serde_support::{
    CodecError, Container, Document, Result, decode_complex, decode_complex_list,
    encode_complex_list, encode_optional_complex,
};
use serde_json::Value;

use crate::datatypes::{Extension, Meta, Narrative};
use crate::primitives::*;
use crate::registry::{ContainedResource, DecodeContext};

const RESOURCE_TYPE_KEY: &str = "resourceType";

/// Fields every resource carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceBase {
    pub id: Option<Primitive<Id>>,
    pub meta: Option<Meta>,
    pub implicit_rules: Option<Primitive<Uri>>,
    pub language: Option<Primitive<Code>>,
}

impl ResourceBase {
    pub fn decode(doc: &Document, cx: &DecodeContext<'_>) -> Result<Self> {
        let options = cx.options();
        Ok(Self {
            id: Primitive::decode(doc, "id", options)?,
            meta: decode_complex(doc, "meta", options)?,
            implicit_rules: Primitive::decode(doc, "implicitRules", options)?,
            language: Primitive::decode(doc, "language", options)?,
        })
    }

    pub fn encode(&self, doc: &mut Document) {
        Primitive::encode_optional(self.id.as_ref(), "id", doc);
        encode_optional_complex(self.meta.as_ref(), "meta", doc);
        Primitive::encode_optional(self.implicit_rules.as_ref(), "implicitRules", doc);
        Primitive::encode_optional(self.language.as_ref(), "language", doc);
    }

    /// The logical id, if it carries a value.
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|id| id.value()).map(Id::as_str)
    }
}

/// Fields of resources that can carry narrative, contained resources and
/// extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainResourceBase {
    pub resource: ResourceBase,
    pub text: Option<Narrative>,
    /// Inline resources of any registered type, in document order.
    pub contained: Vec<ContainedResource>,
    pub extension: Vec<Extension>,
    pub modifier_extension: Vec<Extension>,
}

impl DomainResourceBase {
    pub fn decode(doc: &Document, cx: &DecodeContext<'_>) -> Result<Self> {
        let options = cx.options();
        Ok(Self {
            resource: ResourceBase::decode(doc, cx)?,
            text: decode_complex(doc, "text", options)?,
            contained: decode_contained(doc, cx)?,
            extension: decode_complex_list(doc, "extension", options)?,
            modifier_extension: decode_complex_list(doc, "modifierExtension", options)?,
        })
    }

    pub fn encode(&self, doc: &mut Document) {
        self.resource.encode(doc);
        encode_optional_complex(self.text.as_ref(), "text", doc);
        if !self.contained.is_empty() {
            let items = self
                .contained
                .iter()
                .map(|resource| Value::Object(resource.to_document()))
                .collect();
            doc.set_value("contained", Value::Array(items));
        }
        encode_complex_list(&self.extension, "extension", doc);
        encode_complex_list(&self.modifier_extension, "modifierExtension", doc);
    }
}

fn decode_contained(doc: &Document, cx: &DecodeContext<'_>) -> Result<Vec<ContainedResource>> {
    let Some(items) = array_at(doc, "contained")? else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = format!("contained[{index}]");
            match item {
                Value::Object(inner) => cx
                    .registry()
                    .decode_any(inner, cx)
                    .map_err(|err| err.within(&path)),
                _ => Err(CodecError::type_mismatch(path, "object")),
            }
        })
        .collect()
}

/// Reads the `resourceType` discriminator of a document.
pub fn resource_type_of(doc: &Document) -> Result<String> {
    string_at(doc, RESOURCE_TYPE_KEY)?.ok_or_else(|| CodecError::missing(RESOURCE_TYPE_KEY))
}

/// A concrete resource type.
///
/// Implementors provide the field-level codec; the provided methods add the
/// `resourceType` discriminator handling.
pub trait FhirResource: Clone + fmt::Debug + PartialEq + Eq + Hash + Send + Sync + 'static {
    /// Discriminator written as `resourceType`.
    const RESOURCE_TYPE: &'static str;

    /// Decodes the resource fields. `resourceType` has already been checked.
    fn decode_document(doc: &Document, cx: &DecodeContext<'_>) -> Result<Self>;

    /// Writes every field except `resourceType`.
    fn encode_document(&self, doc: &mut Document);

    fn resource_base(&self) -> &ResourceBase;

    /// Contained resources; empty for types without a `DomainResource` layer.
    fn contained(&self) -> &[ContainedResource] {
        &[]
    }

    fn id(&self) -> Option<&str> {
        self.resource_base().id()
    }

    /// Decodes with the process-wide registry and default options.
    fn from_document(doc: &Document) -> Result<Self> {
        Self::from_document_with(doc, &DecodeContext::default())
    }

    /// Decodes into this concrete type.
    ///
    /// `resourceType` may be omitted; when present it must name this type.
    fn from_document_with(doc: &Document, cx: &DecodeContext<'_>) -> Result<Self> {
        if let Some(tag) = string_at(doc, RESOURCE_TYPE_KEY)?
            && tag != Self::RESOURCE_TYPE
        {
            return Err(CodecError::type_mismatch(RESOURCE_TYPE_KEY, Self::RESOURCE_TYPE));
        }
        Self::decode_document(doc, cx)
    }

    /// Encodes the resource with `resourceType` as the first key.
    fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.set_value(RESOURCE_TYPE_KEY, Value::String(Self::RESOURCE_TYPE.to_string()));
        self.encode_document(&mut doc);
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_base_round_trip() {
        let raw = json!({
            "id": "example",
            "_id": {"extension": [{"url": "http://example.org/origin", "valueString": "import"}]},
            "meta": {"versionId": "1"},
            "implicitRules": "http://example.org/rules",
            "language": "en-AU"
        });
        let doc = raw.as_object().unwrap();
        let base = ResourceBase::decode(doc, &DecodeContext::default()).unwrap();
        assert_eq!(base.id(), Some("example"));
        assert_eq!(base.id.as_ref().unwrap().extension.len(), 1);

        let mut out = Document::new();
        base.encode(&mut out);
        assert_eq!(Value::Object(out), raw);
    }

    #[test]
    fn test_resource_type_of() {
        let doc = json!({"resourceType": "Media"});
        assert_eq!(resource_type_of(doc.as_object().unwrap()).unwrap(), "Media");

        let doc = json!({"id": "x"});
        assert_eq!(
            resource_type_of(doc.as_object().unwrap()).unwrap_err(),
            CodecError::missing("resourceType")
        );

        let doc = json!({"resourceType": 7});
        assert_eq!(
            resource_type_of(doc.as_object().unwrap()).unwrap_err(),
            CodecError::type_mismatch("resourceType", "string")
        );
    }

    #[test]
    fn test_contained_must_be_objects() {
        let doc = json!({"contained": [
            {"resourceType": "Binary", "contentType": "text/plain", "content": "aGk="},
            3
        ]});
        let err = DomainResourceBase::decode(doc.as_object().unwrap(), &DecodeContext::default())
            .unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("contained[1]", "object"));
    }
}
