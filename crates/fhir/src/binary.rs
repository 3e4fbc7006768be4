//! `Binary`: raw content in its native format.
//!
//! `Binary` sits directly on the resource layer: it has no narrative, no
//! contained resources and no extensions of its own.

use clinwire_serde_support::{Document, Result, decode_complex, encode_optional_complex};

use crate::datatypes::Reference;
use crate::primitives::*;
use crate::registry::DecodeContext;
use crate::resource::{FhirResource, ResourceBase};
use crate::structural::structural_resource;

#[derive(Debug, Clone)]
pub struct Binary {
    pub resource: ResourceBase,
    /// MimeType of the content.
    pub content_type: Primitive<Code>,
    /// Reference to a resource whose access rules apply to this content.
    pub security_context: Option<Reference>,
    pub content: Primitive<Base64Binary>,
}

structural_resource!(Binary {
    base: resource: ResourceBase,
    fields: [content_type, security_context, content]
});

impl Binary {
    /// Returns `None` when `content_type` is not a valid code.
    pub fn new(content_type: &str, content: impl Into<Base64Binary>) -> Option<Self> {
        Some(Self {
            resource: ResourceBase::default(),
            content_type: Primitive::new(Code::parse(content_type)?),
            security_context: None,
            content: Primitive::new(content.into()),
        })
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.resource.id = Some(Primitive::new(id));
        self
    }

    pub fn with_security_context(mut self, reference: Reference) -> Self {
        self.security_context = Some(reference);
        self
    }
}

impl FhirResource for Binary {
    const RESOURCE_TYPE: &'static str = "Binary";

    fn decode_document(doc: &Document, cx: &DecodeContext<'_>) -> Result<Self> {
        let options = cx.options();
        Ok(Self {
            resource: ResourceBase::decode(doc, cx)?,
            content_type: Primitive::decode_required(doc, "contentType", options)?,
            security_context: decode_complex(doc, "securityContext", options)?,
            content: Primitive::decode_required(doc, "content", options)?,
        })
    }

    fn encode_document(&self, doc: &mut Document) {
        self.resource.encode(doc);
        self.content_type.encode("contentType", doc);
        encode_optional_complex(self.security_context.as_ref(), "securityContext", doc);
        self.content.encode("content", doc);
    }

    fn resource_base(&self) -> &ResourceBase {
        &self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinwire_serde_support::CodecError;
    use serde_json::{Value, json};

    #[test]
    fn test_binary_round_trip() {
        let raw = json!({
            "resourceType": "Binary",
            "id": "bin1",
            "contentType": "application/pdf",
            "securityContext": {"reference": "DocumentReference/example"},
            "content": "JVBERi0xLjQK"
        });
        let binary = Binary::from_document(raw.as_object().unwrap()).unwrap();
        assert_eq!(binary.id(), Some("bin1"));
        assert_eq!(Value::Object(binary.to_document()), raw);
    }

    #[test]
    fn test_binary_requires_content() {
        let raw = json!({"resourceType": "Binary", "contentType": "text/plain"});
        let err = Binary::from_document(raw.as_object().unwrap()).unwrap_err();
        assert_eq!(err, CodecError::missing("content"));
    }

    #[test]
    fn test_wrong_resource_type() {
        let raw = json!({"resourceType": "Media", "contentType": "text/plain", "content": "aGk="});
        let err = Binary::from_document(raw.as_object().unwrap()).unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("resourceType", "Binary"));
    }
}
