use clinwire_serde_support::{
    DecodeOptions, Document, ElementCodec, Result, decode_complex_list, encode_complex_list,
};

use super::{Coding, Extension, decode_element_header, encode_element_header};
use crate::primitives::*;

/// Resource metadata maintained by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Meta {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub version_id: Option<Primitive<Id>>,
    pub last_updated: Option<Primitive<Instant>>,
    pub profile: Vec<Primitive<Uri>>,
    pub security: Vec<Coding>,
    pub tag: Vec<Coding>,
}

impl ElementCodec for Meta {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            version_id: Primitive::decode(doc, "versionId", options)?,
            last_updated: Primitive::decode(doc, "lastUpdated", options)?,
            profile: Primitive::decode_list(doc, "profile", options)?,
            security: decode_complex_list(doc, "security", options)?,
            tag: decode_complex_list(doc, "tag", options)?,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        Primitive::encode_optional(self.version_id.as_ref(), "versionId", &mut doc);
        Primitive::encode_optional(self.last_updated.as_ref(), "lastUpdated", &mut doc);
        Primitive::encode_list(&self.profile, "profile", &mut doc);
        encode_complex_list(&self.security, "security", &mut doc);
        encode_complex_list(&self.tag, "tag", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.extension.is_empty()
            && self.version_id.is_none()
            && self.last_updated.is_none()
            && self.profile.is_empty()
            && self.security.is_empty()
            && self.tag.is_empty()
    }
}

/// Human-readable summary of a resource. Both `status` and `div` are required.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Narrative {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    /// `generated | extensions | additional | empty`
    pub status: Primitive<Code>,
    pub div: Primitive<Xhtml>,
}

impl Narrative {
    pub fn new(status: Code, div: Xhtml) -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            status: Primitive::new(status),
            div: Primitive::new(div),
        }
    }
}

impl ElementCodec for Narrative {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            status: Primitive::decode_required(doc, "status", options)?,
            div: Primitive::decode_required(doc, "div", options)?,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        self.status.encode("status", &mut doc);
        self.div.encode("div", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinwire_serde_support::CodecError;
    use serde_json::{Value, json};

    #[test]
    fn test_meta_profile_list_alignment() {
        let raw = json!({
            "versionId": "3",
            "lastUpdated": "2017-03-28T08:51:23.123+00:00",
            "profile": ["http://example.org/a", null],
            "_profile": [null, {"id": "p2"}],
            "tag": [{"system": "http://example.org/tags", "code": "demo"}]
        });
        let meta =
            Meta::decode_element(raw.as_object().unwrap(), &DecodeOptions::default()).unwrap();
        assert_eq!(meta.profile.len(), 2);
        assert_eq!(meta.profile[1].value, None);
        assert_eq!(meta.profile[1].id.as_deref(), Some("p2"));
        assert_eq!(Value::Object(meta.encode_element()), raw);
    }

    #[test]
    fn test_meta_rejects_partial_instant() {
        let raw = json!({"lastUpdated": "2017-03-28"});
        let err = Meta::decode_element(raw.as_object().unwrap(), &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err, CodecError::type_mismatch("lastUpdated", "instant"));
    }

    #[test]
    fn test_narrative_requires_div() {
        let raw = json!({"status": "generated"});
        let err = Narrative::decode_element(raw.as_object().unwrap(), &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err, CodecError::missing("div"));
    }
}
