use clinwire_serde_support::choice::ChoiceType;
use clinwire_serde_support::{
    Container, DecodeOptions, Document, ElementCodec, Result, decode_choice, decode_complex,
    decode_complex_list, encode_complex, encode_complex_list, encode_optional_choice,
    encode_optional_complex,
};

use super::{Extension, decode_element_header, encode_element_header};
use crate::primitives::*;

/// A reference to a code defined by a terminology system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Coding {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub system: Option<Primitive<Uri>>,
    pub version: Option<Primitive<FhirString>>,
    pub code: Option<Primitive<Code>>,
    pub display: Option<Primitive<FhirString>>,
    pub user_selected: Option<Primitive<Boolean>>,
}

impl Coding {
    /// A coding with `system` and `code` set. Returns `None` when `code` is
    /// not a valid code token.
    pub fn new(system: &str, code: &str) -> Option<Self> {
        Some(Self {
            system: Some(Primitive::new(Uri::parse(system)?)),
            code: Some(Primitive::new(Code::parse(code)?)),
            ..Self::default()
        })
    }

    pub fn with_display(mut self, display: impl Into<FhirString>) -> Self {
        self.display = Some(Primitive::new(display.into()));
        self
    }
}

impl ElementCodec for Coding {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            system: Primitive::decode(doc, "system", options)?,
            version: Primitive::decode(doc, "version", options)?,
            code: Primitive::decode(doc, "code", options)?,
            display: Primitive::decode(doc, "display", options)?,
            user_selected: Primitive::decode(doc, "userSelected", options)?,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        Primitive::encode_optional(self.system.as_ref(), "system", &mut doc);
        Primitive::encode_optional(self.version.as_ref(), "version", &mut doc);
        Primitive::encode_optional(self.code.as_ref(), "code", &mut doc);
        Primitive::encode_optional(self.display.as_ref(), "display", &mut doc);
        Primitive::encode_optional(self.user_selected.as_ref(), "userSelected", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.extension.is_empty()
            && self.system.is_none()
            && self.version.is_none()
            && self.code.is_none()
            && self.display.is_none()
            && self.user_selected.is_none()
    }
}

/// A concept given by zero or more codings and/or free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodeableConcept {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub coding: Vec<Coding>,
    pub text: Option<Primitive<FhirString>>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            ..Self::default()
        }
    }

    pub fn from_text(text: impl Into<FhirString>) -> Self {
        Self {
            text: Some(Primitive::new(text.into())),
            ..Self::default()
        }
    }
}

impl ElementCodec for CodeableConcept {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            coding: decode_complex_list(doc, "coding", options)?,
            text: Primitive::decode(doc, "text", options)?,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        encode_complex_list(&self.coding, "coding", &mut doc);
        Primitive::encode_optional(self.text.as_ref(), "text", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.extension.is_empty()
            && self.coding.is_empty()
            && self.text.is_none()
    }
}

/// A time range defined by a start and/or end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Period {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub start: Option<Primitive<DateTime>>,
    pub end: Option<Primitive<DateTime>>,
}

impl Period {
    pub fn new(start: Option<DateTime>, end: Option<DateTime>) -> Self {
        Self {
            start: start.map(Primitive::new),
            end: end.map(Primitive::new),
            ..Self::default()
        }
    }
}

impl ElementCodec for Period {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            start: Primitive::decode(doc, "start", options)?,
            end: Primitive::decode(doc, "end", options)?,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        Primitive::encode_optional(self.start.as_ref(), "start", &mut doc);
        Primitive::encode_optional(self.end.as_ref(), "end", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        self.id.is_none() && self.extension.is_empty() && self.start.is_none() && self.end.is_none()
    }
}

/// A business identifier for a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub r#use: Option<Primitive<Code>>,
    pub r#type: Option<CodeableConcept>,
    pub system: Option<Primitive<Uri>>,
    pub value: Option<Primitive<FhirString>>,
    pub period: Option<Period>,
    /// Boxed: a `Reference` may itself carry an `Identifier`.
    pub assigner: Option<Box<Reference>>,
}

impl Identifier {
    /// An identifier with `system` and `value` set. Returns `None` when
    /// `system` is not a valid uri.
    pub fn new(system: &str, value: impl Into<FhirString>) -> Option<Self> {
        Some(Self {
            system: Some(Primitive::new(Uri::parse(system)?)),
            value: Some(Primitive::new(value.into())),
            ..Self::default()
        })
    }
}

impl ElementCodec for Identifier {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            r#use: Primitive::decode(doc, "use", options)?,
            r#type: decode_complex(doc, "type", options)?,
            system: Primitive::decode(doc, "system", options)?,
            value: Primitive::decode(doc, "value", options)?,
            period: decode_complex(doc, "period", options)?,
            assigner: decode_complex::<Reference, _>(doc, "assigner", options)?.map(Box::new),
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        Primitive::encode_optional(self.r#use.as_ref(), "use", &mut doc);
        encode_optional_complex(self.r#type.as_ref(), "type", &mut doc);
        Primitive::encode_optional(self.system.as_ref(), "system", &mut doc);
        Primitive::encode_optional(self.value.as_ref(), "value", &mut doc);
        encode_optional_complex(self.period.as_ref(), "period", &mut doc);
        encode_optional_complex(self.assigner.as_deref(), "assigner", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.extension.is_empty()
            && self.r#use.is_none()
            && self.r#type.is_none()
            && self.system.is_none()
            && self.value.is_none()
            && self.period.is_none()
            && self.assigner.is_none()
    }
}

/// A reference from one resource to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Reference {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub reference: Option<Primitive<FhirString>>,
    pub identifier: Option<Identifier>,
    pub display: Option<Primitive<FhirString>>,
}

impl Reference {
    /// A literal reference such as `Patient/123` or `#contained-id`.
    pub fn to(reference: impl Into<FhirString>) -> Self {
        Self {
            reference: Some(Primitive::new(reference.into())),
            ..Self::default()
        }
    }

    pub fn with_display(mut self, display: impl Into<FhirString>) -> Self {
        self.display = Some(Primitive::new(display.into()));
        self
    }
}

impl ElementCodec for Reference {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            reference: Primitive::decode(doc, "reference", options)?,
            identifier: decode_complex(doc, "identifier", options)?,
            display: Primitive::decode(doc, "display", options)?,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        Primitive::encode_optional(self.reference.as_ref(), "reference", &mut doc);
        encode_optional_complex(self.identifier.as_ref(), "identifier", &mut doc);
        Primitive::encode_optional(self.display.as_ref(), "display", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.extension.is_empty()
            && self.reference.is_none()
            && self.identifier.is_none()
            && self.display.is_none()
    }
}

/// Content in a format defined elsewhere, inline (`data`) or by `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Attachment {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub content_type: Option<Primitive<Code>>,
    pub language: Option<Primitive<Code>>,
    pub data: Option<Primitive<Base64Binary>>,
    pub url: Option<Primitive<Uri>>,
    pub size: Option<Primitive<UnsignedInt>>,
    pub hash: Option<Primitive<Base64Binary>>,
    pub title: Option<Primitive<FhirString>>,
    pub creation: Option<Primitive<DateTime>>,
}

impl Attachment {
    /// Inline content of the given mime type. Returns `None` when
    /// `content_type` is not a valid code.
    pub fn inline(content_type: &str, data: impl Into<Base64Binary>) -> Option<Self> {
        Some(Self {
            content_type: Some(Primitive::new(Code::parse(content_type)?)),
            data: Some(Primitive::new(data.into())),
            ..Self::default()
        })
    }

    pub fn with_title(mut self, title: impl Into<FhirString>) -> Self {
        self.title = Some(Primitive::new(title.into()));
        self
    }
}

impl ElementCodec for Attachment {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            content_type: Primitive::decode(doc, "contentType", options)?,
            language: Primitive::decode(doc, "language", options)?,
            data: Primitive::decode(doc, "data", options)?,
            url: Primitive::decode(doc, "url", options)?,
            size: Primitive::decode(doc, "size", options)?,
            hash: Primitive::decode(doc, "hash", options)?,
            title: Primitive::decode(doc, "title", options)?,
            creation: Primitive::decode(doc, "creation", options)?,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        Primitive::encode_optional(self.content_type.as_ref(), "contentType", &mut doc);
        Primitive::encode_optional(self.language.as_ref(), "language", &mut doc);
        Primitive::encode_optional(self.data.as_ref(), "data", &mut doc);
        Primitive::encode_optional(self.url.as_ref(), "url", &mut doc);
        Primitive::encode_optional(self.size.as_ref(), "size", &mut doc);
        Primitive::encode_optional(self.hash.as_ref(), "hash", &mut doc);
        Primitive::encode_optional(self.title.as_ref(), "title", &mut doc);
        Primitive::encode_optional(self.creation.as_ref(), "creation", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.extension.is_empty()
            && self.content_type.is_none()
            && self.language.is_none()
            && self.data.is_none()
            && self.url.is_none()
            && self.size.is_none()
            && self.hash.is_none()
            && self.title.is_none()
            && self.creation.is_none()
    }
}

/// The `author[x]` of an [`Annotation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationAuthor {
    Reference(Reference),
    String(Primitive<FhirString>),
}

impl ChoiceType for AnnotationAuthor {
    const VARIANTS: &'static [&'static str] = &["Reference", "string"];

    fn decode_variant<C>(
        type_name: &str,
        container: &C,
        key: &str,
        options: &DecodeOptions,
    ) -> Result<Option<Self>>
    where
        C: Container + ?Sized,
    {
        Ok(match type_name {
            "Reference" => decode_complex(container, key, options)?.map(Self::Reference),
            "string" => Primitive::decode(container, key, options)?.map(Self::String),
            _ => None,
        })
    }

    fn type_name(&self) -> &str {
        match self {
            Self::Reference(_) => "Reference",
            Self::String(_) => "string",
        }
    }

    fn encode_variant<C>(&self, key: &str, container: &mut C)
    where
        C: Container + ?Sized,
    {
        match self {
            Self::Reference(reference) => encode_complex(reference, key, container),
            Self::String(name) => name.encode(key, container),
        }
    }

    fn has_content(&self) -> bool {
        match self {
            Self::Reference(reference) => !reference.is_empty(),
            Self::String(name) => !name.is_empty(),
        }
    }
}

/// A text note with optional author and time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub author: Option<AnnotationAuthor>,
    pub time: Option<Primitive<DateTime>>,
    pub text: Primitive<FhirString>,
}

impl Annotation {
    pub fn new(text: impl Into<FhirString>) -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            author: None,
            time: None,
            text: Primitive::new(text.into()),
        }
    }

    pub fn with_author(mut self, author: AnnotationAuthor) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(Primitive::new(time));
        self
    }
}

impl ElementCodec for Annotation {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        Ok(Self {
            id,
            extension,
            author: decode_choice(doc, "author", options)?,
            time: Primitive::decode(doc, "time", options)?,
            text: Primitive::decode_required(doc, "text", options)?,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        encode_optional_choice(self.author.as_ref(), "author", &mut doc);
        Primitive::encode_optional(self.time.as_ref(), "time", &mut doc);
        self.text.encode("text", &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        false
    }
}
