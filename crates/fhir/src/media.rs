//! `Media`: a photo, video or audio recording acquired or used in healthcare.

use clinwire_serde_support::choice::ChoiceType;
use clinwire_serde_support::{
    Container, DecodeOptions, Document, ElementCodec, Result, decode_choice, decode_complex,
    decode_complex_list, decode_required_complex, encode_complex, encode_complex_list,
    encode_optional_choice, encode_optional_complex,
};
use tracing::trace;

use crate::datatypes::{Annotation, Attachment, CodeableConcept, Identifier, Period, Reference};
use crate::primitives::*;
use crate::registry::{ContainedResource, DecodeContext};
use crate::resource::{DomainResourceBase, FhirResource, ResourceBase};
use crate::structural::structural_resource;

/// The `occurrence[x]` of a [`Media`]: when it was taken.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaOccurrence {
    DateTime(Primitive<DateTime>),
    Period(Period),
}

impl ChoiceType for MediaOccurrence {
    const VARIANTS: &'static [&'static str] = &["dateTime", "Period"];

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
            "dateTime" => Primitive::decode(container, key, options)?.map(Self::DateTime),
            "Period" => decode_complex(container, key, options)?.map(Self::Period),
            _ => None,
        })
    }

    fn type_name(&self) -> &str {
        match self {
            Self::DateTime(_) => "dateTime",
            Self::Period(_) => "Period",
        }
    }

    fn encode_variant<C>(&self, key: &str, container: &mut C)
    where
        C: Container + ?Sized,
    {
        match self {
            Self::DateTime(value) => value.encode(key, container),
            Self::Period(period) => encode_complex(period, key, container),
        }
    }

    fn has_content(&self) -> bool {
        match self {
            Self::DateTime(value) => !value.is_empty(),
            Self::Period(period) => !period.is_empty(),
        }
    }
}

impl From<DateTime> for MediaOccurrence {
    fn from(value: DateTime) -> Self {
        MediaOccurrence::DateTime(Primitive::new(value))
    }
}

impl From<Period> for MediaOccurrence {
    fn from(period: Period) -> Self {
        MediaOccurrence::Period(period)
    }
}

#[derive(Debug, Clone)]
pub struct Media {
    pub domain: DomainResourceBase,
    pub identifier: Vec<Identifier>,
    /// Procedure that caused this media to be created.
    pub based_on: Vec<Reference>,
    /// Whether the media is a photo, video or audio recording.
    pub r#type: CodeableConcept,
    pub subtype: Option<CodeableConcept>,
    pub view: Option<CodeableConcept>,
    pub subject: Option<Reference>,
    pub context: Option<Reference>,
    pub occurrence: Option<MediaOccurrence>,
    pub operator: Option<Reference>,
    pub reason_code: Vec<CodeableConcept>,
    pub body_site: Option<CodeableConcept>,
    pub device: Option<Reference>,
    pub height: Option<Primitive<PositiveInt>>,
    pub width: Option<Primitive<PositiveInt>>,
    pub frames: Option<Primitive<PositiveInt>>,
    pub duration: Option<Primitive<UnsignedInt>>,
    /// The actual content, inline or by reference.
    pub content: Attachment,
    pub note: Vec<Annotation>,
}

structural_resource!(Media {
    base: domain: DomainResourceBase,
    fields: [
        identifier, based_on, r#type, subtype, view, subject, context, occurrence, operator,
        reason_code, body_site, device, height, width, frames, duration, content, note,
    ]
});

impl Media {
    pub fn new(r#type: CodeableConcept, content: Attachment) -> Self {
        Self {
            domain: DomainResourceBase::default(),
            identifier: Vec::new(),
            based_on: Vec::new(),
            r#type,
            subtype: None,
            view: None,
            subject: None,
            context: None,
            occurrence: None,
            operator: None,
            reason_code: Vec::new(),
            body_site: None,
            device: None,
            height: None,
            width: None,
            frames: None,
            duration: None,
            content,
            note: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.domain.resource.id = Some(Primitive::new(id));
        self
    }

    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier.push(identifier);
        self
    }

    pub fn with_based_on(mut self, reference: Reference) -> Self {
        self.based_on.push(reference);
        self
    }

    pub fn with_subtype(mut self, subtype: CodeableConcept) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn with_view(mut self, view: CodeableConcept) -> Self {
        self.view = Some(view);
        self
    }

    pub fn with_subject(mut self, subject: Reference) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_context(mut self, context: Reference) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_occurrence(mut self, occurrence: impl Into<MediaOccurrence>) -> Self {
        self.occurrence = Some(occurrence.into());
        self
    }

    pub fn with_operator(mut self, operator: Reference) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_reason_code(mut self, reason: CodeableConcept) -> Self {
        self.reason_code.push(reason);
        self
    }

    pub fn with_body_site(mut self, body_site: CodeableConcept) -> Self {
        self.body_site = Some(body_site);
        self
    }

    pub fn with_device(mut self, device: Reference) -> Self {
        self.device = Some(device);
        self
    }

    /// Sets `height` and `width` in pixels.
    pub fn with_dimensions(mut self, height: PositiveInt, width: PositiveInt) -> Self {
        self.height = Some(Primitive::new(height));
        self.width = Some(Primitive::new(width));
        self
    }

    pub fn with_frames(mut self, frames: PositiveInt) -> Self {
        self.frames = Some(Primitive::new(frames));
        self
    }

    /// Sets the recording length in seconds.
    pub fn with_duration(mut self, seconds: UnsignedInt) -> Self {
        self.duration = Some(Primitive::new(seconds));
        self
    }

    pub fn with_note(mut self, note: Annotation) -> Self {
        self.note.push(note);
        self
    }

    pub fn with_contained(mut self, resource: impl Into<ContainedResource>) -> Self {
        self.domain.contained.push(resource.into());
        self
    }
}

impl FhirResource for Media {
    const RESOURCE_TYPE: &'static str = "Media";

    fn decode_document(doc: &Document, cx: &DecodeContext<'_>) -> Result<Self> {
        trace!("decoding Media");
        let options = cx.options();
        Ok(Self {
            domain: DomainResourceBase::decode(doc, cx)?,
            identifier: decode_complex_list(doc, "identifier", options)?,
            based_on: decode_complex_list(doc, "basedOn", options)?,
            r#type: decode_required_complex(doc, "type", options)?,
            subtype: decode_complex(doc, "subtype", options)?,
            view: decode_complex(doc, "view", options)?,
            subject: decode_complex(doc, "subject", options)?,
            context: decode_complex(doc, "context", options)?,
            occurrence: decode_choice(doc, "occurrence", options)?,
            operator: decode_complex(doc, "operator", options)?,
            reason_code: decode_complex_list(doc, "reasonCode", options)?,
            body_site: decode_complex(doc, "bodySite", options)?,
            device: decode_complex(doc, "device", options)?,
            height: Primitive::decode(doc, "height", options)?,
            width: Primitive::decode(doc, "width", options)?,
            frames: Primitive::decode(doc, "frames", options)?,
            duration: Primitive::decode(doc, "duration", options)?,
            content: decode_required_complex(doc, "content", options)?,
            note: decode_complex_list(doc, "note", options)?,
        })
    }

    fn encode_document(&self, doc: &mut Document) {
        self.domain.encode(doc);
        encode_complex_list(&self.identifier, "identifier", doc);
        encode_complex_list(&self.based_on, "basedOn", doc);
        encode_complex(&self.r#type, "type", doc);
        encode_optional_complex(self.subtype.as_ref(), "subtype", doc);
        encode_optional_complex(self.view.as_ref(), "view", doc);
        encode_optional_complex(self.subject.as_ref(), "subject", doc);
        encode_optional_complex(self.context.as_ref(), "context", doc);
        encode_optional_choice(self.occurrence.as_ref(), "occurrence", doc);
        encode_optional_complex(self.operator.as_ref(), "operator", doc);
        encode_complex_list(&self.reason_code, "reasonCode", doc);
        encode_optional_complex(self.body_site.as_ref(), "bodySite", doc);
        encode_optional_complex(self.device.as_ref(), "device", doc);
        Primitive::encode_optional(self.height.as_ref(), "height", doc);
        Primitive::encode_optional(self.width.as_ref(), "width", doc);
        Primitive::encode_optional(self.frames.as_ref(), "frames", doc);
        Primitive::encode_optional(self.duration.as_ref(), "duration", doc);
        encode_complex(&self.content, "content", doc);
        encode_complex_list(&self.note, "note", doc);
    }

    fn resource_base(&self) -> &ResourceBase {
        &self.domain.resource
    }

    fn contained(&self) -> &[ContainedResource] {
        &self.domain.contained
    }
}
