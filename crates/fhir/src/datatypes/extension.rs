//! `Extension`, the open escape hatch carried by every element.
//!
//! Extensions are forward compatible: a `value[x]` of a type this model does
//! not declare is kept verbatim as [`PreservedValue`] and written back
//! unchanged.

use std::hash::{Hash, Hasher};

use clinwire_serde_support::choice::ChoiceType;
use clinwire_serde_support::document::string_at;
use clinwire_serde_support::hash::hash_json;
use clinwire_serde_support::{
    CodecError, Container, DecodeOptions, Document, ElementCodec, Result, choice_key,
    decode_choice, decode_complex, encode_complex, encode_optional_choice, required,
    sibling_key,
};
use serde_json::Value;

use super::{
    Annotation, Attachment, CodeableConcept, Coding, Identifier, Period, Reference,
    decode_element_header, encode_element_header,
};
use crate::primitives::*;

const VALUE_FIELD: &str = "value";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    /// Identifies the meaning of the extension.
    pub url: String,
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            url: url.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: ExtensionValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Adds a nested extension (complex extensions carry their parts this way).
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }
}

impl ElementCodec for Extension {
    fn decode_element(doc: &Document, options: &DecodeOptions) -> Result<Self> {
        let (id, extension) = decode_element_header(doc, options)?;
        let url = required(string_at(doc, "url")?, "url")?;

        let declared: Option<ExtensionValue> = decode_choice(doc, VALUE_FIELD, options)?;
        let mut preserved = PreservedValue::scan(doc);

        let value = match (declared, preserved.len()) {
            (declared, 0) => declared,
            (None, 1) => preserved.pop().map(ExtensionValue::Other),
            (declared, _) => {
                let keys = declared
                    .iter()
                    .map(|v| choice_key(VALUE_FIELD, v.type_name()))
                    .chain(preserved.into_iter().map(|p| p.key))
                    .collect();
                return Err(CodecError::DuplicateChoiceValue {
                    field: VALUE_FIELD.to_string(),
                    keys,
                });
            }
        };

        Ok(Self {
            id,
            extension,
            url,
            value,
        })
    }

    fn encode_element(&self) -> Document {
        let mut doc = Document::new();
        encode_element_header(self.id.as_ref(), &self.extension, &mut doc);
        doc.set_value("url", Value::String(self.url.clone()));
        encode_optional_choice(self.value.as_ref(), VALUE_FIELD, &mut doc);
        doc
    }

    fn is_empty(&self) -> bool {
        false
    }
}

/// A `value[x]` payload of a type not declared by [`ExtensionValue`].
///
/// Both the raw key and its `_` sibling are kept as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservedValue {
    /// Wire key, e.g. `valueHumanName`.
    pub key: String,
    pub value: Option<Value>,
    pub element: Option<Value>,
}

impl PreservedValue {
    /// Collects every `value*` key of `doc` that no declared variant claims.
    fn scan(doc: &Document) -> Vec<PreservedValue> {
        let declared: Vec<String> = ExtensionValue::VARIANTS
            .iter()
            .map(|type_name| choice_key(VALUE_FIELD, type_name))
            .collect();

        let mut found: Vec<PreservedValue> = Vec::new();
        for key in doc.keys() {
            let base = key.strip_prefix('_').unwrap_or(key);
            let is_value_key = base
                .strip_prefix(VALUE_FIELD)
                .and_then(|rest| rest.chars().next())
                .is_some_and(|c| c.is_ascii_uppercase());
            if !is_value_key
                || declared.iter().any(|d| d == base)
                || found.iter().any(|p| p.key == base)
            {
                continue;
            }
            let value = doc.get_value(base).cloned();
            let element = doc.get_value(&sibling_key(base)).cloned();
            if value.is_some() || element.is_some() {
                found.push(PreservedValue {
                    key: base.to_string(),
                    value,
                    element,
                });
            }
        }
        found
    }

    /// FHIR type name recovered from the key (`valueHumanName` -> `HumanName`).
    pub fn type_name(&self) -> &str {
        self.key.strip_prefix(VALUE_FIELD).unwrap_or(&self.key)
    }

    fn encode<C>(&self, container: &mut C)
    where
        C: Container + ?Sized,
    {
        if let Some(value) = &self.value {
            container.set_value(&self.key, value.clone());
        }
        if let Some(element) = &self.element {
            container.set_value(&sibling_key(&self.key), element.clone());
        }
    }
}

impl Hash for PreservedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.is_some().hash(state);
        if let Some(value) = &self.value {
            hash_json(value, state);
        }
        self.element.is_some().hash(state);
        if let Some(element) = &self.element {
            hash_json(element, state);
        }
    }
}

macro_rules! extension_value {
    (
        primitive { $($pvar:ident($pty:ty) = $pname:literal,)* }
        complex { $($cvar:ident($cty:ty) = $cname:literal,)* }
    ) => {
        /// The `value[x]` of an [`Extension`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum ExtensionValue {
            $($pvar(Primitive<$pty>),)*
            $($cvar($cty),)*
            Other(PreservedValue),
        }

        impl ChoiceType for ExtensionValue {
            const VARIANTS: &'static [&'static str] = &[$($pname,)* $($cname,)*];

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
                    $($pname => Primitive::<$pty>::decode(container, key, options)?
                        .map(ExtensionValue::$pvar),)*
                    $($cname => decode_complex::<$cty, C>(container, key, options)?
                        .map(ExtensionValue::$cvar),)*
                    _ => None,
                })
            }

            fn type_name(&self) -> &str {
                match self {
                    $(ExtensionValue::$pvar(_) => $pname,)*
                    $(ExtensionValue::$cvar(_) => $cname,)*
                    ExtensionValue::Other(preserved) => preserved.type_name(),
                }
            }

            fn encode_variant<C>(&self, key: &str, container: &mut C)
            where
                C: Container + ?Sized,
            {
                match self {
                    $(ExtensionValue::$pvar(value) => value.encode(key, container),)*
                    $(ExtensionValue::$cvar(value) => encode_complex(value, key, container),)*
                    ExtensionValue::Other(preserved) => preserved.encode(container),
                }
            }

            fn has_content(&self) -> bool {
                match self {
                    $(ExtensionValue::$pvar(value) => !value.is_empty(),)*
                    $(ExtensionValue::$cvar(value) => !ElementCodec::is_empty(value),)*
                    ExtensionValue::Other(_) => true,
                }
            }
        }
    };
}

extension_value! {
    primitive {
        Base64Binary(Base64Binary) = "base64Binary",
        Boolean(Boolean) = "boolean",
        Code(Code) = "code",
        Date(Date) = "date",
        DateTime(DateTime) = "dateTime",
        Decimal(Decimal) = "decimal",
        Id(Id) = "id",
        Instant(Instant) = "instant",
        Integer(Integer) = "integer",
        Markdown(Markdown) = "markdown",
        PositiveInt(PositiveInt) = "positiveInt",
        String(FhirString) = "string",
        Time(Time) = "time",
        UnsignedInt(UnsignedInt) = "unsignedInt",
        Uri(Uri) = "uri",
    }
    complex {
        Annotation(Annotation) = "Annotation",
        Attachment(Attachment) = "Attachment",
        CodeableConcept(CodeableConcept) = "CodeableConcept",
        Coding(Coding) = "Coding",
        Identifier(Identifier) = "Identifier",
        Period(Period) = "Period",
        Reference(Reference) = "Reference",
    }
}
