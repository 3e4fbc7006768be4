//! `serde` integration.
//!
//! Resources serialize through their codec: the document produced by
//! `to_document` is handed to the serializer, and deserialization buffers a
//! `serde_json::Value` and decodes it with the process-wide registry.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::registry::{ContainedResource, DecodeContext, decode_resource};
use clinwire_serde_support::Document;

pub(crate) fn deserialize_document<'de, D>(deserializer: D) -> Result<Document, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(doc) => Ok(doc),
        other => Err(de::Error::custom(format!(
            "expected a resource object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Implements `Serialize` / `Deserialize` for concrete resource types.
macro_rules! serde_via_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ::serde::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: ::serde::Serializer,
                {
                    let doc = $crate::resource::FhirResource::to_document(self);
                    ::serde::Serialize::serialize(&doc, serializer)
                }
            }

            impl<'de> ::serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: ::serde::Deserializer<'de>,
                {
                    let doc = $crate::serde_helpers::deserialize_document(deserializer)?;
                    <$ty as $crate::resource::FhirResource>::from_document(&doc)
                        .map_err(::serde::de::Error::custom)
                }
            }
        )+
    };
}

serde_via_codec!(crate::media::Media, crate::binary::Binary);

impl Serialize for ContainedResource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_document().serialize(serializer)
    }
}

/// Decodes whichever registered type the `resourceType` names.
impl<'de> Deserialize<'de> for ContainedResource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let doc = deserialize_document(deserializer)?;
        decode_resource(&doc, &DecodeContext::default()).map_err(de::Error::custom)
    }
}
