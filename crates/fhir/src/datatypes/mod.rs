//! Complex datatypes used by the resources in this crate.
//!
//! Every datatype is an element: it carries an optional `id` and a list of
//! `extension`s ahead of its own fields.

mod extension;
mod general;
mod meta;

pub use extension::{Extension, ExtensionValue, PreservedValue};
pub use general::{
    Annotation, AnnotationAuthor, Attachment, CodeableConcept, Coding, Identifier, Period,
    Reference,
};
pub use meta::{Meta, Narrative};

use clinwire_serde_support::document::string_at;
use clinwire_serde_support::{
    Container, DecodeOptions, Document, Result, decode_complex_list, encode_complex_list,
};
use serde_json::Value;

pub(crate) fn decode_element_header(
    doc: &Document,
    options: &DecodeOptions,
) -> Result<(Option<String>, Vec<Extension>)> {
    let id = string_at(doc, "id")?;
    let extension = decode_complex_list(doc, "extension", options)?;
    Ok((id, extension))
}

pub(crate) fn encode_element_header(
    id: Option<&String>,
    extension: &[Extension],
    doc: &mut Document,
) {
    if let Some(id) = id {
        doc.set_value("id", Value::String(id.clone()));
    }
    encode_complex_list(extension, "extension", doc);
}
