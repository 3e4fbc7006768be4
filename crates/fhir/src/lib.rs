//! # clinwire-fhir
//!
//! FHIR resource model built on the codecs of `clinwire-serde-support`.
//!
//! * [`resource`]: the `Resource` / `DomainResource` envelope and the
//!   [`FhirResource`] trait concrete types implement.
//! * [`registry`]: `resourceType` dispatch for contained resources and
//!   polymorphic top-level decoding.
//! * [`structural`]: base-then-fields equality and hashing.
//! * [`datatypes`]: the complex datatypes the resources use.
//! * [`Media`] and [`Binary`]: concrete resources.
//!
//! ```
//! use clinwire_fhir::{FhirResource, Media, MediaOccurrence};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "resourceType": "Media",
//!     "type": {"coding": [{"code": "photo"}]},
//!     "occurrenceDateTime": "2020-01-01",
//!     "content": {"contentType": "image/png"}
//! });
//! let media = Media::from_document(raw.as_object().unwrap()).unwrap();
//! assert!(matches!(media.occurrence, Some(MediaOccurrence::DateTime(_))));
//! ```

pub mod binary;
pub mod datatypes;
pub mod media;
pub mod primitives;
pub mod registry;
pub mod resource;
mod serde_helpers;
pub mod structural;

pub use binary::Binary;
pub use media::{Media, MediaOccurrence};
pub use primitives::Primitive;
pub use registry::{
    AnyResource, ContainedResource, DecodeContext, ResourceRegistry, ResourceRegistryBuilder,
    decode_resource,
};
pub use resource::{DomainResourceBase, FhirResource, ResourceBase, resource_type_of};
pub use structural::StructuralResource;

pub use clinwire_serde_support::{CodecError, DecodeOptions, Document, EmptyChoicePolicy};
