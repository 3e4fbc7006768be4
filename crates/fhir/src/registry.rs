//! Polymorphic resource dispatch.
//!
//! A [`ResourceRegistry`] maps a `resourceType` discriminator to the decoder
//! of the matching concrete type. Decoded values are type-erased into
//! [`ContainedResource`], which keeps equality, hashing, cloning and encoding
//! of the concrete type.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use clinwire_serde_support::{CodecError, DecodeOptions, Document, Result};
use tracing::{debug, trace};

use crate::binary::Binary;
use crate::media::Media;
use crate::resource::{FhirResource, resource_type_of};

/// Object-safe view of a [`FhirResource`].
pub trait AnyResource: fmt::Debug + Send + Sync {
    fn resource_type(&self) -> &'static str;

    fn id_dyn(&self) -> Option<&str>;

    fn contained_dyn(&self) -> &[ContainedResource];

    fn as_any(&self) -> &dyn Any;

    fn clone_boxed(&self) -> Box<dyn AnyResource>;

    /// Equal only when `other` has the same concrete type and compares equal.
    fn eq_dyn(&self, other: &dyn AnyResource) -> bool;

    fn hash_dyn(&self, state: &mut dyn Hasher);

    fn encode_dyn(&self) -> Document;
}

impl<R: FhirResource> AnyResource for R {
    fn resource_type(&self) -> &'static str {
        R::RESOURCE_TYPE
    }

    fn id_dyn(&self) -> Option<&str> {
        FhirResource::id(self)
    }

    fn contained_dyn(&self) -> &[ContainedResource] {
        FhirResource::contained(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn AnyResource> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn AnyResource) -> bool {
        other
            .as_any()
            .downcast_ref::<R>()
            .is_some_and(|other| self == other)
    }

    fn hash_dyn(&self, mut state: &mut dyn Hasher) {
        R::RESOURCE_TYPE.hash(&mut state);
        self.hash(&mut state);
    }

    fn encode_dyn(&self) -> Document {
        FhirResource::to_document(self)
    }
}

/// A resource of any registered type, as held in `contained` or returned by
/// polymorphic decoding.
pub struct ContainedResource(Box<dyn AnyResource>);

impl ContainedResource {
    pub fn new<R: FhirResource>(resource: R) -> Self {
        ContainedResource(Box::new(resource))
    }

    pub fn resource_type(&self) -> &'static str {
        self.0.resource_type()
    }

    pub fn id(&self) -> Option<&str> {
        self.0.id_dyn()
    }

    pub fn contained(&self) -> &[ContainedResource] {
        self.0.contained_dyn()
    }

    /// Returns the concrete resource if it is an `R`.
    pub fn downcast_ref<R: FhirResource>(&self) -> Option<&R> {
        self.0.as_any().downcast_ref::<R>()
    }

    pub fn is<R: FhirResource>(&self) -> bool {
        self.downcast_ref::<R>().is_some()
    }

    /// Encodes the resource including its `resourceType`.
    pub fn to_document(&self) -> Document {
        self.0.encode_dyn()
    }

    pub fn as_dyn(&self) -> &dyn AnyResource {
        self.0.as_ref()
    }
}

impl<R: FhirResource> From<R> for ContainedResource {
    fn from(resource: R) -> Self {
        ContainedResource::new(resource)
    }
}

impl Clone for ContainedResource {
    fn clone(&self) -> Self {
        ContainedResource(self.0.clone_boxed())
    }
}

impl PartialEq for ContainedResource {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl Eq for ContainedResource {}

impl Hash for ContainedResource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_dyn(state);
    }
}

impl fmt::Debug for ContainedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Decoder entry stored per discriminator.
pub type DecodeFn = fn(&Document, &DecodeContext<'_>) -> Result<ContainedResource>;

fn decode_as<R: FhirResource>(doc: &Document, cx: &DecodeContext<'_>) -> Result<ContainedResource> {
    R::decode_document(doc, cx).map(ContainedResource::new)
}

/// Immutable discriminator -> decoder table.
#[derive(Clone)]
pub struct ResourceRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl ResourceRegistry {
    pub fn builder() -> ResourceRegistryBuilder {
        ResourceRegistryBuilder::default()
    }

    /// The process-wide registry holding every resource type of this crate.
    pub fn global() -> &'static ResourceRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.decoders.contains_key(resource_type)
    }

    /// Registered discriminators, sorted.
    pub fn resource_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = self.decoders.keys().copied().collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decodes a document of any registered type, dispatching on its
    /// `resourceType`.
    pub fn decode_any(&self, doc: &Document, cx: &DecodeContext<'_>) -> Result<ContainedResource> {
        let tag = resource_type_of(doc)?;
        let Some(decode) = self.decoders.get(tag.as_str()) else {
            debug!(resource_type = %tag, "no decoder registered");
            return Err(CodecError::UnknownDiscriminator { tag });
        };
        trace!(resource_type = %tag, "dispatching decode");
        decode(doc, cx)
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}

#[derive(Default)]
pub struct ResourceRegistryBuilder {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl ResourceRegistryBuilder {
    /// Registers `R` under its `RESOURCE_TYPE`. A later registration for the
    /// same discriminator replaces the earlier one.
    pub fn register<R: FhirResource>(mut self) -> Self {
        if self
            .decoders
            .insert(R::RESOURCE_TYPE, decode_as::<R>)
            .is_some()
        {
            debug!(resource_type = R::RESOURCE_TYPE, "replacing registered decoder");
        }
        self
    }

    pub fn build(self) -> ResourceRegistry {
        debug!(count = self.decoders.len(), "resource registry built");
        ResourceRegistry {
            decoders: self.decoders,
        }
    }
}

static GLOBAL_REGISTRY: LazyLock<ResourceRegistry> = LazyLock::new(|| {
    ResourceRegistry::builder()
        .register::<Binary>()
        .register::<Media>()
        .build()
});

/// Everything a resource decoder needs besides the document itself.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    registry: &'a ResourceRegistry,
    options: DecodeOptions,
}

impl<'a> DecodeContext<'a> {
    pub fn new(registry: &'a ResourceRegistry, options: DecodeOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'a ResourceRegistry {
        self.registry
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for DecodeContext<'static> {
    fn default() -> Self {
        DecodeContext::new(ResourceRegistry::global(), DecodeOptions::default())
    }
}

/// Decodes a top-level document of any type known to `cx`'s registry.
pub fn decode_resource(doc: &Document, cx: &DecodeContext<'_>) -> Result<ContainedResource> {
    cx.registry().decode_any(doc, cx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{Attachment, CodeableConcept};
    use serde_json::json;

    #[test]
    fn test_global_registry_contents() {
        let registry = ResourceRegistry::global();
        assert_eq!(registry.resource_types(), vec!["Binary", "Media"]);
        assert!(registry.contains("Media"));
        assert!(!registry.contains("Patient"));
    }

    #[test]
    fn test_unknown_discriminator() {
        let doc = json!({"resourceType": "Patient", "id": "p1"});
        let err = decode_resource(doc.as_object().unwrap(), &DecodeContext::default()).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownDiscriminator {
                tag: "Patient".to_string()
            }
        );
    }

    #[test]
    fn test_custom_registry_limits_dispatch() {
        let registry = ResourceRegistry::builder().register::<Binary>().build();
        let cx = DecodeContext::new(&registry, DecodeOptions::default());
        let doc = json!({"resourceType": "Media", "type": {"text": "photo"}, "content": {}});
        let err = decode_resource(doc.as_object().unwrap(), &cx).unwrap_err();
        assert!(matches!(err, CodecError::UnknownDiscriminator { ref tag } if tag == "Media"));
    }

    #[test]
    fn test_dyn_equality_requires_same_type() {
        let binary = ContainedResource::new(Binary::new("text/plain", "aGk=").unwrap());
        let media = ContainedResource::new(Media::new(
            CodeableConcept::from_text("photo"),
            Attachment::default(),
        ));
        assert_ne!(binary, media);
        assert_eq!(binary.clone(), binary);
        assert!(binary.is::<Binary>());
        assert!(binary.downcast_ref::<Media>().is_none());
    }
}
