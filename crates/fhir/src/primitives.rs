//! Primitive kinds bound to this model's [`Extension`] type.

use clinwire_serde_support::PrimitiveValue;

use crate::datatypes::Extension;

pub use clinwire_serde_support::primitive::{
    Base64Binary, Boolean, Code, Date, DateTime, Decimal, FhirString, Id, Instant, Integer,
    Markdown, PositiveInt, Time, UnsignedInt, Uri, Xhtml,
};

/// A primitive element: value plus `id` / `extension` metadata.
pub type Primitive<T> = PrimitiveValue<T, Extension>;
