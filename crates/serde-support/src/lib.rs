//! # Clinwire codec support
//!
//! Resource-agnostic building blocks for reading and writing FHIR-style
//! documents. Generated or hand-written resource types are thin layers on
//! top of these pieces.
//!
//! ## Wire conventions
//!
//! | Concept | JSON shape |
//! |---------|------------|
//! | Primitive `f` | `"f": "value"` |
//! | Primitive metadata | `"_f": {"id": "...", "extension": [...]}` |
//! | Repeating primitive | `"f": ["a", null]`, `"_f": [null, {"id": "x"}]` |
//! | Choice `f[x]` with type `T` | `"fT": ...` (and `"_fT"` when `T` is primitive) |
//!
//! ## Modules
//!
//! - [`document`]: the ordered key/value [`Container`] the codecs operate on
//! - [`primitive`]: primitive kinds (`string`, `dateTime`, `positiveInt`, ...)
//! - [`value`]: [`PrimitiveValue`], the primitive/extension pairing codec
//! - [`choice`]: the [`ChoiceType`] codec for `[x]` fields
//! - [`element`]: helpers for complex, object-valued elements
//! - [`options`]: [`DecodeOptions`] shared by every decoder
//! - [`error`]: [`CodecError`]

pub mod choice;
pub mod document;
pub mod element;
pub mod error;
pub mod hash;
pub mod options;
pub mod primitive;
pub mod value;

pub use choice::{
    ChoiceType, choice_key, decode_choice, decode_required_choice, encode_choice,
    encode_optional_choice,
};
pub use document::{Container, Document, required, sibling_key};
pub use element::{
    ElementCodec, decode_complex, decode_complex_list, decode_required_complex, encode_complex,
    encode_complex_list, encode_optional_complex,
};
pub use error::{CodecError, Result};
pub use options::{DecodeOptions, EmptyChoicePolicy};
pub use primitive::PrimitiveType;
pub use value::PrimitiveValue;
