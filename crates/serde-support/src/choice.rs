//! Choice (`[x]`) fields.
//!
//! A logical field `F` with declared variant types `T1..Tn` is carried as at
//! most one of the keys `F + T1`, ..., `F + Tn`, where the type name is
//! capitalised (`occurrence` + `dateTime` = `occurrenceDateTime`). Primitive
//! variants additionally use the `_` sibling of their key.

use heck::ToUpperCamelCase;

use crate::document::{Container, sibling_key};
use crate::error::{CodecError, Result};
use crate::options::{DecodeOptions, EmptyChoicePolicy};

/// A tagged union over the closed set of variants declared for one field.
pub trait ChoiceType: Sized {
    /// FHIR type names of the declared variants, in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Decodes the variant `type_name` from the payload stored under `key`.
    fn decode_variant<C>(
        type_name: &str,
        container: &C,
        key: &str,
        options: &DecodeOptions,
    ) -> Result<Option<Self>>
    where
        C: Container + ?Sized;

    /// FHIR type name of the selected variant.
    fn type_name(&self) -> &str;

    /// Writes the selected variant under `key` (and `_key` for primitives).
    fn encode_variant<C>(&self, key: &str, container: &mut C)
    where
        C: Container + ?Sized;

    /// False when the payload carries nothing at all.
    fn has_content(&self) -> bool;
}

/// Builds the wire key for `field` holding a value of `type_name`.
pub fn choice_key(field: &str, type_name: &str) -> String {
    format!("{field}{}", type_name.to_upper_camel_case())
}

/// Decodes the choice field `field`.
///
/// Every declared variant key is probed in declaration order. Two or more
/// variants with a value fail with `DuplicateChoiceValue`; none yields `None`
/// and leaves the required/optional decision to the caller.
pub fn decode_choice<V, C>(container: &C, field: &str, options: &DecodeOptions) -> Result<Option<V>>
where
    V: ChoiceType,
    C: Container + ?Sized,
{
    let mut found: Vec<(String, V)> = Vec::new();
    for type_name in V::VARIANTS {
        let key = choice_key(field, type_name);
        if !container.contains_key(&key) && !container.contains_key(&sibling_key(&key)) {
            continue;
        }

        let decoded = V::decode_variant(type_name, container, &key, options)?;
        let empty = decoded.as_ref().is_none_or(|value| !value.has_content());
        if empty && options.empty_choice == EmptyChoicePolicy::Reject {
            return Err(CodecError::EmptyChoiceValue {
                field: field.to_string(),
                key,
            });
        }
        if let Some(value) = decoded {
            found.push((key, value));
        }
    }

    if found.len() > 1 {
        return Err(CodecError::DuplicateChoiceValue {
            field: field.to_string(),
            keys: found.into_iter().map(|(key, _)| key).collect(),
        });
    }
    Ok(found.pop().map(|(_, value)| value))
}

/// Decodes a choice field that must be present, reporting `field[x]` as missing.
pub fn decode_required_choice<V, C>(
    container: &C,
    field: &str,
    options: &DecodeOptions,
) -> Result<V>
where
    V: ChoiceType,
    C: Container + ?Sized,
{
    decode_choice(container, field, options)?
        .ok_or_else(|| CodecError::missing(format!("{field}[x]")))
}

/// Writes exactly the key of the selected variant.
pub fn encode_choice<V, C>(value: &V, field: &str, container: &mut C)
where
    V: ChoiceType,
    C: Container + ?Sized,
{
    value.encode_variant(&choice_key(field, value.type_name()), container);
}

pub fn encode_optional_choice<V, C>(value: Option<&V>, field: &str, container: &mut C)
where
    V: ChoiceType,
    C: Container + ?Sized,
{
    if let Some(value) = value {
        encode_choice(value, field, container);
    }
}
