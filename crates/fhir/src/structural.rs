//! Structural equality and hashing for resources.
//!
//! Resources compare in two steps: the shared base layer first, then the
//! type's own fields in declaration order. Hashing follows the same order, so
//! equal values always hash equally.

use std::hash::{Hash, Hasher};

/// The base-then-fields contract behind a resource's `PartialEq` and `Hash`.
pub trait StructuralResource {
    type Base: PartialEq + Hash;

    fn base(&self) -> &Self::Base;

    /// Compares the fields declared by the concrete type itself.
    fn fields_eq(&self, other: &Self) -> bool;

    /// Hashes the fields declared by the concrete type, in declaration order.
    fn hash_fields<H: Hasher>(&self, state: &mut H);
}

pub fn structural_eq<R: StructuralResource>(left: &R, right: &R) -> bool {
    left.base() == right.base() && left.fields_eq(right)
}

pub fn structural_hash<R: StructuralResource, H: Hasher>(resource: &R, state: &mut H) {
    resource.base().hash(state);
    resource.hash_fields(state);
}

/// Implements [`StructuralResource`], `PartialEq`, `Eq` and `Hash` for a
/// resource struct from its base field and own field list.
macro_rules! structural_resource {
    ($ty:ty { base: $base:ident : $base_ty:ty, fields: [$($field:ident),* $(,)?] }) => {
        impl $crate::structural::StructuralResource for $ty {
            type Base = $base_ty;

            fn base(&self) -> &Self::Base {
                &self.$base
            }

            fn fields_eq(&self, other: &Self) -> bool {
                true $(&& self.$field == other.$field)*
            }

            fn hash_fields<H: ::std::hash::Hasher>(&self, state: &mut H) {
                $(::std::hash::Hash::hash(&self.$field, state);)*
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::structural::structural_eq(self, other)
            }
        }

        impl Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                $crate::structural::structural_hash(self, state);
            }
        }
    };
}

pub(crate) use structural_resource;
