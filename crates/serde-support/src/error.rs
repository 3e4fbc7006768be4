//! Error types raised while decoding FHIR-style documents.
//!
//! Every failure is structural and permanent: decoding stops at the first
//! error and no partially decoded value is handed back to the caller.

use thiserror::Error;

/// Errors produced by the primitive, choice and resource codecs.
///
/// Keys are reported as dotted paths relative to the document being decoded
/// (`content.contentType`, `contained[1].resourceType`), built up through
/// [`CodecError::within`] as the error propagates out of nested decoders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A required field's keys are entirely absent.
    #[error("missing required field: {key}")]
    MissingRequiredField { key: String },

    /// A value is present but has the wrong shape or type.
    #[error("type mismatch at {key}: expected {expected}")]
    TypeMismatch { key: String, expected: String },

    /// More than one variant key is present for a single choice field.
    #[error("more than one value provided for choice field {field}: {}", .keys.join(", "))]
    DuplicateChoiceValue { field: String, keys: Vec<String> },

    /// A contained sub-document names a resource type with no registered decoder.
    #[error("no decoder registered for resourceType {tag:?}")]
    UnknownDiscriminator { tag: String },

    /// A choice variant key is present but carries nothing, and the active
    /// policy rejects that.
    #[error("choice field {field} has an empty value at {key}")]
    EmptyChoiceValue { field: String, key: String },
}

impl CodecError {
    pub fn missing(key: impl Into<String>) -> Self {
        CodecError::MissingRequiredField { key: key.into() }
    }

    pub fn type_mismatch(key: impl Into<String>, expected: impl Into<String>) -> Self {
        CodecError::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
        }
    }

    /// Prefixes the key path of this error with the enclosing field.
    ///
    /// `UnknownDiscriminator` carries no path and is returned unchanged.
    pub fn within(self, prefix: &str) -> Self {
        match self {
            CodecError::MissingRequiredField { key } => CodecError::MissingRequiredField {
                key: join_path(prefix, &key),
            },
            CodecError::TypeMismatch { key, expected } => CodecError::TypeMismatch {
                key: join_path(prefix, &key),
                expected,
            },
            CodecError::DuplicateChoiceValue { field, keys } => CodecError::DuplicateChoiceValue {
                field: join_path(prefix, &field),
                keys: keys.iter().map(|k| join_path(prefix, k)).collect(),
            },
            CodecError::EmptyChoiceValue { field, key } => CodecError::EmptyChoiceValue {
                field: join_path(prefix, &field),
                key: join_path(prefix, &key),
            },
            other @ CodecError::UnknownDiscriminator { .. } => other,
        }
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else if key.starts_with('[') {
        format!("{prefix}{key}")
    } else {
        format!("{prefix}.{key}")
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
