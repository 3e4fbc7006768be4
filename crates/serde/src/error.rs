use clinwire_serde_support::CodecError;
use thiserror::Error;

/// Errors raised while reading or writing resource documents.
#[derive(Debug, Error)]
pub enum SerdeError {
    /// JSON syntax error, or an I/O failure of the writer passed to
    /// [`to_json_writer`](crate::json::to_json_writer).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but does not decode into the model.
    #[error("decode error: {0}")]
    Codec(#[from] CodecError),

    /// The top-level JSON value is not an object.
    #[error("expected a JSON object at the top level, found {found}")]
    ExpectedObject { found: &'static str },
}

/// Result type alias for serialization operations.
pub type Result<T> = std::result::Result<T, SerdeError>;
