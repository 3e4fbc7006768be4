//! # clinwire-serde
//!
//! JSON text reading and writing for clinwire resources.
//!
//! The codecs in `clinwire-serde-support` never see document syntax; this
//! crate turns JSON text into the ordered document objects they decode and
//! writes encoded documents back out. Key order is preserved and decimals
//! keep the precision written on the wire.
//!
//! ```
//! use clinwire_fhir::Media;
//! use clinwire_serde::{from_json_str, to_json_string};
//!
//! let json = r#"{"resourceType":"Media","type":{"text":"photo"},"content":{"contentType":"image/png"}}"#;
//! let media: Media = from_json_str(json).unwrap();
//! assert_eq!(to_json_string(&media).unwrap(), json);
//! ```

pub mod error;
pub mod json;

pub use error::{Result, SerdeError};

pub use json::{
    from_json_str, from_json_str_with, parse_document, resource_from_json_str,
    resource_from_json_str_with, to_json_string, to_json_string_pretty, to_json_value,
    to_json_writer,
};
