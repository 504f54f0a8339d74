//! solpack Document Codec
//!
//! Decodes JSON and YAML documents into one shared [`GenericValue`] tree and
//! encodes them back with stable formatting.
//!
//! # Architecture
//!
//! ```text
//! bytes ──(Encoding)──> DocumentFormat::decode ──> GenericValue
//!                                                       │
//! bytes <──(Encoding)── DocumentFormat::encode <────────┘
//! ```
//!
//! JSON is treated as a subset of YAML: a JSON document decodes straight into
//! a `serde_yaml::Value`, so one traversal can walk either encoding.
//!
//! # Example
//!
//! ```rust
//! use solpack_codec::{Codec, Encoding};
//!
//! let codec = Codec::default();
//! let value = codec.decode(br#"{"name": "fleet"}"#, Encoding::Json).unwrap();
//! assert_eq!(value["name"].as_str(), Some("fleet"));
//!
//! let bytes = codec.encode(&value, Encoding::Json).unwrap();
//! assert_eq!(bytes, b"{\n  \"name\": \"fleet\"\n}\n");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod codec;
pub mod encoding;
pub mod error;
pub mod formats;

pub use codec::{Codec, DEFAULT_JSON_INDENT};
pub use encoding::Encoding;
pub use error::{CodecError, CodecResult};
pub use formats::{DocumentFormat, JsonFormat, YamlFormat};

/// Generic in-memory document tree shared by both encodings
pub type GenericValue = serde_yaml::Value;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn json_tree_walks_like_yaml_tree() {
        let codec = Codec::default();
        let from_json = codec
            .decode(br#"{"a": {"b": [1, "two", true, null]}}"#, Encoding::Json)
            .unwrap();
        let from_yaml = codec
            .decode(b"a:\n  b:\n    - 1\n    - two\n    - true\n    - null\n", Encoding::Yaml)
            .unwrap();

        assert_eq!(from_json, from_yaml);
    }
}
