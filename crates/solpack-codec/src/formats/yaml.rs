//! YAML document format
//!
//! Uses serde_yaml in both directions. Only single-document files are
//! accepted: a stream of several documents is a decode error.

use crate::encoding::Encoding;
use crate::error::{CodecError, CodecResult};
use crate::formats::DocumentFormat;
use crate::GenericValue;

/// YAML format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlFormat;

impl YamlFormat {
    /// Create new YAML format
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentFormat for YamlFormat {
    fn decode(&self, bytes: &[u8]) -> CodecResult<GenericValue> {
        serde_yaml::from_slice(bytes)
            .map_err(|e| CodecError::decode(Encoding::Yaml, e.to_string()))
    }

    fn encode(&self, value: &GenericValue) -> CodecResult<Vec<u8>> {
        serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| CodecError::encode(Encoding::Yaml, e.to_string()))
    }
}
