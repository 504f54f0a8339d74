//! Document formats for the structured encodings
//!
//! Each format converts between raw bytes and the shared [`GenericValue`]:
//! - JSON via serde_json (fixed indentation, no HTML escaping)
//! - YAML via serde_yaml (canonical block style)

use crate::error::CodecResult;
use crate::GenericValue;

mod json;
mod yaml;

pub use json::JsonFormat;
pub use yaml::YamlFormat;

/// Format trait for converting between bytes and generic values
///
/// Implement this trait to add support for a new structured encoding.
pub trait DocumentFormat: Send + Sync {
    /// Decode bytes into a generic value
    ///
    /// # Errors
    /// Returns [`CodecError::Decode`](crate::CodecError::Decode) if the bytes
    /// are not a single valid document
    fn decode(&self, bytes: &[u8]) -> CodecResult<GenericValue>;

    /// Encode a generic value back into bytes
    ///
    /// # Errors
    /// Returns [`CodecError::Encode`](crate::CodecError::Encode) if the value
    /// cannot be represented in this encoding
    fn encode(&self, value: &GenericValue) -> CodecResult<Vec<u8>>;
}
