//! JSON document format
//!
//! Uses serde_json for parsing and a pretty printer with a fixed indentation
//! width. serde_json never HTML-escapes, so `<`, `>` and `&` round-trip.

use crate::codec::DEFAULT_JSON_INDENT;
use crate::encoding::Encoding;
use crate::error::{CodecError, CodecResult};
use crate::formats::DocumentFormat;
use crate::GenericValue;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// JSON format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFormat {
    indent: usize,
}

impl JsonFormat {
    /// Create JSON format with the given indentation width
    #[inline]
    #[must_use]
    pub const fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// Indentation width in spaces
    #[inline]
    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self::new(DEFAULT_JSON_INDENT)
    }
}

impl DocumentFormat for JsonFormat {
    /// Duplicate object keys are accepted; the last occurrence wins
    fn decode(&self, bytes: &[u8]) -> CodecResult<GenericValue> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| CodecError::decode(Encoding::Json, e.to_string()))?;
        serde_yaml::to_value(value).map_err(|e| CodecError::decode(Encoding::Json, e.to_string()))
    }

    fn encode(&self, value: &GenericValue) -> CodecResult<Vec<u8>> {
        let indent = vec![b' '; self.indent];
        let mut out = Vec::new();
        let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
        value
            .serialize(&mut ser)
            .map_err(|e| CodecError::encode(Encoding::Json, e.to_string()))?;
        out.push(b'\n');
        Ok(out)
    }
}
