//! Encoding-dispatching codec
//!
//! [`Codec`] picks the [`DocumentFormat`] for a file's [`Encoding`] so callers
//! never branch on the encoding themselves.

use crate::encoding::Encoding;
use crate::error::{CodecError, CodecResult};
use crate::formats::{DocumentFormat, JsonFormat, YamlFormat};
use crate::GenericValue;
use serde::de::DeserializeOwned;

/// Default JSON indentation width in spaces
pub const DEFAULT_JSON_INDENT: usize = 2;

/// Codec over both structured encodings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    json: JsonFormat,
    yaml: YamlFormat,
}

impl Codec {
    /// Create codec with default formatting
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set JSON indentation width
    #[inline]
    #[must_use]
    pub fn with_json_indent(mut self, indent: usize) -> Self {
        self.json = JsonFormat::new(indent);
        self
    }

    /// Format responsible for `encoding`
    ///
    /// # Errors
    /// Returns [`CodecError::Unsupported`] for [`Encoding::Other`]
    pub fn format(&self, encoding: Encoding) -> CodecResult<&dyn DocumentFormat> {
        match encoding {
            Encoding::Json => Ok(&self.json),
            Encoding::Yaml => Ok(&self.yaml),
            Encoding::Other => Err(CodecError::Unsupported(encoding)),
        }
    }

    /// Decode bytes into a generic value
    ///
    /// # Errors
    /// Returns error if the bytes are invalid for `encoding` or the encoding
    /// is not structured
    pub fn decode(&self, bytes: &[u8], encoding: Encoding) -> CodecResult<GenericValue> {
        self.format(encoding)?.decode(bytes)
    }

    /// Encode a generic value into bytes
    ///
    /// # Errors
    /// Returns error if the value cannot be represented in `encoding`
    pub fn encode(&self, value: &GenericValue, encoding: Encoding) -> CodecResult<Vec<u8>> {
        let bytes = self.format(encoding)?.encode(value)?;
        tracing::trace!(%encoding, len = bytes.len(), "encoded document");
        Ok(bytes)
    }

    /// Decode bytes straight into a typed value
    ///
    /// # Errors
    /// Returns error if the bytes are invalid or do not match `T`
    pub fn decode_as<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        encoding: Encoding,
    ) -> CodecResult<T> {
        match encoding {
            // Through `Value` so duplicate keys resolve to the last occurrence
            Encoding::Json => serde_json::from_slice::<serde_json::Value>(bytes)
                .and_then(serde_json::from_value)
                .map_err(|e| CodecError::decode(encoding, e.to_string())),
            Encoding::Yaml => serde_yaml::from_slice(bytes)
                .map_err(|e| CodecError::decode(encoding, e.to_string())),
            Encoding::Other => Err(CodecError::Unsupported(encoding)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn other_encoding_is_unsupported() {
        let codec = Codec::new();
        assert!(matches!(
            codec.decode(b"plain text", Encoding::Other),
            Err(CodecError::Unsupported(Encoding::Other))
        ));
        assert!(codec.encode(&GenericValue::Null, Encoding::Other).is_err());
    }

    #[test]
    fn decode_as_typed() {
        let codec = Codec::new();
        let from_json: Named = codec.decode_as(br#"{"name": "fleet"}"#, Encoding::Json).unwrap();
        let from_yaml: Named = codec.decode_as(b"name: fleet\n", Encoding::Yaml).unwrap();

        assert_eq!(from_json, Named { name: "fleet".into() });
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn decode_as_json_keeps_last_duplicate() {
        let named: Named = Codec::new()
            .decode_as(br#"{"name": "x", "name": "fleet"}"#, Encoding::Json)
            .unwrap();
        assert_eq!(named, Named { name: "fleet".into() });
    }

    #[test]
    fn with_json_indent_changes_output() {
        let codec = Codec::new().with_json_indent(0);
        let value = codec.decode(br#"{"a": [1]}"#, Encoding::Json).unwrap();
        let out = codec.encode(&value, Encoding::Json).unwrap();
        assert_eq!(out, b"{\n\"a\": [\n1\n]\n}\n");
    }

    proptest! {
        #[test]
        fn prop_encode_then_decode_is_stable(
            entries in proptest::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9 _.-]{0,16}", 0..8)
        ) {
            let codec = Codec::new();
            let mut map = serde_yaml::Mapping::new();
            for (k, v) in entries {
                map.insert(GenericValue::String(k), GenericValue::String(v));
            }
            let value = GenericValue::Mapping(map);

            for encoding in [Encoding::Json, Encoding::Yaml] {
                let bytes = codec.encode(&value, encoding).unwrap();
                let decoded = codec.decode(&bytes, encoding).unwrap();
                prop_assert_eq!(&decoded, &value);
                prop_assert_eq!(codec.encode(&decoded, encoding).unwrap(), bytes);
            }
        }
    }
}
