//! Error types for the document codec

use crate::encoding::Encoding;

/// Errors while decoding or encoding a document
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Bytes are not valid for the stated encoding
    #[error("{encoding} decode error: {message}")]
    Decode {
        /// Encoding the bytes were decoded as
        encoding: Encoding,
        /// Underlying parser message
        message: String,
    },

    /// Value could not be serialized in the requested encoding
    #[error("{encoding} encode error: {message}")]
    Encode {
        /// Encoding the value was encoded as
        encoding: Encoding,
        /// Underlying serializer message
        message: String,
    },

    /// Encoding has no structured representation
    #[error("encoding '{0}' cannot be decoded or encoded")]
    Unsupported(Encoding),
}

impl CodecError {
    /// Create decode error
    pub fn decode(encoding: Encoding, message: impl Into<String>) -> Self {
        Self::Decode {
            encoding,
            message: message.into(),
        }
    }

    /// Create encode error
    pub fn encode(encoding: Encoding, message: impl Into<String>) -> Self {
        Self::Encode {
            encoding,
            message: message.into(),
        }
    }

    /// Check if this error came from decoding
    #[inline]
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
