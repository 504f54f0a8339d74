//! Error types for rewriting and isolation
//!
//! Provides error handling for:
//! - Whole-file rewrites (decode, rule, encode)
//! - Isolation transform setup and application

use crate::isolation::IsolationDirection;
use solpack_codec::{CodecError, Encoding};
use solpack_model::ModelError;

/// Errors during a rewrite
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// File content could not be decoded or re-encoded
    #[error("{file}: {source}")]
    Codec {
        file: String,
        #[source]
        source: CodecError,
    },

    /// File encoding has no structured representation
    #[error("{file}: encoding '{encoding}' cannot be rewritten")]
    UnsupportedEncoding { file: String, encoding: Encoding },

    /// Edit rule refused a value
    #[error("{file}: {path}: {message}")]
    Rule {
        file: String,
        path: String,
        message: String,
    },
}

impl RewriteError {
    /// Create codec error for file
    pub fn codec(file: impl Into<String>, source: CodecError) -> Self {
        Self::Codec {
            file: file.into(),
            source,
        }
    }

    /// Create rule error at a document path
    pub fn rule(
        file: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Rule {
            file: file.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if the failure was a decode error (malformed input)
    #[inline]
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Codec { source, .. } if source.is_decode())
    }
}

/// Errors during an isolation transform
#[derive(Debug, thiserror::Error)]
pub enum IsolationError {
    /// Base solution name fails the name syntax
    #[error("invalid solution name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Direction has no implementation
    #[error("conversion to {0} isolation is not supported yet")]
    Unsupported(IsolationDirection),

    /// Matcher could not be compiled
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Rewrite failure
    #[error("rewrite failed: {0}")]
    Rewrite(#[from] RewriteError),

    /// Content model failure
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl IsolationError {
    /// Create invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for rewrite operations
pub type RewriteResult<T> = Result<T, RewriteError>;

/// Result type alias for isolation operations
pub type IsolationResult<T> = Result<T, IsolationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_encoding_display() {
        let err = RewriteError::UnsupportedEncoding {
            file: "notes.txt".into(),
            encoding: Encoding::Other,
        };
        assert_eq!(err.to_string(), "notes.txt: encoding 'other' cannot be rewritten");
    }

    #[test]
    fn decode_detection() {
        let err = RewriteError::codec("a.json", CodecError::decode(Encoding::Json, "eof"));
        assert!(err.is_decode());

        let err = RewriteError::rule("a.json", "x", "nope");
        assert!(!err.is_decode());
    }

    #[test]
    fn unsupported_direction_display() {
        let err = IsolationError::Unsupported(IsolationDirection::Pseudo);
        assert_eq!(err.to_string(), "conversion to pseudo isolation is not supported yet");
    }

    #[test]
    fn error_conversions() {
        let rewrite = RewriteError::rule("a", "b", "c");
        let isolation: IsolationError = rewrite.into();
        assert!(matches!(isolation, IsolationError::Rewrite(_)));
    }
}
