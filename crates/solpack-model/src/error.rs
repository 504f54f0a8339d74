//! Error types for loading and persisting the content model

use std::path::PathBuf;

/// Errors while scanning or persisting a solution directory
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The root is not a directory or has no readable manifest
    #[error("not a solution root: {path}")]
    NotASolutionRoot {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Both `manifest.json` and `manifest.yaml` exist
    #[error("ambiguous manifest in {path}: both manifest.json and manifest.yaml exist")]
    AmbiguousManifest { path: PathBuf },

    /// Manifest is malformed or lacks a name/version
    #[error("invalid manifest {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    /// IO error while reading or writing
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ModelError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create not-a-solution-root error for path
    pub fn not_a_solution_root(path: impl Into<PathBuf>) -> Self {
        Self::NotASolutionRoot {
            path: path.into(),
            source: None,
        }
    }

    /// Create invalid manifest error for path
    pub fn invalid_manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Convert a directory walk failure, keeping the offending path
    pub(crate) fn walk(root: &std::path::Path, err: walkdir::Error) -> Self {
        let path = err.path().map_or_else(|| root.to_path_buf(), PathBuf::from);
        Self::Io {
            path,
            source: err.into(),
        }
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
