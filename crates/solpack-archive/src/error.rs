//! Error types for archive building

use std::path::{Path, PathBuf};

/// Errors while building an archive
///
/// Every variant is fatal; no partially written archive survives one.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Source is not a directory
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Source path has no final component to name the archive root
    #[error("cannot derive a solution name from {path}")]
    InvalidRoot { path: PathBuf },

    /// `~` used but the home directory is unknown
    #[error("cannot expand '~': home directory is unknown")]
    NoHomeDirectory,

    /// Entry name is not valid UTF-8
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path { path: PathBuf },

    /// I/O failure
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Zip container failure
    #[error("zip error in {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl ArchiveError {
    /// Create I/O error with path
    pub fn io_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create zip error with path
    pub fn zip_error(path: impl AsRef<Path>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        Self::Io { path, source }
    }
}

/// Result type alias for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = ArchiveError::io_error(
            "/tmp/fleet.zip",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error at /tmp/fleet.zip: denied");
    }

    #[test]
    fn not_a_directory_display() {
        let err = ArchiveError::NotADirectory {
            path: PathBuf::from("/tmp/manifest.json"),
        };
        assert_eq!(err.to_string(), "not a directory: /tmp/manifest.json");
    }
}
