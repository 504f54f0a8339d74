//! Solution files
//!
//! A [`SolutionFile`] owns the bytes read from disk. Rewriting replaces the
//! buffer in place and marks the file modified; nothing is written back
//! implicitly.

use crate::fingerprint::Fingerprint;
use serde::Serialize;
use solpack_codec::Encoding;

/// Classification of a file within the solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Dot-file; excluded from listings and rewriting
    Hidden,
    /// Declared by a manifest object
    Known,
    /// Anything else
    Unknown,
}

/// One file of a solution directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFile {
    name: String,
    kind: FileKind,
    object_type: String,
    encoding: Encoding,
    contents: Vec<u8>,
    original: Fingerprint,
    modified: bool,
}

impl SolutionFile {
    /// Create a file from its root-relative name and contents
    ///
    /// `name` uses forward slashes. Kind is `Hidden` for dot-files and
    /// `Unknown` otherwise; encoding follows the extension.
    #[must_use]
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        let name = name.into();
        let encoding = Encoding::from_path(std::path::Path::new(&name));
        let kind = if base_name(&name).starts_with('.') {
            FileKind::Hidden
        } else {
            FileKind::Unknown
        };
        let original = Fingerprint::compute(&contents);
        Self {
            name,
            kind,
            object_type: String::new(),
            encoding,
            contents,
            original,
            modified: false,
        }
    }

    /// Tag the file with a declared object type
    ///
    /// Hidden files stay hidden.
    #[must_use]
    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.set_object_type(Some(object_type.into()));
        self
    }

    pub(crate) fn set_object_type(&mut self, object_type: Option<String>) {
        if self.kind != FileKind::Hidden {
            self.kind = if object_type.is_some() {
                FileKind::Known
            } else {
                FileKind::Unknown
            };
        }
        self.object_type = object_type.unwrap_or_default();
    }

    /// Root-relative name, forward-slash separated
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment
    #[inline]
    #[must_use]
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.kind == FileKind::Hidden
    }

    /// Declared object type, empty if none
    #[inline]
    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    #[inline]
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    #[inline]
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Replace the buffer and mark the file modified
    pub fn replace_contents(&mut self, contents: Vec<u8>) {
        self.contents = contents;
        self.modified = true;
    }

    /// Whether the buffer was replaced since load
    #[inline]
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Fingerprint of the current buffer
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        if self.modified {
            Fingerprint::compute(&self.contents)
        } else {
            self.original
        }
    }

    /// Listing entry for reports
    #[must_use]
    pub fn summary(&self) -> FileSummary {
        FileSummary {
            name: self.name.clone(),
            kind: self.kind,
            object_type: self.object_type.clone(),
            encoding: self.encoding,
            size: self.contents.len(),
            fingerprint: self.fingerprint(),
            modified: self.modified,
        }
    }
}

/// Serializable listing entry for a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub name: String,
    pub kind: FileKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub object_type: String,
    pub encoding: Encoding,
    pub size: usize,
    pub fingerprint: Fingerprint,
    pub modified: bool,
}

fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
