//! Encoding detection by file extension

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Encoding of a solution file
///
/// Determined solely by the file extension and fixed for the lifetime of the
/// loaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
    /// Anything else; copied through, never decoded
    Other,
}

impl Encoding {
    /// Classify a path by its extension
    ///
    /// Matching is case-insensitive: `CONFIG.JSON` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Other, Self::from_extension)
    }

    /// Classify an extension (without dot)
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            _ => Self::Other,
        }
    }

    /// Check if files of this encoding can be decoded and rewritten
    #[inline]
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json | Self::Yaml)
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}
