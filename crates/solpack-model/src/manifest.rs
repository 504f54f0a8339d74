//! Solution manifest
//!
//! The manifest is `manifest.json` or `manifest.yaml` at the solution root.
//! Exactly one of the two may exist.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use solpack_codec::Encoding;
use std::path::{Path, PathBuf};

/// Manifest file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    /// `manifest.json`
    Json,
    /// `manifest.yaml`
    Yaml,
}

impl ManifestFormat {
    /// File name of the manifest in this format
    #[inline]
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Json => "manifest.json",
            Self::Yaml => "manifest.yaml",
        }
    }

    /// Document encoding of the manifest file
    #[inline]
    #[must_use]
    pub const fn encoding(self) -> Encoding {
        match self {
            Self::Json => Encoding::Json,
            Self::Yaml => Encoding::Yaml,
        }
    }

    /// Detect the manifest format present in `root`
    ///
    /// # Errors
    /// - [`ModelError::NotASolutionRoot`] if `root` is not a directory or holds
    ///   no manifest
    /// - [`ModelError::AmbiguousManifest`] if both manifests exist
    pub fn detect(root: &Path) -> ModelResult<Self> {
        if !root.is_dir() {
            return Err(ModelError::not_a_solution_root(root));
        }

        let json = root.join(Self::Json.file_name()).is_file();
        let yaml = root.join(Self::Yaml.file_name()).is_file();

        match (json, yaml) {
            (true, true) => Err(ModelError::AmbiguousManifest {
                path: root.to_path_buf(),
            }),
            (true, false) => Ok(Self::Json),
            (false, true) => Ok(Self::Yaml),
            (false, false) => Err(ModelError::not_a_solution_root(root)),
        }
    }

    /// Path of the manifest file under `root`
    #[inline]
    #[must_use]
    pub fn path_in(self, root: &Path) -> PathBuf {
        root.join(self.file_name())
    }
}

/// Typed view of the manifest document
///
/// Unknown keys are not kept here; the raw manifest file in
/// [`SolutionDirectoryContents`](crate::SolutionDirectoryContents) retains them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Solution name, possibly carrying a pseudo-isolation suffix
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub solution_version: String,
    #[serde(default)]
    pub manifest_version: String,
    #[serde(default)]
    pub solution_type: String,
    #[serde(default)]
    pub description: String,
    /// Names of solutions this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Declared objects, in manifest order
    #[serde(default)]
    pub objects: Vec<ManifestObject>,
}

impl Manifest {
    /// Check the manifest is usable: a name and a version are required
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidManifest`] naming the missing field
    pub fn validate(&self, path: &Path) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::invalid_manifest(path, "missing name"));
        }
        if self.solution_version.trim().is_empty() {
            return Err(ModelError::invalid_manifest(path, "missing solutionVersion"));
        }
        Ok(())
    }

    /// Object declaring `rel_path` as its objects file or living in its
    /// objects directory
    #[must_use]
    pub fn object_for(&self, rel_path: &str) -> Option<&ManifestObject> {
        let dir = rel_path.rsplit_once('/').map_or("", |(dir, _)| dir);
        self.objects
            .iter()
            .find(|o| o.objects_file.as_deref().map(normalize_rel) == Some(rel_path))
            .or_else(|| {
                self.objects
                    .iter()
                    .find(|o| o.objects_dir.as_deref().map(normalize_rel) == Some(dir))
            })
    }
}

/// One declared object in the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestObject {
    /// Object type identifier, e.g. `fleet:ship`
    #[serde(rename = "type", default)]
    pub object_type: String,
    /// File holding instances of this type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects_file: Option<String>,
    /// Directory holding instances of this type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objects_dir: Option<String>,
}

fn normalize_rel(path: &str) -> &str {
    path.trim_start_matches("./").trim_end_matches('/')
}
