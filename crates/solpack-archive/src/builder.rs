//! Archive builder
//!
//! Walks a solution directory and writes a zip whose entries are rooted at the
//! directory's own name:
//!
//! ```text
//! fleet/
//! fleet/manifest.json
//! fleet/config/
//! fleet/config/settings.yaml
//! ```
//!
//! The archive is written to a temporary file next to its final location and
//! renamed into place on success. On any error the temporary file is removed.

use crate::error::{ArchiveError, ArchiveResult};
use crate::paths::{absolutize, entry_name};
use crate::policy::InclusionPolicy;
use serde::{Deserialize, Serialize};
use solpack_model::Fingerprint;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Permission bits of a finished archive; temporary files start out 0600
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o644;

/// Root-relative path → replacement bytes
pub type Overrides = BTreeMap<PathBuf, Vec<u8>>;

/// Compression applied to file entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Self::Deflated => CompressionMethod::Deflated,
            Self::Stored => CompressionMethod::Stored,
        }
    }
}

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deflated => f.write_str("deflated"),
            Self::Stored => f.write_str("stored"),
        }
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deflated" => Ok(Self::Deflated),
            "stored" => Ok(Self::Stored),
            other => Err(format!("unknown compression '{other}'")),
        }
    }
}

/// A finished archive on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveHandle {
    /// Absolute path of the archive file
    pub path: PathBuf,
    /// Number of entries, directories included
    pub entries: usize,
    /// Archive size in bytes
    pub size: u64,
    /// Blake3 digest of the archive bytes
    pub fingerprint: Fingerprint,
}

/// Configurable zip builder for solution directories
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    policy: InclusionPolicy,
    compression: Compression,
}

impl ArchiveBuilder {
    /// Builder with the default policy and deflate compression
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(mut self, policy: InclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> &InclusionPolicy {
        &self.policy
    }

    #[inline]
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Archive `root` exactly as it is on disk
    ///
    /// # Errors
    /// See [`build_with`](Self::build_with)
    pub fn build(&self, root: &Path, destination: Option<&Path>) -> ArchiveResult<ArchiveHandle> {
        self.build_with(root, destination, &Overrides::new())
    }

    /// Archive `root`, taking file bytes from `overrides` where present
    ///
    /// Destination resolution:
    /// - an existing directory → `<dir>/<name>.zip`
    /// - any other path → used verbatim, replacing an existing file
    /// - `None` → a fresh `<name>-*.zip` in the system temp directory
    ///
    /// # Errors
    /// - [`ArchiveError::NotADirectory`] if `root` is not a directory
    /// - [`ArchiveError::InvalidRoot`] if `root` has no name
    /// - [`ArchiveError::Io`] / [`ArchiveError::Zip`] on any write failure
    pub fn build_with(
        &self,
        root: &Path,
        destination: Option<&Path>,
        overrides: &Overrides,
    ) -> ArchiveResult<ArchiveHandle> {
        let root = absolutize(root)?;
        if !root.is_dir() {
            return Err(ArchiveError::NotADirectory { path: root });
        }
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ArchiveError::InvalidRoot { path: root.clone() })?
            .to_string();
        let parent = root
            .parent()
            .ok_or_else(|| ArchiveError::InvalidRoot { path: root.clone() })?
            .to_path_buf();

        let (temp, target) = match destination {
            Some(dest) => {
                let dest = absolutize(dest)?;
                let target = if dest.is_dir() {
                    dest.join(format!("{name}.zip"))
                } else {
                    dest
                };
                let dir = target.parent().unwrap_or(Path::new("/"));
                let temp = tempfile::Builder::new()
                    .prefix(&format!(".{name}-"))
                    .suffix(".zip.partial")
                    .tempfile_in(dir)
                    .map_err(|e| ArchiveError::io_error(dir, e))?;
                (temp, Some(target))
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix(&format!("{name}-"))
                    .suffix(".zip")
                    .tempfile()
                    .map_err(|e| ArchiveError::io_error(std::env::temp_dir(), e))?;
                (temp, None)
            }
        };

        let temp_path = temp.path().to_path_buf();
        let mut own_files = vec![temp_path.clone()];
        own_files.extend(target.clone());

        let mut writer = ZipWriter::new(temp);
        let entries = self.write_entries(&mut writer, &root, &parent, overrides, &own_files)?;
        let mut temp = writer
            .finish()
            .map_err(|e| ArchiveError::zip_error(&temp_path, e))?;
        temp.flush().map_err(|e| ArchiveError::io_error(&temp_path, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(ARCHIVE_MODE))
                .map_err(|e| ArchiveError::io_error(&temp_path, e))?;
        }

        let path = match target {
            Some(target) => {
                temp.persist(&target)
                    .map_err(|e| ArchiveError::io_error(&target, e.error))?;
                target
            }
            None => {
                let (_, path) = temp
                    .keep()
                    .map_err(|e| ArchiveError::io_error(&temp_path, e.error))?;
                path
            }
        };

        let bytes = std::fs::read(&path).map_err(|e| ArchiveError::io_error(&path, e))?;
        let handle = ArchiveHandle {
            entries,
            size: bytes.len() as u64,
            fingerprint: Fingerprint::compute(&bytes),
            path,
        };

        tracing::info!(
            path = %handle.path.display(),
            entries = handle.entries,
            size = handle.size,
            "archive written"
        );
        Ok(handle)
    }

    fn write_entries<W: Write + Seek>(
        &self,
        writer: &mut ZipWriter<W>,
        root: &Path,
        parent: &Path,
        overrides: &Overrides,
        own_files: &[PathBuf],
    ) -> ArchiveResult<usize> {
        let archive_path = own_files[0].as_path();
        let dir_options = SimpleFileOptions::default();
        let file_options =
            SimpleFileOptions::default().compression_method(self.compression.method());
        let mut used: BTreeSet<&Path> = BTreeSet::new();
        let mut entries = 0;

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.policy.excludes_name(e.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| ArchiveError::walk(root, e))?;
            let path = entry.path();
            if own_files.iter().any(|p| p == path) {
                continue;
            }
            let name = entry_name(parent, path)?;

            if entry.file_type().is_dir() {
                writer
                    .add_directory(format!("{name}/"), dir_options)
                    .map_err(|e| ArchiveError::zip_error(archive_path, e))?;
                tracing::debug!("adding {name}/");
                entries += 1;
                continue;
            }

            if entry.path_is_symlink() && !path.is_file() {
                tracing::warn!("skipping symlink {}: target is not a file", path.display());
                continue;
            }

            let rel = path.strip_prefix(root).map_err(|_| ArchiveError::InvalidRoot {
                path: path.to_path_buf(),
            })?;
            let bytes = match overrides.get_key_value(rel) {
                Some((key, bytes)) => {
                    used.insert(key.as_path());
                    tracing::debug!("adding {name} (in-memory)");
                    bytes.clone()
                }
                None => {
                    tracing::debug!("adding {name}");
                    std::fs::read(path).map_err(|e| ArchiveError::io_error(path, e))?
                }
            };

            writer
                .start_file(name, file_options)
                .map_err(|e| ArchiveError::zip_error(archive_path, e))?;
            writer
                .write_all(&bytes)
                .map_err(|e| ArchiveError::io_error(archive_path, e))?;
            entries += 1;
        }

        for key in overrides.keys().filter(|k| !used.contains(k.as_path())) {
            tracing::warn!("override for {} matched no archived file", key.display());
        }
        Ok(entries)
    }
}

/// Archive `root` with the default builder
///
/// # Errors
/// See [`ArchiveBuilder::build_with`]
pub fn build_archive(root: &Path, destination: Option<&Path>) -> ArchiveResult<ArchiveHandle> {
    ArchiveBuilder::new().build(root, destination)
}

/// Archive `root` with the default builder and in-memory overrides
///
/// # Errors
/// See [`ArchiveBuilder::build_with`]
pub fn build_archive_with(
    root: &Path,
    destination: Option<&Path>,
    overrides: &Overrides,
) -> ArchiveResult<ArchiveHandle> {
    ArchiveBuilder::new().build_with(root, destination, overrides)
}
