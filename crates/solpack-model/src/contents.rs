//! Solution directory contents
//!
//! [`SolutionDirectoryContents`] is built by one scan of a solution root. It
//! owns every file it lists; callers decide whether mutated buffers go back to
//! disk ([`write_back`](SolutionDirectoryContents::write_back)) or into an
//! archive ([`overrides`](SolutionDirectoryContents::overrides)).

use crate::error::{ModelError, ModelResult};
use crate::file::SolutionFile;
use crate::manifest::{Manifest, ManifestFormat};
use solpack_codec::Codec;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One subdirectory of the solution and its direct files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionSubDirectory {
    name: String,
    files: Vec<SolutionFile>,
}

impl SolutionSubDirectory {
    /// Create an empty subdirectory entry
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }

    /// Root-relative path, forward-slash separated
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn files(&self) -> &[SolutionFile] {
        &self.files
    }

    #[inline]
    pub fn files_mut(&mut self) -> &mut [SolutionFile] {
        &mut self.files
    }
}

/// Aggregate root for a loaded solution directory
#[derive(Debug, Clone)]
pub struct SolutionDirectoryContents {
    root: PathBuf,
    codec: Codec,
    manifest: Manifest,
    manifest_format: ManifestFormat,
    manifest_file: SolutionFile,
    root_files: Vec<SolutionFile>,
    sub_directories: Vec<SolutionSubDirectory>,
}

impl SolutionDirectoryContents {
    /// Scan `root` with the default codec
    ///
    /// # Errors
    /// See [`load_with`](Self::load_with)
    pub fn load(root: impl AsRef<Path>) -> ModelResult<Self> {
        Self::load_with(root, Codec::default())
    }

    /// Scan `root`, decoding the manifest with `codec`
    ///
    /// Hidden directories (including version-control metadata) are skipped
    /// entirely. Hidden files are kept but flagged [`FileKind::Hidden`].
    ///
    /// # Errors
    /// - [`ModelError::NotASolutionRoot`] / [`ModelError::AmbiguousManifest`]
    ///   from manifest detection, or `NotASolutionRoot` when the manifest
    ///   cannot be read
    /// - [`ModelError::InvalidManifest`] if the manifest is malformed or lacks
    ///   a name/version
    /// - [`ModelError::Io`] on any read or walk failure
    ///
    /// [`FileKind::Hidden`]: crate::FileKind::Hidden
    pub fn load_with(root: impl AsRef<Path>, codec: Codec) -> ModelResult<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest_format = ManifestFormat::detect(&root)?;
        let manifest_path = manifest_format.path_in(&root);

        let bytes = read_manifest(&manifest_path)?;
        let manifest = decode_manifest(&codec, &bytes, manifest_format, &manifest_path)?;
        let manifest_file = SolutionFile::new(manifest_format.file_name(), bytes);

        let mut root_files = Vec::new();
        let mut sub_directories: Vec<SolutionSubDirectory> = Vec::new();
        let mut dir_index: BTreeMap<String, usize> = BTreeMap::new();

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !(e.file_type().is_dir() && is_hidden(e.file_name()))
            });

        for entry in walker {
            let entry = entry.map_err(|e| ModelError::walk(&root, e))?;
            let rel = relative_name(&root, entry.path());

            if entry.file_type().is_dir() {
                dir_index.insert(rel.clone(), sub_directories.len());
                sub_directories.push(SolutionSubDirectory::new(rel));
                continue;
            }

            if entry.path_is_symlink() && !entry.path().is_file() {
                tracing::warn!("skipping symlink {}: target is not a file", entry.path().display());
                continue;
            }

            if rel == manifest_format.file_name() {
                continue;
            }

            let bytes =
                std::fs::read(entry.path()).map_err(|e| ModelError::io_error(entry.path(), e))?;
            let mut file = SolutionFile::new(rel.clone(), bytes);
            if let Some(object) = manifest.object_for(&rel) {
                file = file.with_object_type(object.object_type.clone());
            }

            match rel.rsplit_once('/') {
                Some((dir, _)) => {
                    let idx = dir_index.get(dir).copied().ok_or_else(|| {
                        ModelError::io_error(
                            entry.path(),
                            std::io::Error::new(
                                std::io::ErrorKind::NotFound,
                                "parent directory was not visited",
                            ),
                        )
                    })?;
                    sub_directories[idx].files.push(file);
                }
                None => root_files.push(file),
            }
        }

        tracing::debug!(
            root = %root.display(),
            root_files = root_files.len(),
            sub_directories = sub_directories.len(),
            "loaded solution directory"
        );

        Ok(Self {
            root,
            codec,
            manifest,
            manifest_format,
            manifest_file,
            root_files,
            sub_directories,
        })
    }

    /// Directory the contents were loaded from
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Codec used for the manifest and for rewriting
    #[inline]
    #[must_use]
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    #[inline]
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[inline]
    #[must_use]
    pub fn manifest_format(&self) -> ManifestFormat {
        self.manifest_format
    }

    /// Raw manifest file, including keys the typed view drops
    #[inline]
    #[must_use]
    pub fn manifest_file(&self) -> &SolutionFile {
        &self.manifest_file
    }

    /// Replace the manifest bytes and refresh the typed view
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidManifest`] if the new bytes do not decode
    /// to a valid manifest; the previous state is kept in that case.
    pub fn replace_manifest_contents(&mut self, bytes: Vec<u8>) -> ModelResult<()> {
        let path = self.manifest_format.path_in(&self.root);
        let manifest = decode_manifest(&self.codec, &bytes, self.manifest_format, &path)?;
        self.manifest = manifest;
        self.manifest_file.replace_contents(bytes);

        let manifest = &self.manifest;
        let files = self
            .root_files
            .iter_mut()
            .chain(self.sub_directories.iter_mut().flat_map(|d| d.files.iter_mut()));
        for file in files {
            let object_type = manifest.object_for(file.name()).map(|o| o.object_type.clone());
            file.set_object_type(object_type);
        }
        Ok(())
    }

    /// Root-level files (the manifest excluded)
    #[inline]
    #[must_use]
    pub fn root_files(&self) -> &[SolutionFile] {
        &self.root_files
    }

    #[inline]
    #[must_use]
    pub fn sub_directories(&self) -> &[SolutionSubDirectory] {
        &self.sub_directories
    }

    /// All files, root first then each subdirectory in scan order
    pub fn files(&self) -> impl Iterator<Item = &SolutionFile> {
        self.root_files
            .iter()
            .chain(self.sub_directories.iter().flat_map(|d| d.files.iter()))
    }

    /// All non-hidden files
    pub fn visible_files(&self) -> impl Iterator<Item = &SolutionFile> {
        self.files().filter(|f| !f.is_hidden())
    }

    /// Mutable access to all files
    pub fn files_mut(&mut self) -> impl Iterator<Item = &mut SolutionFile> {
        self.root_files
            .iter_mut()
            .chain(self.sub_directories.iter_mut().flat_map(|d| d.files.iter_mut()))
    }

    /// Find a file by its root-relative name
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&SolutionFile> {
        if name == self.manifest_file.name() {
            return Some(&self.manifest_file);
        }
        self.files().find(|f| f.name() == name)
    }

    /// Modified buffers keyed by root-relative path, manifest included
    #[must_use]
    pub fn overrides(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        std::iter::once(&self.manifest_file)
            .chain(self.files())
            .filter(|f| f.is_modified())
            .map(|f| (PathBuf::from(f.name()), f.contents().to_vec()))
            .collect()
    }

    /// Write every modified buffer back to its file
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    /// Returns [`ModelError::Io`] on the first failed write
    pub fn write_back(&self) -> ModelResult<usize> {
        let mut written = 0;
        for file in std::iter::once(&self.manifest_file).chain(self.files()) {
            if !file.is_modified() {
                continue;
            }
            let path = self.root.join(file.name());
            std::fs::write(&path, file.contents()).map_err(|e| ModelError::io_error(&path, e))?;
            tracing::info!("wrote {}", path.display());
            written += 1;
        }
        Ok(written)
    }
}

/// A manifest that detection found but that cannot be read means there is
/// no usable solution at the root
pub(crate) fn read_manifest(path: &Path) -> ModelResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| ModelError::NotASolutionRoot {
        path: path.to_path_buf(),
        source: Some(source),
    })
}

fn decode_manifest(
    codec: &Codec,
    bytes: &[u8],
    format: ManifestFormat,
    path: &Path,
) -> ModelResult<Manifest> {
    let manifest: Manifest = codec
        .decode_as(bytes, format.encoding())
        .map_err(|e| ModelError::invalid_manifest(path, e.to_string()))?;
    manifest.validate(path)?;
    Ok(manifest)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
