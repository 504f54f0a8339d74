//! Path normalization and archive entry naming
//!
//! All paths are made absolute before use. Entry names are computed by
//! stripping the captured parent directory, so the process working directory
//! is never changed.

use crate::error::{ArchiveError, ArchiveResult};
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute
///
/// - a leading `~` expands to the home directory
/// - relative paths are resolved against the current working directory
/// - `.` and `..` components are removed lexically (symlinks are not
///   resolved)
///
/// # Errors
/// - [`ArchiveError::NoHomeDirectory`] if `~` cannot be expanded
/// - [`ArchiveError::Io`] if the working directory cannot be read
pub fn absolutize(path: &Path) -> ArchiveResult<PathBuf> {
    let expanded = expand_home(path)?;
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().map_err(|e| ArchiveError::io_error(".", e))?;
        cwd.join(expanded)
    };
    Ok(clean(&joined))
}

fn expand_home(path: &Path) -> ArchiveResult<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = dirs::home_dir().ok_or(ArchiveError::NoHomeDirectory)?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Remove `.` and resolve `..` without touching the filesystem
///
/// `..` never climbs above the root.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Archive entry name of `path` relative to `base`, forward-slash separated
///
/// # Errors
/// - [`ArchiveError::InvalidRoot`] if `path` is not under `base`
/// - [`ArchiveError::NonUtf8Path`] if a component is not UTF-8
pub fn entry_name(base: &Path, path: &Path) -> ArchiveResult<String> {
    let rel = path.strip_prefix(base).map_err(|_| ArchiveError::InvalidRoot {
        path: path.to_path_buf(),
    })?;

    let mut parts: Vec<&str> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                ArchiveError::NonUtf8Path {
                    path: path.to_path_buf(),
                }
            })?),
            _ => {
                return Err(ArchiveError::InvalidRoot {
                    path: path.to_path_buf(),
                })
            }
        }
    }
    Ok(parts.join("/"))
}
