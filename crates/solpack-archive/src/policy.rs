//! Entry inclusion policy
//!
//! Decides which walked paths are left out of an archive. An entry whose name
//! is on either list is dropped together with everything below it.

use std::ffi::OsStr;

/// Base names never archived
pub const DEFAULT_EXCLUDE_NAMES: &[&str] = &[".DS_Store", ".tag"];

/// Directory names whose whole subtree is never archived
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git"];

/// Which entries of a solution tree go into the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionPolicy {
    exclude_names: Vec<String>,
    exclude_dirs: Vec<String>,
}

impl Default for InclusionPolicy {
    fn default() -> Self {
        Self {
            exclude_names: DEFAULT_EXCLUDE_NAMES.iter().map(ToString::to_string).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl InclusionPolicy {
    /// Policy with the default denylists
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the base-name denylist
    #[must_use]
    pub fn with_exclude_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the excluded directory names
    #[must_use]
    pub fn with_exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    #[must_use]
    pub fn exclude_names(&self) -> &[String] {
        &self.exclude_names
    }

    #[inline]
    #[must_use]
    pub fn exclude_dirs(&self) -> &[String] {
        &self.exclude_dirs
    }

    /// Check a single walked entry by its own name
    ///
    /// A directory-list name excludes entries of any type, so a `.git` file
    /// (worktree link) is dropped too.
    #[must_use]
    pub fn excludes_name(&self, name: &OsStr) -> bool {
        let Some(name) = name.to_str() else {
            return false;
        };
        self.exclude_dirs.iter().any(|d| d == name)
            || self.exclude_names.iter().any(|n| n == name)
    }
}
