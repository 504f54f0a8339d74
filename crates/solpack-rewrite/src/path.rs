//! Document paths for diagnostics
//!
//! Provides [`DocPath`], the dotted/indexed address of a node inside a
//! decoded document, e.g. `spec.ports[2].name`.

use std::fmt::{self, Display, Formatter};

/// Path of a node within a document tree
///
/// Map children append `.key` (just `key` at the root); list children append
/// `[index]`.
///
/// # Examples
/// - root → `""`
/// - key `a` under root → `a`
/// - index 2 under `a.b` → `a.b[2]`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocPath(String);

impl DocPath {
    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path of a map child
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            let mut path = String::with_capacity(self.0.len() + key.len() + 1);
            path.push_str(&self.0);
            path.push('.');
            path.push_str(key);
            Self(path)
        }
    }

    /// Path of a list child
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Rendered path
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for DocPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl AsRef<str> for DocPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
