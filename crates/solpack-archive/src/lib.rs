//! solpack Archive
//!
//! Packages a solution directory into a zip archive rooted at the
//! directory's name, optionally substituting rewritten in-memory buffers for
//! the bytes on disk.
//!
//! # Core Concepts
//!
//! - [`ArchiveBuilder`]: policy + compression, produces an [`ArchiveHandle`]
//! - [`InclusionPolicy`]: version-control directories and denylisted names
//! - [`absolutize`]: `~` expansion, cwd resolution, lexical cleanup
//!
//! # Example
//!
//! ```rust,ignore
//! use solpack_archive::build_archive;
//! use std::path::Path;
//!
//! let handle = build_archive(Path::new("./fleet"), Some(Path::new("/tmp")))?;
//! println!("{} ({} entries)", handle.path.display(), handle.entries);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod builder;
mod error;
mod paths;
mod policy;

pub use builder::{
    build_archive, build_archive_with, ArchiveBuilder, ArchiveHandle, Compression, Overrides,
};
pub use error::{ArchiveError, ArchiveResult};
pub use paths::{absolutize, clean, entry_name};
pub use policy::{InclusionPolicy, DEFAULT_EXCLUDE_DIRS, DEFAULT_EXCLUDE_NAMES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
