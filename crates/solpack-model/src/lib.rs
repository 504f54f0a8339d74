//! solpack Content Model
//!
//! In-memory representation of a solution directory: one manifest, the root
//! files and every subdirectory, each file tagged with its kind, object type
//! and encoding.
//!
//! # Core Concepts
//!
//! - [`SolutionDirectoryContents`]: aggregate root, built by scanning disk once
//! - [`Manifest`]: typed view of `manifest.json` / `manifest.yaml`
//! - [`SolutionFile`]: one file with a mutable in-memory buffer
//! - [`Fingerprint`]: 32-byte Blake3 digest of file contents
//!
//! # Example
//!
//! ```rust,ignore
//! use solpack_model::SolutionDirectoryContents;
//!
//! let contents = SolutionDirectoryContents::load("./fleet")?;
//! println!("{} v{}", contents.manifest().name, contents.manifest().solution_version);
//! for file in contents.visible_files() {
//!     println!("{} ({})", file.name(), file.encoding());
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod contents;
mod error;
mod file;
mod fingerprint;
mod manifest;

pub use contents::{SolutionDirectoryContents, SolutionSubDirectory};
pub use error::{ModelError, ModelResult};
pub use file::{FileKind, FileSummary, SolutionFile};
pub use fingerprint::Fingerprint;
pub use manifest::{Manifest, ManifestFormat, ManifestObject};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
