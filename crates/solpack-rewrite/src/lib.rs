//! solpack Rewrite
//!
//! Path-aware string rewriting over decoded JSON/YAML documents, and the
//! isolation transform built on it.
//!
//! # Core Concepts
//!
//! - [`rewrite`]: walk a [`GenericValue`](solpack_codec::GenericValue), hand
//!   every matching string to an [`EditRule`] with its [`DocPath`]
//! - [`Rewriter`]: decode, rewrite and re-encode one [`SolutionFile`](solpack_model::SolutionFile)
//! - [`IsolationTransform`]: pseudo → native isolation for a whole solution
//!
//! # Example
//!
//! ```rust,ignore
//! use solpack_model::SolutionDirectoryContents;
//! use solpack_rewrite::{convert, IsolationDirection};
//!
//! let mut contents = SolutionDirectoryContents::load("./fleet")?;
//! let report = convert(&mut contents, IsolationDirection::Native)?;
//! for change in &report.changes {
//!     println!("{}: {change}", change.file);
//! }
//! contents.write_back()?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod isolation;
mod path;
mod rewriter;

pub use error::{IsolationError, IsolationResult, RewriteError, RewriteResult};
pub use isolation::{
    convert, name_matcher, strip_pseudo_isolation, validate_solution_name, Change,
    IsolationDirection, IsolationReport, IsolationTransform, MAX_NAME_LEN, NATIVE_PLACEHOLDER,
    PSEUDO_ISOLATION_SUFFIX, SELF_REFERENCE,
};
pub use path::DocPath;
pub use rewriter::{rewrite, Edit, EditRule, MatchFn, Matcher, Rewriter};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
