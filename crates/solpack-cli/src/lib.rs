//! solpack CLI
//!
//! Operator surface over the solpack libraries: configuration loading and the
//! `package`, `isolate` and `inspect` commands. The `solpack` binary is a thin
//! argument parser on top of this crate.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod config;

pub use commands::{inspect, isolate, package, InspectReport, IsolateOptions};
pub use config::{ConfigError, SolpackConfig, CONFIG_ENV};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
