//! Configuration file
//!
//! ```toml
//! [codec]
//! json_indent = 2
//!
//! [archive]
//! exclude_names = [".DS_Store", ".tag"]
//! exclude_dirs = [".git"]
//! compression = "deflated"
//! ```
//!
//! Every key is optional; missing keys take the built-in defaults.

use serde::{Deserialize, Serialize};
use solpack_archive::{
    ArchiveBuilder, Compression, InclusionPolicy, DEFAULT_EXCLUDE_DIRS, DEFAULT_EXCLUDE_NAMES,
};
use solpack_codec::{Codec, DEFAULT_JSON_INDENT};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "SOLPACK_CONFIG";

const APP_DIR: &str = "solpack";
const CONFIG_FILE: &str = "config.toml";

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Codec settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Spaces per JSON indentation level
    pub json_indent: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            json_indent: DEFAULT_JSON_INDENT,
        }
    }
}

/// Archive settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Base names left out of archives
    pub exclude_names: Vec<String>,
    /// Directory names whose subtrees are left out of archives
    pub exclude_dirs: Vec<String>,
    pub compression: Compression,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            exclude_names: DEFAULT_EXCLUDE_NAMES.iter().map(ToString::to_string).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(ToString::to_string).collect(),
            compression: Compression::default(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolpackConfig {
    pub codec: CodecConfig,
    pub archive: ArchiveConfig,
}

impl SolpackConfig {
    /// Parse TOML text; `origin` only labels errors
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a config file
    ///
    /// # Errors
    /// - [`ConfigError::Read`] if the file cannot be read
    /// - [`ConfigError::Parse`] if it does not parse
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text, path)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the effective configuration
    ///
    /// An explicit path must exist. Otherwise the per-user file
    /// (`<config dir>/solpack/config.toml`) is used when present, and the
    /// defaults when not.
    ///
    /// # Errors
    /// See [`load`](Self::load)
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn with_json_indent(mut self, indent: usize) -> Self {
        self.codec.json_indent = indent;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.archive.compression = compression;
        self
    }

    #[must_use]
    pub fn with_exclude_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.archive.exclude_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.archive.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Codec configured with these settings
    #[must_use]
    pub fn codec(&self) -> Codec {
        Codec::new().with_json_indent(self.codec.json_indent)
    }

    /// Archive builder configured with these settings
    #[must_use]
    pub fn archive_builder(&self) -> ArchiveBuilder {
        let policy = InclusionPolicy::new()
            .with_exclude_names(self.archive.exclude_names.iter().cloned())
            .with_exclude_dirs(self.archive.exclude_dirs.iter().cloned());
        ArchiveBuilder::new()
            .with_policy(policy)
            .with_compression(self.archive.compression)
    }
}

/// Per-user config file location, if the platform has a config directory
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
