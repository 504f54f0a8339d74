//! Testing utilities for solpack workspace
//!
//! Shared fixtures for building solution directories on disk.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for an on-disk solution directory
///
/// The solution lives at `<tempdir>/<name>` so archive entry names start with
/// `name`.
#[derive(Debug, Clone)]
pub struct SolutionFixture {
    name: String,
    files: Vec<(String, Vec<u8>)>,
    dirs: Vec<String>,
}

impl SolutionFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            dirs: Vec::new(),
        }
    }

    pub fn manifest_json(self, contents: &str) -> Self {
        self.file("manifest.json", contents)
    }

    pub fn manifest_yaml(self, contents: &str) -> Self {
        self.file("manifest.yaml", contents)
    }

    /// Add a file at a forward-slash path relative to the solution root
    pub fn file(mut self, rel: &str, contents: impl AsRef<[u8]>) -> Self {
        self.files.push((rel.to_string(), contents.as_ref().to_vec()));
        self
    }

    /// Add an empty directory
    pub fn dir(mut self, rel: &str) -> Self {
        self.dirs.push(rel.to_string());
        self
    }

    pub fn build(self) -> BuiltFixture {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path().join(&self.name);
        std::fs::create_dir_all(&root).expect("create solution root");

        for dir in &self.dirs {
            std::fs::create_dir_all(root.join(dir)).expect("create fixture dir");
        }
        for (rel, contents) in &self.files {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create fixture parent");
            }
            std::fs::write(&path, contents).expect("write fixture file");
        }

        BuiltFixture { temp, root }
    }
}

/// A materialized fixture; the directory is removed on drop
#[derive(Debug)]
pub struct BuiltFixture {
    temp: TempDir,
    root: PathBuf,
}

impl BuiltFixture {
    /// Solution root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Temporary directory holding the solution root
    pub fn parent(&self) -> &Path {
        self.temp.path()
    }

    pub fn read(&self, rel: &str) -> Vec<u8> {
        std::fs::read(self.root.join(rel)).expect("read fixture file")
    }
}

/// Minimal valid JSON manifest for `name`
pub fn json_manifest(name: &str) -> String {
    format!(r#"{{"name": "{name}", "solutionVersion": "1.0.0", "manifestVersion": "1.1.0"}}"#)
}

/// Minimal valid YAML manifest for `name`
pub fn yaml_manifest(name: &str) -> String {
    format!("name: {name}\nsolutionVersion: 1.0.0\nmanifestVersion: 1.1.0\n")
}
