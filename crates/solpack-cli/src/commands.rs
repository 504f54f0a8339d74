//! Subcommand implementations
//!
//! Each command writes its human-readable result to `out`; diagnostics go
//! through `tracing`.

use crate::config::SolpackConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use solpack_archive::ArchiveHandle;
use solpack_model::{FileKind, FileSummary, ManifestFormat, SolutionDirectoryContents};
use solpack_rewrite::{convert, IsolationDirection, IsolationReport};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Archive a solution directory as it is on disk
///
/// # Errors
/// Fails if the archive cannot be built or the summary cannot be written
pub fn package(
    config: &SolpackConfig,
    dir: &Path,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<ArchiveHandle> {
    let handle = config
        .archive_builder()
        .build(dir, output)
        .with_context(|| format!("failed to package {}", dir.display()))?;

    write_handle(&handle, out)?;
    Ok(handle)
}

/// Options for [`isolate`]
#[derive(Debug, Clone)]
pub struct IsolateOptions {
    pub direction: IsolationDirection,
    /// Persist modified buffers to their files
    pub write: bool,
    /// Archive the converted solution here
    pub output: Option<PathBuf>,
}

/// Convert a solution's isolation scheme
///
/// Without `write` or `output` this is a dry run that only reports changes.
///
/// # Errors
/// Fails on load, conversion, write-back or archive errors
pub fn isolate(
    config: &SolpackConfig,
    dir: &Path,
    options: &IsolateOptions,
    out: &mut impl Write,
) -> Result<IsolationReport> {
    let mut contents = SolutionDirectoryContents::load_with(dir, config.codec())
        .with_context(|| format!("failed to load solution {}", dir.display()))?;

    let report = convert(&mut contents, options.direction).with_context(|| {
        format!(
            "failed to convert {} to {} isolation",
            dir.display(),
            options.direction
        )
    })?;

    let mut current: Option<&str> = None;
    for change in &report.changes {
        if current != Some(change.file.as_str()) {
            writeln!(out, "{}", change.file)?;
            current = Some(change.file.as_str());
        }
        writeln!(out, "  {change}")?;
    }
    for skipped in &report.skipped {
        writeln!(out, "skipped {skipped}: not JSON or YAML")?;
    }
    writeln!(
        out,
        "{} replacements ({} in manifest, {} in files)",
        report.total(),
        report.manifest_replacements,
        report.file_replacements
    )?;

    if options.write {
        let written = contents.write_back().context("failed to write converted files")?;
        writeln!(out, "wrote {written} files")?;
    }

    if let Some(output) = &options.output {
        let handle = config
            .archive_builder()
            .build_with(contents.root(), Some(output), &contents.overrides())
            .with_context(|| format!("failed to package {}", dir.display()))?;
        write_handle(&handle, out)?;
    }

    Ok(report)
}

/// Serializable view of a loaded solution
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub root: PathBuf,
    pub name: String,
    pub solution_version: String,
    pub manifest_format: ManifestFormat,
    pub files: Vec<FileSummary>,
}

impl InspectReport {
    #[must_use]
    pub fn from_contents(contents: &SolutionDirectoryContents) -> Self {
        Self {
            root: contents.root().to_path_buf(),
            name: contents.manifest().name.clone(),
            solution_version: contents.manifest().solution_version.clone(),
            manifest_format: contents.manifest_format(),
            files: contents.visible_files().map(|f| f.summary()).collect(),
        }
    }
}

/// Print the content model of a solution
///
/// # Errors
/// Fails if the solution cannot be loaded or the output cannot be written
pub fn inspect(
    config: &SolpackConfig,
    dir: &Path,
    json: bool,
    out: &mut impl Write,
) -> Result<InspectReport> {
    let contents = SolutionDirectoryContents::load_with(dir, config.codec())
        .with_context(|| format!("failed to load solution {}", dir.display()))?;
    let report = InspectReport::from_contents(&contents);

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(report);
    }

    writeln!(
        out,
        "{} {} ({})",
        report.name,
        report.solution_version,
        report.manifest_format.file_name()
    )?;
    for file in &report.files {
        writeln!(
            out,
            "  {:<40} {:<5} {:<8} {:<16} {}",
            file.name,
            file.encoding.to_string(),
            kind_label(file.kind),
            file.fingerprint.short(),
            file.object_type
        )?;
    }
    Ok(report)
}

fn kind_label(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Hidden => "hidden",
        FileKind::Known => "known",
        FileKind::Unknown => "unknown",
    }
}

fn write_handle(handle: &ArchiveHandle, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", handle.path.display())?;
    writeln!(
        out,
        "{} entries, {} bytes, blake3 {}",
        handle.entries, handle.size, handle.fingerprint
    )?;
    Ok(())
}
