//! Isolation transform
//!
//! Converts a solution from pseudo-isolation (the solution name embedded in
//! its identifiers, optionally carrying a templated suffix) to native
//! isolation (a fixed, system-assigned placeholder).
//!
//! ```text
//! manifest.name     fleet${$TAG}              -> fleet
//! objects[0].type   fleet:ship                -> ${sys.solutionId}:ship
//! ships.json  .id   fleet | ${$SOLUTION_NAME} -> ${sys.solutionId}
//! ```
//!
//! The reverse direction is not implemented and always fails with
//! [`IsolationError::Unsupported`].

use crate::error::{IsolationError, IsolationResult, RewriteError, RewriteResult};
use crate::path::DocPath;
use crate::rewriter::{rewrite, Edit, EditRule, Rewriter};
use regex::Regex;
use serde::Serialize;
use solpack_codec::GenericValue;
use solpack_model::SolutionDirectoryContents;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Templated suffix appended to a pseudo-isolated solution name
pub const PSEUDO_ISOLATION_SUFFIX: &str = "${$TAG}";

/// Cross-reference standing for the solution's own name
pub const SELF_REFERENCE: &str = "${$SOLUTION_NAME}";

/// Placeholder substituted for the solution's identity under native isolation
pub const NATIVE_PLACEHOLDER: &str = "${sys.solutionId}";

/// Maximum length of a solution base name
pub const MAX_NAME_LEN: usize = 25;

/// Target isolation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationDirection {
    /// Platform-assigned isolation through [`NATIVE_PLACEHOLDER`]
    Native,
    /// Name-embedding isolation through [`PSEUDO_ISOLATION_SUFFIX`]
    Pseudo,
}

impl Display for IsolationDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Pseudo => f.write_str("pseudo"),
        }
    }
}

impl FromStr for IsolationDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::Native),
            "pseudo" => Ok(Self::Pseudo),
            other => Err(format!("unknown isolation direction '{other}'")),
        }
    }
}

/// One reported replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// Root-relative file name
    pub file: String,
    /// Document path of the value
    pub path: String,
    pub old: String,
    pub new: String,
}

impl Display for Change {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.path, self.old, self.new)
    }
}

/// Outcome of an isolation transform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsolationReport {
    /// Replacements made in the manifest
    pub manifest_replacements: usize,
    /// Replacements made across solution files
    pub file_replacements: usize,
    /// Every individual replacement, in application order
    pub changes: Vec<Change>,
    /// Files skipped because they are neither JSON nor YAML
    pub skipped: Vec<String>,
}

impl IsolationReport {
    /// Total replacements
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.manifest_replacements + self.file_replacements
    }
}

/// Strip the pseudo-isolation suffix from a manifest name
///
/// Returns the base name and whether the suffix was present.
#[must_use]
pub fn strip_pseudo_isolation(name: &str) -> (&str, bool) {
    match name.strip_suffix(PSEUDO_ISOLATION_SUFFIX) {
        Some(base) => (base, true),
        None => (name, false),
    }
}

/// Check a base name against the solution name syntax
///
/// A name starts with a lowercase ASCII letter, continues with lowercase
/// letters or digits, and is at most [`MAX_NAME_LEN`] characters long.
///
/// # Errors
/// Returns [`IsolationError::InvalidName`] describing the first violation
pub fn validate_solution_name(name: &str) -> IsolationResult<()> {
    let Some(first) = name.chars().next() else {
        return Err(IsolationError::invalid_name(name, "name is empty"));
    };
    if name.len() > MAX_NAME_LEN {
        return Err(IsolationError::invalid_name(
            name,
            format!("longer than {MAX_NAME_LEN} characters"),
        ));
    }
    if !first.is_ascii_lowercase() {
        return Err(IsolationError::invalid_name(
            name,
            "must start with a lowercase letter",
        ));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
    {
        return Err(IsolationError::invalid_name(
            name,
            format!("invalid character '{bad}'"),
        ));
    }
    Ok(())
}

/// Build the matcher for a base name
///
/// Matches the name as a whole word, or the literal [`SELF_REFERENCE`].
///
/// # Errors
/// Returns [`IsolationError::Pattern`] if the expression fails to compile
pub fn name_matcher(base_name: &str) -> IsolationResult<Regex> {
    let pattern = format!(
        r"\b{}\b|{}",
        regex::escape(base_name),
        regex::escape(SELF_REFERENCE)
    );
    Ok(Regex::new(&pattern)?)
}

/// Convert `contents` to the requested isolation scheme
///
/// # Errors
/// - [`IsolationError::Unsupported`] for [`IsolationDirection::Pseudo`]
/// - any error from [`IsolationTransform`]
pub fn convert(
    contents: &mut SolutionDirectoryContents,
    direction: IsolationDirection,
) -> IsolationResult<IsolationReport> {
    match direction {
        IsolationDirection::Native => IsolationTransform::for_contents(contents)?.apply(contents),
        IsolationDirection::Pseudo => Err(IsolationError::Unsupported(direction)),
    }
}

/// Pseudo → native isolation transform for one solution
#[derive(Debug, Clone)]
pub struct IsolationTransform {
    base_name: String,
    matcher: Regex,
}

impl IsolationTransform {
    /// Prepare a transform from the manifest name
    ///
    /// # Errors
    /// Returns [`IsolationError::InvalidName`] if the stripped name fails
    /// validation
    pub fn new(manifest_name: &str) -> IsolationResult<Self> {
        let (base, _) = strip_pseudo_isolation(manifest_name);
        validate_solution_name(base)?;
        Ok(Self {
            base_name: base.to_string(),
            matcher: name_matcher(base)?,
        })
    }

    /// Prepare a transform for loaded contents
    ///
    /// # Errors
    /// See [`new`](Self::new)
    pub fn for_contents(contents: &SolutionDirectoryContents) -> IsolationResult<Self> {
        Self::new(&contents.manifest().name)
    }

    #[inline]
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    #[inline]
    #[must_use]
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Apply to the manifest, then to every file
    ///
    /// Buffers are rewritten in memory only.
    ///
    /// # Errors
    /// Fails on the first malformed document or model error; the contents may
    /// then be partially rewritten and should be discarded.
    pub fn apply(
        &self,
        contents: &mut SolutionDirectoryContents,
    ) -> IsolationResult<IsolationReport> {
        let mut changes = Vec::new();
        let manifest_replacements = self.edit_manifest(contents, &mut changes)?;
        let mut report = IsolationReport {
            manifest_replacements,
            changes,
            ..IsolationReport::default()
        };
        report.file_replacements = self.edit_files(contents, &mut report)?;

        tracing::info!(
            solution = %self.base_name,
            manifest = report.manifest_replacements,
            files = report.file_replacements,
            "isolation transform complete"
        );
        Ok(report)
    }

    /// Strip the suffix and retarget object types in the manifest
    ///
    /// # Errors
    /// Fails if the manifest cannot be decoded or re-encoded
    pub fn edit_manifest(
        &self,
        contents: &mut SolutionDirectoryContents,
        changes: &mut Vec<Change>,
    ) -> IsolationResult<usize> {
        let codec = *contents.codec();
        let encoding = contents.manifest_format().encoding();
        let file_name = contents.manifest_file().name().to_string();
        let mut tree = codec
            .decode(contents.manifest_file().contents(), encoding)
            .map_err(|e| RewriteError::codec(&file_name, e))?;

        let mut count = 0;

        if let Some(GenericValue::String(name)) = tree.get_mut("name") {
            let (base, had_suffix) = strip_pseudo_isolation(name);
            if had_suffix {
                let change = Change {
                    file: file_name.clone(),
                    path: "name".to_string(),
                    old: name.clone(),
                    new: base.to_string(),
                };
                tracing::info!("{change}");
                *name = change.new.clone();
                changes.push(change);
                count += 1;
            }
        }

        if let Some(GenericValue::Sequence(objects)) = tree.get_mut("objects") {
            for (i, object) in objects.iter_mut().enumerate() {
                let Some(object_type) = object.get_mut("type") else {
                    continue;
                };
                let path = DocPath::root().key("objects").index(i).key("type");
                let mut rule = |file: &str, path: &str, old: &str| -> RewriteResult<Edit> {
                    let (new, replaced) = retarget_type(&self.matcher, old);
                    if replaced == 0 {
                        return Ok(Edit::Keep);
                    }
                    let change = Change {
                        file: file.to_string(),
                        path: path.to_string(),
                        old: old.to_string(),
                        new: new.clone(),
                    };
                    tracing::info!("{change}");
                    changes.push(change);
                    Ok(Edit::Replace(new))
                };
                count += rewrite(object_type, &path, &file_name, &self.matcher, &mut rule)?;
            }
        }

        if count > 0 {
            let bytes = codec
                .encode(&tree, encoding)
                .map_err(|e| RewriteError::codec(&file_name, e))?;
            contents.replace_manifest_contents(bytes)?;
        }
        Ok(count)
    }

    /// Rewrite whole-value occurrences in every visible JSON/YAML file
    ///
    /// Files of any other encoding are recorded in `report.skipped`.
    ///
    /// # Errors
    /// Fails on the first malformed document
    pub fn edit_files(
        &self,
        contents: &mut SolutionDirectoryContents,
        report: &mut IsolationReport,
    ) -> IsolationResult<usize> {
        let rewriter = Rewriter::new(*contents.codec());
        let mut rule = WholeValueRule {
            base_name: &self.base_name,
            changes: &mut report.changes,
        };
        let mut count = 0;

        for file in contents.files_mut() {
            if file.is_hidden() {
                continue;
            }
            if !file.encoding().is_structured() {
                tracing::warn!("skipping {}: not a JSON or YAML file", file.name());
                report.skipped.push(file.name().to_string());
                continue;
            }
            count += rewriter.rewrite_file(file, &self.matcher, &mut rule)?;
        }
        Ok(count)
    }
}

/// Substitute the placeholder for every name match in an object type
///
/// Matches inside a placeholder already present are left alone, so a solution
/// named `sys` converts once. Returns the new text and the replacement count.
fn retarget_type(matcher: &Regex, old: &str) -> (String, usize) {
    let placeholders: Vec<_> = old
        .match_indices(NATIVE_PLACEHOLDER)
        .map(|(start, p)| start..start + p.len())
        .collect();

    let mut new = String::with_capacity(old.len());
    let mut last = 0;
    let mut replaced = 0;
    for m in matcher.find_iter(old) {
        if placeholders.iter().any(|p| m.start() < p.end && p.start < m.end()) {
            continue;
        }
        new.push_str(&old[last..m.start()]);
        new.push_str(NATIVE_PLACEHOLDER);
        last = m.end();
        replaced += 1;
    }
    new.push_str(&old[last..]);
    (new, replaced)
}

/// Replaces a value only when it is exactly the base name or the
/// self-reference; values merely containing the name are kept.
struct WholeValueRule<'a> {
    base_name: &'a str,
    changes: &'a mut Vec<Change>,
}

impl EditRule for WholeValueRule<'_> {
    fn edit(&mut self, file: &str, path: &str, old: &str) -> RewriteResult<Edit> {
        if old != self.base_name && old != SELF_REFERENCE {
            tracing::debug!("{file}: {path}: '{old}' mentions the solution name, left unchanged");
            return Ok(Edit::Keep);
        }

        let change = Change {
            file: file.to_string(),
            path: path.to_string(),
            old: old.to_string(),
            new: NATIVE_PLACEHOLDER.to_string(),
        };
        tracing::info!("{file}: {change}");
        self.changes.push(change);
        Ok(Edit::Replace(NATIVE_PLACEHOLDER.to_string()))
    }
}
