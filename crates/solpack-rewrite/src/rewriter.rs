//! Path-aware rewriter
//!
//! Walks a [`GenericValue`] depth-first, tests every string leaf with a
//! [`Matcher`] and lets an [`EditRule`] decide what happens to matches.
//!
//! # Contract
//! - Only string leaves are tested; numbers, booleans and null pass through.
//! - Map keys, list length and list order never change.
//! - The returned count is the number of [`Edit::Replace`] results; it is not
//!   inferred by diffing.
//! - [`Rewriter::rewrite_file`] never re-encodes a document with zero
//!   replacements, so untouched files keep their exact bytes.

use crate::error::{RewriteError, RewriteResult};
use crate::path::DocPath;
use regex::Regex;
use solpack_codec::{Codec, GenericValue};
use solpack_model::SolutionFile;

/// Decision of an edit rule for one matched leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Leave the value and do not count it
    Keep,
    /// Store the value and count one replacement, even if unchanged
    Replace(String),
}

/// Predicate selecting string leaves for the edit rule
pub trait Matcher {
    /// Check if `value` should be handed to the edit rule
    fn is_match(&self, value: &str) -> bool;
}

impl Matcher for Regex {
    fn is_match(&self, value: &str) -> bool {
        Regex::is_match(self, value)
    }
}

/// Matcher backed by a closure
#[derive(Debug, Clone, Copy)]
pub struct MatchFn<F>(pub F);

impl<F> Matcher for MatchFn<F>
where
    F: Fn(&str) -> bool,
{
    fn is_match(&self, value: &str) -> bool {
        (self.0)(value)
    }
}

/// Rule deciding the new value of a matched leaf
///
/// Receives the file name, the leaf's [`DocPath`] rendering and the old
/// value. Returning an error aborts the whole rewrite.
pub trait EditRule {
    /// Decide the edit for one matched leaf
    ///
    /// # Errors
    /// Implementations return [`RewriteError::Rule`] to abort the rewrite
    fn edit(&mut self, file: &str, path: &str, old: &str) -> RewriteResult<Edit>;
}

impl<F> EditRule for F
where
    F: FnMut(&str, &str, &str) -> RewriteResult<Edit>,
{
    fn edit(&mut self, file: &str, path: &str, old: &str) -> RewriteResult<Edit> {
        self(file, path, old)
    }
}

/// Rewrite every matching string leaf under `value` in place
///
/// `base` is the path of `value` itself; pass [`DocPath::root`] for a whole
/// document. Returns the number of replacements signalled by `rule`.
///
/// # Errors
/// Propagates the first error returned by `rule`
pub fn rewrite<M, R>(
    value: &mut GenericValue,
    base: &DocPath,
    file: &str,
    matcher: &M,
    rule: &mut R,
) -> RewriteResult<usize>
where
    M: Matcher + ?Sized,
    R: EditRule + ?Sized,
{
    match value {
        GenericValue::String(s) => {
            if !matcher.is_match(s) {
                return Ok(0);
            }
            tracing::trace!(file, path = %base, value = %s, "matched");
            match rule.edit(file, base.as_str(), s)? {
                Edit::Replace(new) => {
                    *s = new;
                    Ok(1)
                }
                Edit::Keep => Ok(0),
            }
        }
        GenericValue::Sequence(items) => {
            let mut count = 0;
            for (i, item) in items.iter_mut().enumerate() {
                count += rewrite(item, &base.index(i), file, matcher, rule)?;
            }
            Ok(count)
        }
        GenericValue::Mapping(map) => {
            let mut count = 0;
            for (key, child) in map.iter_mut() {
                count += rewrite(child, &base.key(&key_segment(key)), file, matcher, rule)?;
            }
            Ok(count)
        }
        GenericValue::Tagged(tagged) => rewrite(&mut tagged.value, base, file, matcher, rule),
        GenericValue::Null | GenericValue::Bool(_) | GenericValue::Number(_) => Ok(0),
    }
}

/// Render a map key as a path segment
fn key_segment(key: &GenericValue) -> String {
    match key {
        GenericValue::String(s) => s.clone(),
        GenericValue::Number(n) => n.to_string(),
        GenericValue::Bool(b) => b.to_string(),
        GenericValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Whole-file rewriter
///
/// Decodes with the file's encoding, rewrites, and re-encodes only when the
/// rule signalled at least one replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rewriter {
    codec: Codec,
}

impl Rewriter {
    /// Create rewriter using `codec` for both directions
    #[inline]
    #[must_use]
    pub fn new(codec: Codec) -> Self {
        Self { codec }
    }

    #[inline]
    #[must_use]
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Rewrite one file in place
    ///
    /// Returns the replacement count. With a zero count the buffer is left
    /// byte-for-byte untouched.
    ///
    /// # Errors
    /// - [`RewriteError::UnsupportedEncoding`] for non-JSON/YAML files
    /// - [`RewriteError::Codec`] if the file is malformed
    /// - any error from `rule`
    pub fn rewrite_file<M, R>(
        &self,
        file: &mut SolutionFile,
        matcher: &M,
        rule: &mut R,
    ) -> RewriteResult<usize>
    where
        M: Matcher + ?Sized,
        R: EditRule + ?Sized,
    {
        let encoding = file.encoding();
        if !encoding.is_structured() {
            return Err(RewriteError::UnsupportedEncoding {
                file: file.name().to_string(),
                encoding,
            });
        }

        let mut tree = self
            .codec
            .decode(file.contents(), encoding)
            .map_err(|e| RewriteError::codec(file.name(), e))?;

        let count = rewrite(&mut tree, &DocPath::root(), file.name(), matcher, rule)?;
        if count == 0 {
            return Ok(0);
        }

        let bytes = self
            .codec
            .encode(&tree, encoding)
            .map_err(|e| RewriteError::codec(file.name(), e))?;
        file.replace_contents(bytes);
        tracing::debug!(file = file.name(), count, "rewrote document");
        Ok(count)
    }
}
