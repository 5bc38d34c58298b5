//! Literal find-and-replace edits.
//!
//! Edits read the whole file, transform it in memory and write it back in
//! one piece, so a failed edit never leaves a partially patched file.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use textpatch_core::{Error, Result};

use crate::fileops::{read_text, store};

/// One substitution in an edit batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSpec {
    pub old_string: String,
    pub new_string: String,
}

impl EditSpec {
    pub fn new(old_string: impl Into<String>, new_string: impl Into<String>) -> Self {
        Self {
            old_string: old_string.into(),
            new_string: new_string.into(),
        }
    }
}

/// Outcome of a successful single edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub path: PathBuf,
    pub count: usize,
}

impl fmt::Display for Replaced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.count == 1 { "occurrence" } else { "occurrences" };
        write!(
            f,
            "Successfully replaced {} {} in {}",
            self.count,
            noun,
            self.path.display()
        )
    }
}

/// Outcome of a successful edit batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub path: PathBuf,
    pub edits: usize,
    /// Occurrences replaced across all steps.
    pub replacements: usize,
}

impl fmt::Display for Applied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.edits == 1 { "edit" } else { "edits" };
        write!(
            f,
            "Successfully applied {} {} to {}",
            self.edits,
            noun,
            self.path.display()
        )
    }
}

/// Parse a serialized edit batch.
pub fn parse_edits(raw: &str) -> Result<Vec<EditSpec>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| Error::InvalidJson(e.to_string()))?;
    edits_from_value(value)
}

/// Convert an already-parsed JSON value into a non-empty edit batch.
pub fn edits_from_value(value: Value) -> Result<Vec<EditSpec>> {
    let edits: Vec<EditSpec> =
        serde_json::from_value(value).map_err(|e| Error::InvalidEdits(e.to_string()))?;
    if edits.is_empty() {
        return Err(Error::NoEdits);
    }
    Ok(edits)
}

/// Non-overlapping occurrences of `needle`, scanning left to right.
///
/// An empty needle never matches.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Replace `old` in `content`, enforcing the uniqueness rule.
///
/// Returns the new content and the number of occurrences replaced.
pub fn replace_occurrences(
    content: &str,
    old: &str,
    new: &str,
    replace_all: bool,
) -> Result<(String, usize)> {
    let count = count_occurrences(content, old);
    match count {
        0 => Err(Error::StringNotFound(old.to_string())),
        1 => Ok((content.replacen(old, new, 1), 1)),
        _ if replace_all => Ok((content.replace(old, new), count)),
        _ => Err(Error::NotUnique {
            needle: old.to_string(),
            count,
        }),
    }
}

/// Apply a batch in order, each step seeing the previous step's result.
///
/// Every step replaces all of its occurrences. Fails on the first step
/// whose string is missing, naming its 1-based index.
pub fn apply_edits(content: &str, edits: &[EditSpec]) -> Result<(String, usize)> {
    let mut current = content.to_string();
    let mut replacements = 0;

    for (index, edit) in edits.iter().enumerate() {
        let (next, count) = replace_occurrences(&current, &edit.old_string, &edit.new_string, true)
            .map_err(|e| Error::edit_step(index + 1, e))?;
        current = next;
        replacements += count;
    }

    Ok((current, replacements))
}

/// Replace `old` with `new` in the file at `path`.
pub fn edit_file(path: &Path, old: &str, new: &str, replace_all: bool) -> Result<Replaced> {
    let content = read_text(path)?;
    let (updated, count) = replace_occurrences(&content, old, new, replace_all)?;
    store(path, &updated)?;

    tracing::info!(path = %path.display(), count, "Replaced occurrences");
    Ok(Replaced {
        path: path.to_path_buf(),
        count,
    })
}

/// Apply an edit batch to the file at `path`, writing only if every step succeeds.
pub fn multi_edit_file(path: &Path, edits: &[EditSpec]) -> Result<Applied> {
    if edits.is_empty() {
        return Err(Error::NoEdits);
    }

    let content = read_text(path)?;
    let (updated, replacements) = apply_edits(&content, edits).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Edit batch rejected");
        e
    })?;
    store(path, &updated)?;

    tracing::info!(
        path = %path.display(),
        edits = edits.len(),
        replacements,
        "Applied edit batch"
    );
    Ok(Applied {
        path: path.to_path_buf(),
        edits: edits.len(),
        replacements,
    })
}
