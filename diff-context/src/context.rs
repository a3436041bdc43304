//! Expansion of changed line numbers into short context windows.
//!
//! For every changed line `n` of a file with `total` lines, the window is the
//! newline-joined slice `[max(n - r, 0), min(n + r + 1, total))`. Files are
//! split on `\n` only, so a trailing newline yields a final empty line.

use std::ops::Range;

use tracing::{debug, warn};

use crate::errors::{DiffContextError, DiffContextResult};
use crate::types::{AddedLines, ContextBlob, FileSnapshot};

/// Slice bounds of the window around line `n`, clamped to `[0, total)`.
///
/// A line past the end of the file yields an empty range at `total`.
pub fn window_bounds(n: usize, radius: usize, total: usize) -> Range<usize> {
    let end = n.saturating_add(radius).saturating_add(1).min(total);
    let start = n.saturating_sub(radius).min(end);
    start..end
}

/// Decodes one snapshot entry and cuts a window for each changed line.
fn windows_for_file(
    snapshot: &FileSnapshot,
    path: &str,
    lines: &[usize],
    radius: usize,
) -> DiffContextResult<Vec<String>> {
    let bytes = snapshot
        .get(path)
        .ok_or_else(|| DiffContextError::MissingFile {
            path: path.to_string(),
        })?;
    let text = std::str::from_utf8(bytes).map_err(|source| DiffContextError::Decode {
        path: path.to_string(),
        source,
    })?;

    let file_lines: Vec<&str> = text.split('\n').collect();
    let windows = lines
        .iter()
        .map(|&n| file_lines[window_bounds(n, radius, file_lines.len())].join("\n"))
        .collect();
    Ok(windows)
}

/// Expands every changed line into its context window, failing fast.
///
/// Files and windows keep the order of `changed`; repeated line numbers
/// produce repeated windows.
///
/// # Errors
/// The first [`DiffContextError::MissingFile`] or [`DiffContextError::Decode`]
/// encountered. No partial output is returned.
pub fn expand_context(
    snapshot: &FileSnapshot,
    changed: &AddedLines,
    radius: usize,
) -> DiffContextResult<ContextBlob> {
    let mut out = ContextBlob::with_capacity(changed.len());
    for (path, lines) in changed {
        let windows = windows_for_file(snapshot, path, lines, radius)?;
        out.insert(path.clone(), windows);
    }
    debug!(files = out.len(), radius, "context expanded");
    Ok(out)
}

/// Same as [`expand_context`] but keeps going past failing files.
///
/// Every file of `changed` is present in the result, in order, with either
/// its windows or the error that affected only that file.
pub fn expand_context_per_file(
    snapshot: &FileSnapshot,
    changed: &AddedLines,
    radius: usize,
) -> indexmap::IndexMap<String, DiffContextResult<Vec<String>>> {
    changed
        .iter()
        .map(|(path, lines)| {
            let result = windows_for_file(snapshot, path, lines, radius);
            if let Err(err) = &result {
                warn!(%path, error = %err, "context expansion failed for file");
            }
            (path.clone(), result)
        })
        .collect()
}
