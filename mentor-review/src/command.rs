//! `@{handle} run [filters...]` comment commands.

use indexmap::IndexMap;

/// A review request found in a PR comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewCommand {
    /// Path substrings; empty means "every changed file".
    pub filters: Vec<String>,
}

/// Control whitespace removed before matching; plain spaces are kept.
const STRIPPED: [char; 5] = ['\t', '\n', '\r', '\x0b', '\x0c'];

/// Looks for `@{handle} run` in a comment body.
///
/// Control whitespace is removed first, so a mention split over lines still
/// counts. Every other space-separated token in the comment becomes a filter.
pub fn parse_command(body: &str, handle: &str) -> Option<ReviewCommand> {
    let flat: String = body.chars().filter(|c| !STRIPPED.contains(c)).collect();
    let trigger = format!("@{handle} run");
    if !flat.contains(&trigger) {
        return None;
    }

    let filters = flat
        .replace(&trigger, "")
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    Some(ReviewCommand { filters })
}

/// Keeps entries whose path contains any filter; no filters keeps all.
pub fn filter_files<V>(files: IndexMap<String, V>, filters: &[String]) -> IndexMap<String, V> {
    if filters.is_empty() {
        return files;
    }
    files
        .into_iter()
        .filter(|(path, _)| filters.iter().any(|f| path.contains(f.as_str())))
        .collect()
}
