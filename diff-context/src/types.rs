//! Shapes shared by the parser and the context expander.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Added-line text per file, in first-seen file order.
pub type AddedText = IndexMap<String, Vec<String>>;

/// 0-based added-line positions (new-file coordinates) per file.
pub type AddedLines = IndexMap<String, Vec<usize>>;

/// Full file bytes at the head branch tip, keyed by repo-relative path.
pub type FileSnapshot = HashMap<String, Vec<u8>>;

/// Context windows per file, one per changed line, in input order.
pub type ContextBlob = IndexMap<String, Vec<String>>;

/// Lines of context kept on each side of a changed line.
pub const DEFAULT_WINDOW_RADIUS: usize = 2;
