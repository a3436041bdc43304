//! Diff-to-context extraction for pull-request reviews.
//!
//! 1) **Diff parser**: turns unified diff text into per-file added text
//!    ([`parse_added_text`]) or 0-based added-line positions
//!    ([`parse_added_line_numbers`]).
//! 2) **Context expander**: turns the positions plus a head-branch file
//!    snapshot into short per-line context windows ([`expand_context`]).
//!
//! Everything here is pure and synchronous; callers own all I/O.

pub mod context;
pub mod errors;
pub mod parser;
pub mod types;

pub use context::{expand_context, expand_context_per_file, window_bounds};
pub use errors::{DiffContextError, DiffContextResult};
pub use parser::{
    LineKind, LineNumberParser, ParserState, classify_line, parse_added_line_numbers,
    parse_added_text,
};
pub use types::{AddedLines, AddedText, ContextBlob, DEFAULT_WINDOW_RADIUS, FileSnapshot};
