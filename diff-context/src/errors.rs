//! Crate-wide error hierarchy for diff-context.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type DiffContextResult<T> = Result<T, DiffContextError>;

/// Root error type for the diff-context crate.
///
/// Both parser entry points are total over well-formed diff text; only the
/// variants below can be raised.
#[derive(Debug, Error)]
pub enum DiffContextError {
    /// A `@@` hunk header without a parsable `+<start>[,<count>]` range.
    #[error("malformed hunk header at diff line {line}: {header:?}")]
    MalformedDiff {
        /// 1-based line number inside the diff text.
        line: usize,
        /// The offending header line, verbatim.
        header: String,
    },

    /// A changed file has no entry in the head-branch snapshot.
    #[error("file {path:?} is missing from the snapshot")]
    MissingFile { path: String },

    /// The snapshot bytes of a file are not valid UTF-8.
    #[error("file {path:?} is not valid UTF-8: {source}")]
    Decode {
        path: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl DiffContextError {
    /// Path of the file the error is about, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            DiffContextError::MalformedDiff { .. } => None,
            DiffContextError::MissingFile { path } | DiffContextError::Decode { path, .. } => {
                Some(path)
            }
        }
    }
}
