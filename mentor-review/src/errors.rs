//! Error type for the review pipeline.

use ai_llm_service::AiLlmError;
use diff_context::DiffContextError;
use github_app::GitHubError;
use thiserror::Error;

/// Convenient alias for pipeline results.
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Anything that stops a review or greeting from being posted.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Token exchange, diff/snapshot download or comment posting failed.
    #[error("github: {0}")]
    GitHub(#[from] GitHubError),

    /// The model call failed (for fan-out: every file failed).
    #[error("llm: {0}")]
    Llm(#[from] AiLlmError),

    /// The diff could not be parsed into line numbers.
    #[error("diff: {0}")]
    Diff(#[from] DiffContextError),
}
