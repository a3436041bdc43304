//! Chat-completion access for writing feedback.
//!
//! - [`services::open_ai_service::OpenAiService`]: thin client for any
//!   OpenAI-compatible `/chat/completions` endpoint (Anyscale by default).
//! - [`writing_review::WritingReviewer`]: the writing-feedback prompt, exposed
//!   through the [`writing_review::TextReviewer`] trait.
//! - [`fan_out::review_fan_out`]: one call per file with bounded concurrency,
//!   summed usage and a file-ordered merge.
//!
//! Config is read once via [`config::default_config::config_writing_review`].

pub mod config;
pub mod error_handler;
pub mod fan_out;
pub mod services;
pub mod types;
pub mod writing_review;

pub use error_handler::{AiLlmError, Result};
pub use fan_out::{FanOutReport, review_fan_out};
pub use services::open_ai_service::OpenAiService;
pub use types::{Completion, TokenUsage};
pub use writing_review::{TextReviewer, WritingReviewer};
