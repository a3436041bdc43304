//! Comment-triggered writing review for pull requests.
//!
//! 1) [`command::parse_command`] recognises `@{handle} run [filters...]`.
//! 2) [`pipeline::ReviewPipeline::run`] fetches the diff, turns it into
//!    per-file text (added lines or context windows), applies the filters,
//!    asks the model and posts [`report::render_report`] back to the PR.
//! 3) [`pipeline::ReviewPipeline::greet`] posts usage instructions on new PRs.
//!
//! GitHub and the model are reached through the traits in
//! [`collaborators`]; the real implementations live in `github-app` and
//! `ai-llm-service`.

pub mod collaborators;
pub mod command;
pub mod errors;
pub mod pipeline;
pub mod report;
pub mod settings;

pub use collaborators::{CommentSink, InstallationTokens, PullRequestSource};
pub use command::{ReviewCommand, filter_files, parse_command};
pub use errors::{ReviewError, ReviewResult};
pub use pipeline::{ReviewPipeline, ReviewRequest};
pub use report::{ReviewOutcome, SkippedFile, greeting, render_report};
pub use settings::{PayloadMode, ReviewSettings};
