//! GitHub App plumbing for pull request reviews.
//!
//! - [`auth::GitHubAppAuth`] turns App credentials into installation tokens.
//! - [`client::GitHubClient`] reads the PR diff, head branch and file contents,
//!   and posts issue comments.
//!
//! No `async-trait` and no trait objects: both types are plain structs over a
//! shared `reqwest::Client` built by [`http_client`].

pub mod auth;
pub mod client;
pub mod errors;
pub mod types;

pub use auth::{AppClaims, AppCredentials, GitHubAppAuth};
pub use client::GitHubClient;
pub use errors::{GitHubError, GitHubProviderError, GitHubResult};
pub use types::{PullRequestRef, issue_comments_url};

/// Default public API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Shared HTTP client with a stable user agent (GitHub requires one).
pub fn http_client() -> GitHubResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("docu-mentor/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
