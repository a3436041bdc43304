//! Crate-wide error hierarchy for github-app.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitHubResult<T> = Result<T, GitHubError>;

/// Root error type for the github-app crate.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub answered with a non-2xx status or the transport failed.
    #[error(transparent)]
    Provider(#[from] GitHubProviderError),

    /// App credentials could not be turned into a JWT.
    #[error("github app auth error: {0}")]
    Auth(String),

    /// Input validation errors (bad PR URL, empty branch, etc.).
    #[error("validation error: {0}")]
    Validation(String),

    /// Response body did not have the expected shape or encoding.
    #[error("decode error: {0}")]
    Decode(String),
}

/// HTTP-level failure talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),
}

impl GitHubProviderError {
    /// Maps a non-2xx status code to a variant.
    pub fn from_status(code: u16) -> Self {
        match code {
            401 => GitHubProviderError::Unauthorized,
            403 => GitHubProviderError::Forbidden,
            404 => GitHubProviderError::NotFound,
            429 => GitHubProviderError::RateLimited,
            500..=599 => GitHubProviderError::Server(code),
            _ => GitHubProviderError::HttpStatus(code),
        }
    }
}

impl From<reqwest::Error> for GitHubProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return GitHubProviderError::Timeout;
        }
        if let Some(status) = e.status() {
            return GitHubProviderError::from_status(status.as_u16());
        }
        GitHubProviderError::Network(e.to_string())
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return GitHubError::Decode(e.to_string());
        }
        GitHubError::Provider(GitHubProviderError::from(e))
    }
}

impl From<jsonwebtoken::errors::Error> for GitHubError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        GitHubError::Auth(e.to_string())
    }
}
