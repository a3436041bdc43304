//! Seams between the pipeline and the outside world.
//!
//! Plain traits returning `impl Future + Send` (no `async-trait`, no trait
//! objects); the pipeline is generic over them. The model side reuses
//! [`ai_llm_service::TextReviewer`].

use std::future::Future;

use diff_context::FileSnapshot;
use github_app::{GitHubAppAuth, GitHubClient, GitHubResult, PullRequestRef};

/// Mints installation access tokens.
pub trait InstallationTokens: Send + Sync {
    fn installation_token(
        &self,
        installation_id: u64,
    ) -> impl Future<Output = GitHubResult<String>> + Send;
}

/// Reads pull request data.
pub trait PullRequestSource: Send + Sync {
    fn diff(
        &self,
        token: &str,
        pr: &PullRequestRef,
    ) -> impl Future<Output = GitHubResult<String>> + Send;

    fn head_branch(
        &self,
        token: &str,
        pr: &PullRequestRef,
    ) -> impl Future<Output = GitHubResult<String>> + Send;

    /// Contents of `paths` at `branch`; unknown paths are left out.
    fn snapshot(
        &self,
        token: &str,
        pr: &PullRequestRef,
        branch: &str,
        paths: &[String],
    ) -> impl Future<Output = GitHubResult<FileSnapshot>> + Send;
}

/// Posts comments on a pull request.
pub trait CommentSink: Send + Sync {
    fn post(
        &self,
        token: &str,
        comments_url: &str,
        body: &str,
    ) -> impl Future<Output = GitHubResult<()>> + Send;
}

impl InstallationTokens for GitHubAppAuth {
    async fn installation_token(&self, installation_id: u64) -> GitHubResult<String> {
        GitHubAppAuth::installation_token(self, installation_id).await
    }
}

impl PullRequestSource for GitHubClient {
    async fn diff(&self, token: &str, pr: &PullRequestRef) -> GitHubResult<String> {
        self.fetch_diff(token, pr).await
    }

    async fn head_branch(&self, token: &str, pr: &PullRequestRef) -> GitHubResult<String> {
        self.fetch_head_branch(token, pr).await
    }

    async fn snapshot(
        &self,
        token: &str,
        pr: &PullRequestRef,
        branch: &str,
        paths: &[String],
    ) -> GitHubResult<FileSnapshot> {
        self.fetch_snapshot(token, pr, branch, paths).await
    }
}

impl CommentSink for GitHubClient {
    async fn post(&self, token: &str, comments_url: &str, body: &str) -> GitHubResult<()> {
        self.post_comment(token, comments_url, body).await
    }
}
