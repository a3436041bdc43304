use std::sync::Arc;

use ai_llm_service::{OpenAiService, WritingReviewer};
use github_app::{GitHubAppAuth, GitHubClient, http_client};
use mentor_review::ReviewPipeline;
use tracing::info;

use crate::{core::app_config::AppConfig, error_handler::AppResult};

/// Pipeline wired to the real GitHub App and chat-completion clients.
pub type GitHubReviewPipeline = ReviewPipeline<GitHubAppAuth, GitHubClient, WritingReviewer, GitHubClient>;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Shared by every spawned review task.
    pub pipeline: Arc<GitHubReviewPipeline>,
}

impl AppState {
    /// Builds the HTTP clients and the review pipeline once.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let http = http_client()?;
        let auth = GitHubAppAuth::new(http.clone(), config.github_api_base.clone(), &config.credentials)?;
        let github = GitHubClient::new(http, config.github_api_base.clone());
        let reviewer = WritingReviewer::new(OpenAiService::new(config.llm.clone())?);

        info!(
            github_api_base = %config.github_api_base,
            handle = %config.review.handle,
            payload = ?config.review.payload,
            max_concurrency = config.review.max_concurrency,
            model = %reviewer.model(),
            signature_check = config.webhook_secret.is_some(),
            "app state initialized"
        );

        let pipeline = ReviewPipeline::new(
            auth,
            github.clone(),
            reviewer,
            github,
            config.review.clone(),
        );

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
        })
    }
}
