//! Service configuration, read once at startup.
//!
//! # Environment variables
//!
//! - `API_ADDRESS`           = bind address, default `0.0.0.0:8000`
//! - `APP_ID`, `PRIVATE_KEY` = GitHub App identity (mandatory)
//! - `GITHUB_API_BASE`       = default `https://api.github.com`
//! - `WEBHOOK_SECRET`        = enables `X-Hub-Signature-256` checks when set
//! - `BOT_HANDLE`            = default `docu-mentor`
//! - `REVIEW_PAYLOAD`        = `added` (default) or `context`
//! - `REVIEW_CONTEXT_RADIUS` = lines around each change in `context` mode, default 2
//! - `REVIEW_CONCURRENCY`    = files reviewed in parallel, default 1 (single call)
//! - model settings: see `ai_llm_service::config::default_config`

use ai_llm_service::{
    AiLlmError, config::default_config::config_writing_review,
    config::llm_model_config::LlmModelConfig,
};
use github_app::{AppCredentials, DEFAULT_API_BASE};
use mentor_review::{PayloadMode, ReviewSettings};
use thiserror::Error;

const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_HANDLE: &str = "docu-mentor";
const DEFAULT_RADIUS: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value in {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error(transparent)]
    Llm(#[from] AiLlmError),
}

/// Everything the service needs, resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_address: String,
    pub github_api_base: String,
    pub credentials: AppCredentials,
    pub webhook_secret: Option<String>,
    pub review: ReviewSettings,
    pub llm: LlmModelConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm = config_writing_review()?;
        Self::from_lookup(|k| std::env::var(k).ok(), llm)
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F, llm: LlmModelConfig) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        let must = |k: &'static str| get(k).ok_or(ConfigError::MissingVar(k));

        let radius = parse_usize(get("REVIEW_CONTEXT_RADIUS"), "REVIEW_CONTEXT_RADIUS")?
            .unwrap_or(DEFAULT_RADIUS);

        let payload = match get("REVIEW_PAYLOAD") {
            Some(raw) => match raw.parse::<PayloadMode>() {
                Ok(PayloadMode::Context { .. }) => PayloadMode::Context { radius },
                Ok(mode) => mode,
                Err(reason) => {
                    return Err(ConfigError::Invalid {
                        var: "REVIEW_PAYLOAD",
                        reason,
                    });
                }
            },
            None => PayloadMode::AddedText,
        };

        let max_concurrency =
            parse_usize(get("REVIEW_CONCURRENCY"), "REVIEW_CONCURRENCY")?.unwrap_or(1);

        let handle = get("BOT_HANDLE")
            .map(|h| h.trim().trim_start_matches('@').to_string())
            .unwrap_or_else(|| DEFAULT_HANDLE.to_string());

        Ok(Self {
            api_address: get("API_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            github_api_base: get("GITHUB_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            credentials: AppCredentials::new(must("APP_ID")?, must("PRIVATE_KEY")?),
            webhook_secret: get("WEBHOOK_SECRET"),
            review: ReviewSettings {
                handle,
                payload,
                max_concurrency,
            },
            llm,
        })
    }
}

fn parse_usize(raw: Option<String>, var: &'static str) -> Result<Option<usize>, ConfigError> {
    raw.map(|v| {
        v.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        })
    })
    .transpose()
}
