//! Writing-review model config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_PROVIDER`      = `anyscale` (default) or `openai`
//! - `ANYSCALE_API_KEY` / `OPENAI_API_KEY` = key for the chosen provider (mandatory)
//! - `LLM_ENDPOINT`      = API base, defaults per provider
//! - `LLM_MODEL`         = model id, defaults to [`DEFAULT_MODEL`]
//! - `LLM_MAX_TOKENS`    = optional generation cap (u32)
//! - `LLM_TIMEOUT_SECS`  = optional request timeout (u64), default 120

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_u32, env_opt_u64, must_env,
        validate_http_endpoint,
    },
};

/// Model used when `LLM_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-2-70b-chat-hf";

/// Sampling temperature for writing feedback.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Builds the writing-review model config.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - [`ConfigError::MissingVar`] when the provider's key is absent
/// - [`ConfigError::InvalidFormat`] when `LLM_ENDPOINT` is not http(s)
/// - [`ConfigError::InvalidNumber`] for bad numeric variables
pub fn config_writing_review() -> Result<LlmModelConfig, AiLlmError> {
    let provider = match env_opt("LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::Anyscale,
    };

    let api_key = must_env(provider.api_key_var())?;

    let endpoint =
        env_opt("LLM_ENDPOINT").unwrap_or_else(|| provider.default_endpoint().to_string());
    validate_http_endpoint("LLM_ENDPOINT", &endpoint)?;

    let model = env_opt("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(DEFAULT_TEMPERATURE),
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}
