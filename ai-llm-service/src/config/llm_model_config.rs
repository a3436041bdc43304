use crate::config::llm_provider::LlmProvider;

/// Configuration for one chat-completion model.
///
/// # Fields
///
/// - `provider`: which OpenAI-compatible backend to call.
/// - `model`: model identifier (e.g. `"meta-llama/Llama-2-70b-chat-hf"`).
/// - `endpoint`: API base including the version segment (e.g. `https://…/v1`).
/// - `api_key`: bearer key for the backend.
/// - `max_tokens`: generation cap, if any.
/// - `temperature`: sampling temperature.
/// - `timeout_secs`: request timeout.
#[derive(Debug, Clone)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}
