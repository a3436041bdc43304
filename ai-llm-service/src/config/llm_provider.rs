use crate::error_handler::{ConfigError, Provider};

/// OpenAI-compatible chat-completion backends.
///
/// Both speak the same `/chat/completions` protocol and differ only in
/// their default endpoint and the environment variable holding the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// Anyscale Endpoints (hosted open models).
    Anyscale,
    /// OpenAI's API.
    OpenAI,
}

impl LlmProvider {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            LlmProvider::Anyscale => "https://api.endpoints.anyscale.com/v1",
            LlmProvider::OpenAI => "https://api.openai.com/v1",
        }
    }

    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::Anyscale => "ANYSCALE_API_KEY",
            LlmProvider::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// Tag used in provider errors.
    pub fn tag(self) -> Provider {
        match self {
            LlmProvider::Anyscale => Provider::Anyscale,
            LlmProvider::OpenAI => Provider::OpenAI,
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anyscale" => Ok(LlmProvider::Anyscale),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
