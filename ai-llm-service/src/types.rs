//! Completion results shared by the service, the reviewer and the fan-out.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Token counters reported by the completion endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt_tokens += rhs.prompt_tokens;
        self.completion_tokens += rhs.completion_tokens;
    }
}

impl std::iter::Sum for TokenUsage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(TokenUsage::default(), |mut acc, u| {
            acc += u;
            acc
        })
    }
}

/// One finished chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Model name as reported by the endpoint.
    pub model: String,
    /// Assistant message text.
    pub content: String,
    pub usage: TokenUsage,
}
