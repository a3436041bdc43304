//! Writing-quality review prompt on top of [`OpenAiService`].

use std::future::Future;

use indexmap::IndexMap;
use tracing::debug;

use crate::{error_handler::Result, services::open_ai_service::OpenAiService, types::Completion};

/// System prompt for writing feedback on per-file text blocks.
pub const SYSTEM_CONTENT: &str = "\
You are a helpful assistant.
Improve the following <content>. Criticise syntax, grammar, punctuation, style, etc.
Recommend common technical writing knowledge, such as used in Vale
and the Google developer documentation style guide.
If the content is good, don't comment on it.
Do not comment on file names, just the actual text.
The <content> will be in JSON format and contains file name keys and text values.
You can use GitHub-flavored markdown syntax.
Make sure to give very concise feedback per file.
";

/// Appended after the serialized content in the user message.
pub const EXTRA_INSTRUCTIONS: &str = "Improve this content.";

/// Anything that can turn per-file text blocks into one review completion.
pub trait TextReviewer: Send + Sync {
    fn review(
        &self,
        blocks: &IndexMap<String, Vec<String>>,
    ) -> impl Future<Output = Result<Completion>> + Send;
}

/// [`TextReviewer`] backed by a chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct WritingReviewer {
    service: OpenAiService,
    system: String,
    extra: String,
}

impl WritingReviewer {
    pub fn new(service: OpenAiService) -> Self {
        Self {
            service,
            system: SYSTEM_CONTENT.to_string(),
            extra: EXTRA_INSTRUCTIONS.to_string(),
        }
    }

    /// Replaces the system prompt and the trailing instruction.
    pub fn with_prompts(mut self, system: impl Into<String>, extra: impl Into<String>) -> Self {
        self.system = system.into();
        self.extra = extra.into();
        self
    }

    pub fn model(&self) -> &str {
        self.service.model()
    }
}

impl TextReviewer for WritingReviewer {
    async fn review(&self, blocks: &IndexMap<String, Vec<String>>) -> Result<Completion> {
        let prompt = build_user_prompt(blocks, &self.extra)?;
        debug!(files = blocks.len(), prompt_len = prompt.len(), "writing review prompt built");
        self.service.generate(&self.system, &prompt).await
    }
}

/// `This is the content: {json}. {extra}` with the blocks as a JSON object
/// keyed by path, in insertion order.
pub fn build_user_prompt(blocks: &IndexMap<String, Vec<String>>, extra: &str) -> Result<String> {
    let content = serde_json::to_string(blocks)?;
    Ok(format!("This is the content: {content}. {extra}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prompt_keeps_file_order() {
        let mut blocks = IndexMap::new();
        blocks.insert("z.md".to_string(), vec!["Zed line".to_string()]);
        blocks.insert("a.md".to_string(), vec!["first".to_string(), "second".to_string()]);

        let prompt = build_user_prompt(&blocks, EXTRA_INSTRUCTIONS).unwrap();
        assert_eq!(
            prompt,
            r#"This is the content: {"z.md":["Zed line"],"a.md":["first","second"]}. Improve this content."#
        );
    }

    #[test]
    fn prompt_escapes_quotes() {
        let mut blocks = IndexMap::new();
        blocks.insert("q.md".to_string(), vec![r#"say "hi""#.to_string()]);
        let prompt = build_user_prompt(&blocks, "x").unwrap();
        assert!(prompt.contains(r#"say \"hi\""#), "{prompt}");
    }

    #[test]
    fn system_prompt_mentions_json_content() {
        assert!(SYSTEM_CONTENT.contains("JSON format"));
        assert!(SYSTEM_CONTENT.starts_with("You are a helpful assistant."));
    }
}
