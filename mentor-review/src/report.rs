//! Comment bodies posted back to the pull request.

use ai_llm_service::TokenUsage;

/// Introduction posted when a pull request is opened.
pub fn greeting(handle: &str) -> String {
    format!(
        "\
👋 Hi, I'm @{handle}, an LLM-powered GitHub app
that gives you actionable feedback on your writing.

Simply create a new comment in this PR that says:

@{handle} run

and I will start my analysis. I only look at what you changed
in this PR. If you only want me to look at specific files or folders,
you can specify them like this:

@{handle} run doc/ README.md

In this example, I'll have a look at all files contained in the \"doc/\"
folder and the file \"README.md\". All good? Let's get started!
"
    )
}

/// A file that was dropped before or during the model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Summary of a finished review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Files whose text reached the model, in diff order.
    pub reviewed: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    /// `None` when nothing was sent to the model.
    pub model: Option<String>,
    pub usage: TokenUsage,
}

/// Final PR comment: banner, feedback, model and token counters, skipped files.
pub fn render_report(outcome: &ReviewOutcome, content: &str) -> String {
    let model = outcome.model.as_deref().unwrap_or("unknown");
    let mut body = format!(
        ":rocket: Docu Mentor finished analysing your PR! :rocket:\n\n\
         Take a look at your results:\n\
         {}\n\n\
         It used the model {model}, used {} prompt tokens, \
         and {} completion tokens in total.",
        content.trim(),
        outcome.usage.prompt_tokens,
        outcome.usage.completion_tokens,
    );
    push_skipped(&mut body, &outcome.skipped);
    body
}

/// Posted instead of a report when no file survived filtering.
pub fn render_nothing_to_review(filters: &[String], skipped: &[SkippedFile]) -> String {
    let mut body = if filters.is_empty() {
        "I couldn't find any added text to review in this PR.".to_string()
    } else {
        format!(
            "I couldn't find any added text to review in files matching {}.",
            filters
                .iter()
                .map(|f| format!("`{f}`"))
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    push_skipped(&mut body, skipped);
    body
}

fn push_skipped(body: &mut String, skipped: &[SkippedFile]) {
    if skipped.is_empty() {
        return;
    }
    body.push_str("\n\nThese files were skipped:\n");
    for s in skipped {
        body.push_str(&format!("- `{}`: {}\n", s.path, s.reason));
    }
}
