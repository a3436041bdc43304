use std::str::FromStr;

use diff_context::DEFAULT_WINDOW_RADIUS;

/// What text from the diff is sent to the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadMode {
    /// Only the added lines, grouped per file.
    #[default]
    AddedText,
    /// Each added line with `radius` lines of head-branch context around it.
    Context { radius: usize },
}

impl FromStr for PayloadMode {
    type Err = String;

    /// `added` / `added-text` / `text`, or `context` (default radius).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "added" | "added-text" | "added_text" | "text" => Ok(PayloadMode::AddedText),
            "context" => Ok(PayloadMode::Context {
                radius: DEFAULT_WINDOW_RADIUS,
            }),
            other => Err(format!("unknown review payload mode '{other}'")),
        }
    }
}

/// Knobs of one review pipeline, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSettings {
    /// Bot login without the `[bot]` suffix, e.g. `docu-mentor`.
    pub handle: String,
    pub payload: PayloadMode,
    /// Files reviewed concurrently; `<= 1` sends everything in one call.
    pub max_concurrency: usize,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            handle: "docu-mentor".to_string(),
            payload: PayloadMode::default(),
            max_concurrency: 1,
        }
    }
}

impl ReviewSettings {
    /// Login GitHub shows for comments made by this app.
    pub fn bot_login(&self) -> String {
        format!("{}[bot]", self.handle)
    }
}
