//! Subset of GitHub webhook payloads and the decision of what to do with them.

use github_app::{PullRequestRef, issue_comments_url};
use mentor_review::{ReviewRequest, ReviewSettings, parse_command};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub installation: Option<Installation>,
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    pub issue: Option<IssuePayload>,
    #[serde(default)]
    pub comment: Option<CommentPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Installation {
    #[serde(default)]
    pub id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullRequestPayload {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub issue_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssuePayload {
    #[serde(default)]
    pub html_url: String,
    /// Present only when the issue is a pull request.
    #[serde(default)]
    pub pull_request: Option<IssuePullRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssuePullRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentPayload {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub issue_url: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub login: String,
}

/// What a delivery asks the bot to do.
#[derive(Debug, PartialEq, Eq)]
pub enum WebhookAction {
    Greet {
        installation_id: u64,
        comments_url: String,
    },
    Review(ReviewRequest),
    Ignore(&'static str),
}

impl WebhookPayload {
    pub fn installation_id(&self) -> Option<u64> {
        self.installation.as_ref().and_then(|i| i.id)
    }

    fn action_is(&self, names: &[&str]) -> bool {
        self.action.as_deref().is_some_and(|a| names.contains(&a))
    }

    /// Opened PRs get a greeting; `created`/`edited` PR comments carrying the
    /// command get a review. Everything else is ignored.
    pub fn classify(&self, installation_id: u64, settings: &ReviewSettings) -> WebhookAction {
        if let Some(pr) = &self.pull_request {
            if !self.action_is(&["opened"]) {
                return WebhookAction::Ignore("pull request action is not 'opened'");
            }
            if pr.issue_url.is_empty() {
                return WebhookAction::Ignore("pull request has no issue_url");
            }
            return WebhookAction::Greet {
                installation_id,
                comments_url: issue_comments_url(&pr.issue_url),
            };
        }

        let Some(issue) = &self.issue else {
            return WebhookAction::Ignore("neither pull_request nor issue event");
        };
        if !self.action_is(&["created", "edited"]) {
            return WebhookAction::Ignore("comment action is not 'created' or 'edited'");
        }
        if !issue.html_url.contains("/pull/") {
            return WebhookAction::Ignore("issue is not a pull request");
        }
        let Some(comment) = &self.comment else {
            return WebhookAction::Ignore("issue event without comment");
        };

        let author = comment.user.as_ref().map(|u| u.login.as_str()).unwrap_or_default();
        if author == settings.bot_login() {
            return WebhookAction::Ignore("comment written by the bot");
        }

        let Some(command) = parse_command(comment.body.as_deref().unwrap_or_default(), &settings.handle)
        else {
            return WebhookAction::Ignore("comment does not mention the bot");
        };

        let pr_url = issue
            .pull_request
            .as_ref()
            .map(|p| p.url.as_str())
            .filter(|u| !u.is_empty())
            .unwrap_or(issue.html_url.as_str());
        let Ok(pr) = PullRequestRef::from_api_url(pr_url) else {
            return WebhookAction::Ignore("pull request url could not be parsed");
        };

        if comment.issue_url.is_empty() {
            return WebhookAction::Ignore("comment has no issue_url");
        }

        WebhookAction::Review(ReviewRequest {
            installation_id,
            pr,
            comments_url: issue_comments_url(&comment.issue_url),
            command,
        })
    }
}
