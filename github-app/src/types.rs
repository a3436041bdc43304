//! Value types shared by the auth and REST layers.

use std::fmt;

use serde::Deserialize;

use crate::errors::{GitHubError, GitHubResult};

/// Identifies one pull request on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    /// Parses a PR URL of the form `…/{owner}/{repo}/pulls/{number}`.
    ///
    /// Works for the API URL found in webhook payloads
    /// (`https://api.github.com/repos/o/r/pulls/7`) and for the web URL
    /// (`https://github.com/o/r/pull/7`). A trailing slash is ignored.
    pub fn from_api_url(url: &str) -> GitHubResult<Self> {
        let parts: Vec<&str> = url.trim().trim_end_matches('/').split('/').collect();
        let n = parts.len();
        if n < 4 || !matches!(parts[n - 2], "pulls" | "pull") {
            return Err(GitHubError::Validation(format!(
                "invalid pull request url '{url}', expected '…/{{owner}}/{{repo}}/pulls/{{number}}'"
            )));
        }

        let (owner, repo) = (parts[n - 4].trim(), parts[n - 3].trim());
        if owner.is_empty() || repo.is_empty() {
            return Err(GitHubError::Validation(format!(
                "invalid pull request url '{url}': empty owner or repo"
            )));
        }

        let number = parts[n - 1].parse::<u64>().map_err(|_| {
            GitHubError::Validation(format!(
                "invalid pull request number '{}' in '{url}'",
                parts[n - 1]
            ))
        })?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Comments endpoint for an issue (PRs are issues): `{issue_url}/comments`.
pub fn issue_comments_url(issue_url: &str) -> String {
    format!("{}/comments", issue_url.trim_end_matches('/'))
}

/// PR response (subset).
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubPr {
    pub head: GitHubPrRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitHubPrRef {
    #[serde(rename = "ref")]
    pub r#ref: String,
}

/// `GET /repos/{o}/{r}/git/trees/{ref}?recursive=1` response (subset).
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubTree {
    #[serde(default)]
    pub tree: Vec<GitHubTreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitHubTreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// `GET /repos/{o}/{r}/git/blobs/{sha}` response (subset).
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubBlob {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

/// `POST /app/installations/{id}/access_tokens` response (subset).
#[derive(Debug, Deserialize)]
pub(crate) struct InstallationToken {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_api_url() {
        let pr = PullRequestRef::from_api_url("https://api.github.com/repos/acme/docs/pulls/42").unwrap();
        assert_eq!(
            pr,
            PullRequestRef {
                owner: "acme".into(),
                repo: "docs".into(),
                number: 42
            }
        );
        assert_eq!(pr.to_string(), "acme/docs#42");
    }

    #[test]
    fn parses_web_url_and_trailing_slash() {
        let pr = PullRequestRef::from_api_url("https://github.com/acme/docs/pull/7/").unwrap();
        assert_eq!(pr.number, 7);
        assert_eq!(pr.repo, "docs");
    }

    #[test]
    fn rejects_non_pr_urls() {
        for bad in [
            "https://api.github.com/repos/acme/docs/issues/42",
            "https://api.github.com/repos/acme/docs/pulls/abc",
            "pulls/1",
            "",
        ] {
            assert!(
                matches!(PullRequestRef::from_api_url(bad), Err(GitHubError::Validation(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn comments_url_is_appended() {
        assert_eq!(
            issue_comments_url("https://api.github.com/repos/acme/docs/issues/42"),
            "https://api.github.com/repos/acme/docs/issues/42/comments"
        );
    }

    #[test]
    fn tree_entry_kind_is_read_from_type() {
        let tree: GitHubTree = serde_json::from_str(
            r#"{"sha":"x","tree":[{"path":"a.md","type":"blob","url":"u"},{"path":"d","type":"tree"}],"truncated":false}"#,
        )
        .unwrap();
        assert_eq!(tree.tree.len(), 2);
        assert_eq!(tree.tree[0].kind, "blob");
        assert_eq!(tree.tree[1].url, None);
    }
}
