//! GitHub REST client for the pieces a writing review needs.
//!
//! Endpoints used:
//!   * GET  /repos/{owner}/{repo}/pulls/{number}            (diff media type and JSON)
//!   * GET  /repos/{owner}/{repo}/git/trees/{ref}?recursive=1
//!   * GET  /repos/{owner}/{repo}/git/blobs/{sha}           (via the tree entry URL)
//!   * POST {issue_url}/comments
//!
//! Every call takes the installation token explicitly; the client itself
//! only holds the shared HTTP instance and the API base.

use std::collections::{HashMap, HashSet};

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    errors::{GitHubError, GitHubProviderError, GitHubResult},
    types::{GitHubBlob, GitHubPr, GitHubTree, PullRequestRef},
};

const DIFF_MEDIA_TYPE: &str = "application/vnd.github.diff";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // "https://api.github.com"
}

impl GitHubClient {
    pub fn new(http: Client, base_api: String) -> Self {
        debug!("Creating GitHubClient with base_api={}", base_api);
        Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
        }
    }

    fn pull_url(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, pr.owner, pr.repo, pr.number
        )
    }

    /// Fetches the unified diff of a pull request as text.
    pub async fn fetch_diff(&self, token: &str, pr: &PullRequestRef) -> GitHubResult<String> {
        let url = self.pull_url(pr);
        debug!("GitHub fetch_diff: {}", url);

        let resp = send(authed(self.http.get(&url), token).header("Accept", DIFF_MEDIA_TYPE)).await?;
        let diff = resp.text().await?;

        debug!(pr = %pr, bytes = diff.len(), "diff fetched");
        Ok(diff)
    }

    /// Returns the name of the PR's head branch (`head.ref`).
    pub async fn fetch_head_branch(&self, token: &str, pr: &PullRequestRef) -> GitHubResult<String> {
        let url = self.pull_url(pr);
        debug!("GitHub fetch_head_branch: {}", url);

        let resp = send(authed(self.http.get(&url), token).header("Accept", JSON_MEDIA_TYPE)).await?;
        let body: GitHubPr = resp.json().await?;

        if body.head.r#ref.trim().is_empty() {
            return Err(GitHubError::Decode(format!("empty head ref for {pr}")));
        }
        Ok(body.head.r#ref)
    }

    /// Downloads the contents of `paths` at `branch`.
    ///
    /// Lists the recursive tree once, then fetches only the blobs whose path
    /// is wanted. Paths absent from the tree (deleted files, typos) are simply
    /// missing from the result.
    pub async fn fetch_snapshot(
        &self,
        token: &str,
        pr: &PullRequestRef,
        branch: &str,
        paths: &[String],
    ) -> GitHubResult<HashMap<String, Vec<u8>>> {
        if branch.trim().is_empty() {
            return Err(GitHubError::Validation("branch must not be empty".into()));
        }

        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.base_api, pr.owner, pr.repo, branch
        );
        debug!("GitHub fetch_snapshot tree: {}", url);

        let resp = send(authed(self.http.get(&url), token).header("Accept", JSON_MEDIA_TYPE)).await?;
        let tree: GitHubTree = resp.json().await?;
        if tree.truncated {
            warn!(pr = %pr, branch, "tree listing truncated by GitHub; some files may be missing");
        }

        let wanted: HashSet<&str> = paths.iter().map(String::as_str).collect();
        let mut files = HashMap::with_capacity(wanted.len());

        for entry in tree.tree {
            if entry.kind != "blob" || !wanted.contains(entry.path.as_str()) {
                continue;
            }
            let Some(blob_url) = entry.url else {
                warn!(path = %entry.path, "blob entry without url, skipping");
                continue;
            };

            let resp =
                send(authed(self.http.get(&blob_url), token).header("Accept", JSON_MEDIA_TYPE)).await?;
            let blob: GitHubBlob = resp.json().await?;
            let bytes = decode_blob(&blob).map_err(|e| {
                GitHubError::Decode(format!("blob '{}' is not valid base64: {e}", entry.path))
            })?;
            files.insert(entry.path, bytes);
        }

        info!(
            pr = %pr,
            branch,
            wanted = wanted.len(),
            fetched = files.len(),
            "snapshot fetched"
        );
        Ok(files)
    }

    /// Posts a new comment to `comments_url` (`{issue_url}/comments`).
    pub async fn post_comment(&self, token: &str, comments_url: &str, body: &str) -> GitHubResult<()> {
        debug!("GitHub post_comment: url={}, len={}", comments_url, body.len());

        send(
            authed(self.http.post(comments_url), token)
                .header("Accept", JSON_MEDIA_TYPE)
                .json(&json!({ "body": body })),
        )
        .await?;
        Ok(())
    }
}

fn authed(req: RequestBuilder, token: &str) -> RequestBuilder {
    req.header("Authorization", format!("token {token}"))
}

/// Sends and maps non-2xx statuses to [`GitHubProviderError`].
async fn send(req: RequestBuilder) -> GitHubResult<Response> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    warn!(%status, %url, body = %body.chars().take(200).collect::<String>(), "GitHub request failed");
    Err(GitHubProviderError::from_status(status.as_u16()).into())
}

/// Blob `content` is base64 wrapped at 60 columns; other encodings are raw.
fn decode_blob(blob: &GitHubBlob) -> Result<Vec<u8>, base64::DecodeError> {
    if blob.encoding.eq_ignore_ascii_case("base64") {
        let compact: String = blob.content.split_whitespace().collect();
        STANDARD.decode(compact)
    } else {
        Ok(blob.content.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_wrapped_base64() {
        let encoded = STANDARD.encode("# Title\n\nSome text that is long enough to wrap.\n");
        let (a, b) = encoded.split_at(20);
        let blob = GitHubBlob {
            content: format!("{a}\n{b}\n"),
            encoding: "base64".into(),
        };
        assert_eq!(
            decode_blob(&blob).unwrap(),
            b"# Title\n\nSome text that is long enough to wrap.\n".to_vec()
        );
    }

    #[test]
    fn utf8_encoding_is_passed_through() {
        let blob = GitHubBlob {
            content: "plain".into(),
            encoding: "utf-8".into(),
        };
        assert_eq!(decode_blob(&blob).unwrap(), b"plain".to_vec());
    }

    #[test]
    fn bad_base64_is_rejected() {
        let blob = GitHubBlob {
            content: "!!!".into(),
            encoding: "base64".into(),
        };
        assert!(decode_blob(&blob).is_err());
    }

    #[test]
    fn pull_url_uses_trimmed_base() {
        let c = GitHubClient::new(Client::new(), "https://ghe.example.com/api/v3/".into());
        let pr = PullRequestRef {
            owner: "o".into(),
            repo: "r".into(),
            number: 3,
        };
        assert_eq!(c.pull_url(&pr), "https://ghe.example.com/api/v3/repos/o/r/pulls/3");
    }
}
