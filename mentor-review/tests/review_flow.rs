use std::sync::Mutex;

use ai_llm_service::{
    AiLlmError, Completion, TextReviewer, TokenUsage,
    error_handler::{Provider, ProviderError, ProviderErrorKind},
};
use diff_context::FileSnapshot;
use github_app::{GitHubError, GitHubProviderError, GitHubResult, PullRequestRef};
use indexmap::IndexMap;
use mentor_review::{
    CommentSink, InstallationTokens, PayloadMode, PullRequestSource, ReviewCommand, ReviewError,
    ReviewPipeline, ReviewRequest, ReviewSettings,
};
use pretty_assertions::assert_eq;

const DIFF: &str = "diff --git a/docs/guide.md b/docs/guide.md
index 1111111..2222222 100644
--- a/docs/guide.md
+++ b/docs/guide.md
@@ -1,3 +1,4 @@
 # Guide
+Install the tool first.
 Then run it.
 Done.
diff --git a/README.md b/README.md
index 3333333..4444444 100644
--- a/README.md
+++ b/README.md
@@ -1,1 +1,2 @@
 project
+a short tagline
diff --git a/old.md b/old.md
index 5555555..6666666 100644
--- a/old.md
+++ b/old.md
@@ -1,2 +1,1 @@
 keep
-drop
";

const COMMENTS_URL: &str = "https://api.github.com/repos/acme/docs/issues/9/comments";

/* ---------------------------------------------------------------- fakes */

struct FakeTokens {
    fail: bool,
}

impl InstallationTokens for FakeTokens {
    async fn installation_token(&self, installation_id: u64) -> GitHubResult<String> {
        if self.fail {
            return Err(GitHubError::Provider(GitHubProviderError::Unauthorized));
        }
        Ok(format!("tok-{installation_id}"))
    }
}

#[derive(Default)]
struct FakeSource {
    diff: String,
    files: FileSnapshot,
    snapshot_requests: Mutex<Vec<Vec<String>>>,
}

impl PullRequestSource for FakeSource {
    async fn diff(&self, token: &str, _pr: &PullRequestRef) -> GitHubResult<String> {
        assert_eq!(token, "tok-77");
        Ok(self.diff.clone())
    }

    async fn head_branch(&self, _token: &str, _pr: &PullRequestRef) -> GitHubResult<String> {
        Ok("feature/docs".to_string())
    }

    async fn snapshot(
        &self,
        _token: &str,
        _pr: &PullRequestRef,
        branch: &str,
        paths: &[String],
    ) -> GitHubResult<FileSnapshot> {
        assert_eq!(branch, "feature/docs");
        self.snapshot_requests.lock().unwrap().push(paths.to_vec());
        Ok(paths
            .iter()
            .filter_map(|p| self.files.get(p).map(|b| (p.clone(), b.clone())))
            .collect())
    }
}

/// Answers with the file names and their text; fails for paths with "README".
#[derive(Default)]
struct FakeReviewer {
    fail_readme: bool,
    calls: Mutex<Vec<IndexMap<String, Vec<String>>>>,
}

impl TextReviewer for FakeReviewer {
    async fn review(&self, blocks: &IndexMap<String, Vec<String>>) -> Result<Completion, AiLlmError> {
        self.calls.lock().unwrap().push(blocks.clone());
        if self.fail_readme && blocks.keys().any(|k| k.contains("README")) {
            return Err(ProviderError::new(Provider::Anyscale, ProviderErrorKind::EmptyChoices).into());
        }
        Ok(Completion {
            model: "llama-test".into(),
            content: blocks.keys().cloned().collect::<Vec<_>>().join(", "),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
            },
        })
    }
}

#[derive(Default)]
struct FakeSink {
    posted: Mutex<Vec<(String, String, String)>>,
}

impl CommentSink for FakeSink {
    async fn post(&self, token: &str, comments_url: &str, body: &str) -> GitHubResult<()> {
        self.posted
            .lock()
            .unwrap()
            .push((token.into(), comments_url.into(), body.into()));
        Ok(())
    }
}

/* -------------------------------------------------------------- helpers */

fn pipeline(
    settings: ReviewSettings,
    source: FakeSource,
    reviewer: FakeReviewer,
) -> ReviewPipeline<FakeTokens, FakeSource, FakeReviewer, FakeSink> {
    ReviewPipeline::new(
        FakeTokens { fail: false },
        source,
        reviewer,
        FakeSink::default(),
        settings,
    )
}

fn source() -> FakeSource {
    FakeSource {
        diff: DIFF.to_string(),
        ..FakeSource::default()
    }
}

fn request(filters: &[&str]) -> ReviewRequest {
    ReviewRequest {
        installation_id: 77,
        pr: PullRequestRef {
            owner: "acme".into(),
            repo: "docs".into(),
            number: 9,
        },
        comments_url: COMMENTS_URL.into(),
        command: ReviewCommand {
            filters: filters.iter().map(|f| f.to_string()).collect(),
        },
    }
}

fn context_settings(max_concurrency: usize) -> ReviewSettings {
    ReviewSettings {
        payload: PayloadMode::Context { radius: 1 },
        max_concurrency,
        ..ReviewSettings::default()
    }
}

/* ---------------------------------------------------------------- tests */

#[tokio::test]
async fn added_text_review_posts_one_report() {
    let p = pipeline(ReviewSettings::default(), source(), FakeReviewer::default());

    let outcome = p.run(request(&[])).await.unwrap();

    assert_eq!(outcome.reviewed, vec!["docs/guide.md", "README.md"]);
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.model.as_deref(), Some("llama-test"));

    // old.md has no added text and is not sent.
    let calls = p_calls(&p);
    assert_eq!(calls.len(), 1);
    let mut expected = IndexMap::new();
    expected.insert("docs/guide.md".to_string(), vec!["Install the tool first.".to_string()]);
    expected.insert("README.md".to_string(), vec!["a short tagline".to_string()]);
    assert_eq!(calls[0], expected);

    let posted = p_posted(&p);
    assert_eq!(posted.len(), 1);
    let (token, url, body) = &posted[0];
    assert_eq!(token, "tok-77");
    assert_eq!(url, COMMENTS_URL);
    assert!(body.starts_with(":rocket: Docu Mentor finished analysing your PR!"));
    assert!(body.contains("docs/guide.md, README.md"));
    assert!(body.contains("used 10 prompt tokens, and 5 completion tokens"));
}

#[tokio::test]
async fn filters_narrow_the_payload() {
    let p = pipeline(ReviewSettings::default(), source(), FakeReviewer::default());

    let outcome = p.run(request(&["READ"])).await.unwrap();

    assert_eq!(outcome.reviewed, vec!["README.md"]);
    assert_eq!(p_calls(&p)[0].keys().collect::<Vec<_>>(), vec!["README.md"]);
}

#[tokio::test]
async fn no_matching_files_posts_notice_without_model_call() {
    let p = pipeline(ReviewSettings::default(), source(), FakeReviewer::default());

    let outcome = p.run(request(&["nothing-matches"])).await.unwrap();

    assert!(outcome.model.is_none());
    assert!(p_calls(&p).is_empty());
    let posted = p_posted(&p);
    assert_eq!(posted.len(), 1);
    assert!(posted[0].2.contains("`nothing-matches`"), "{}", posted[0].2);
}

#[tokio::test]
async fn context_mode_sends_windows_and_skips_missing_files() {
    let mut src = source();
    src.files.insert(
        "docs/guide.md".into(),
        b"# Guide\nInstall the tool first.\nThen run it.\nDone.\n".to_vec(),
    );
    let p = pipeline(context_settings(1), src, FakeReviewer::default());

    let outcome = p.run(request(&[])).await.unwrap();

    // old.md has no added lines and is never requested.
    assert_eq!(
        p_source(&p).snapshot_requests.lock().unwrap().clone(),
        vec![vec!["docs/guide.md".to_string(), "README.md".to_string()]]
    );

    let calls = p_calls(&p);
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0]["docs/guide.md"],
        vec!["# Guide\nInstall the tool first.\nThen run it.".to_string()]
    );
    assert!(!calls[0].contains_key("README.md"));

    assert_eq!(outcome.reviewed, vec!["docs/guide.md"]);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].path, "README.md");

    let body = &p_posted(&p)[0].2;
    assert!(body.contains("These files were skipped:\n- `README.md`:"), "{body}");
}

#[tokio::test]
async fn context_mode_with_every_file_missing_posts_notice() {
    let p = pipeline(context_settings(1), source(), FakeReviewer::default());

    let outcome = p.run(request(&[])).await.unwrap();

    assert!(p_calls(&p).is_empty());
    assert_eq!(outcome.skipped.len(), 2);
    let body = &p_posted(&p)[0].2;
    assert!(body.starts_with("I couldn't find any added text to review in this PR."));
    assert!(body.contains("- `docs/guide.md`:"));
}

#[tokio::test]
async fn fan_out_reviews_per_file_and_reports_failures() {
    let settings = ReviewSettings {
        max_concurrency: 4,
        ..ReviewSettings::default()
    };
    let reviewer = FakeReviewer {
        fail_readme: true,
        ..FakeReviewer::default()
    };
    let p = pipeline(settings, source(), reviewer);

    let outcome = p.run(request(&[])).await.unwrap();

    assert_eq!(p_calls(&p).len(), 2);
    assert_eq!(outcome.reviewed, vec!["docs/guide.md"]);
    assert_eq!(
        outcome.skipped.iter().map(|s| s.path.as_str()).collect::<Vec<_>>(),
        vec!["README.md"]
    );
    assert_eq!(outcome.usage.prompt_tokens, 10);

    let body = &p_posted(&p)[0].2;
    assert!(body.contains("#### `docs/guide.md`"), "{body}");
    assert!(body.contains("- `README.md`: review failed:"), "{body}");
}

#[tokio::test]
async fn single_filtered_file_failure_is_an_error() {
    let settings = ReviewSettings {
        max_concurrency: 2,
        ..ReviewSettings::default()
    };
    let reviewer = FakeReviewer {
        fail_readme: true,
        ..FakeReviewer::default()
    };
    let p = pipeline(settings, source(), reviewer);

    let err = p.run(request(&["README"])).await;
    // A single file never fans out, so the failure surfaces directly.
    assert!(matches!(err, Err(ReviewError::Llm(_))));
    assert!(p_posted(&p).is_empty());
}

#[tokio::test]
async fn malformed_hunk_fails_in_context_mode() {
    let src = FakeSource {
        diff: "diff --git a/a.md b/a.md\n@@ -1 garbage @@\n+x\n".into(),
        ..FakeSource::default()
    };
    let p = pipeline(context_settings(1), src, FakeReviewer::default());

    let err = p.run(request(&[])).await;
    assert!(matches!(err, Err(ReviewError::Diff(_))));
    assert!(p_posted(&p).is_empty());
}

#[tokio::test]
async fn token_failure_posts_nothing() {
    let p = ReviewPipeline::new(
        FakeTokens { fail: true },
        source(),
        FakeReviewer::default(),
        FakeSink::default(),
        ReviewSettings::default(),
    );

    assert!(matches!(p.run(request(&[])).await, Err(ReviewError::GitHub(_))));
    assert!(matches!(p.greet(77, COMMENTS_URL).await, Err(ReviewError::GitHub(_))));
}

#[tokio::test]
async fn greeting_is_posted_with_handle() {
    let settings = ReviewSettings {
        handle: "writer-bot".into(),
        ..ReviewSettings::default()
    };
    let p = pipeline(settings, source(), FakeReviewer::default());

    p.greet(77, COMMENTS_URL).await.unwrap();

    let posted = p_posted(&p);
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].1, COMMENTS_URL);
    assert!(posted[0].2.contains("@writer-bot run doc/ README.md"));
}

/* ------------------------------------------------------------ accessors */

fn p_calls(
    p: &ReviewPipeline<FakeTokens, FakeSource, FakeReviewer, FakeSink>,
) -> Vec<IndexMap<String, Vec<String>>> {
    p.reviewer().calls.lock().unwrap().clone()
}

fn p_posted(
    p: &ReviewPipeline<FakeTokens, FakeSource, FakeReviewer, FakeSink>,
) -> Vec<(String, String, String)> {
    p.sink().posted.lock().unwrap().clone()
}

fn p_source(p: &ReviewPipeline<FakeTokens, FakeSource, FakeReviewer, FakeSink>) -> &FakeSource {
    p.source()
}
