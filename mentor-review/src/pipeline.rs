//! Review pipeline: token → diff → text blocks → filter → model → comment.

use std::time::Instant;

use ai_llm_service::{Completion, TextReviewer, TokenUsage, review_fan_out};
use diff_context::{expand_context_per_file, parse_added_line_numbers, parse_added_text};
use github_app::PullRequestRef;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    collaborators::{CommentSink, InstallationTokens, PullRequestSource},
    command::{ReviewCommand, filter_files},
    errors::ReviewResult,
    report::{ReviewOutcome, SkippedFile, greeting, render_nothing_to_review, render_report},
    settings::{PayloadMode, ReviewSettings},
};

/// Per-file text sent to the model.
type Blocks = IndexMap<String, Vec<String>>;

/// One accepted `@{handle} run` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub installation_id: u64,
    pub pr: PullRequestRef,
    /// `{issue_url}/comments` of the PR.
    pub comments_url: String,
    pub command: ReviewCommand,
}

/// Orchestrates greetings and reviews over its collaborators.
#[derive(Debug, Clone)]
pub struct ReviewPipeline<T, S, R, C> {
    tokens: T,
    source: S,
    reviewer: R,
    sink: C,
    settings: ReviewSettings,
}

impl<T, S, R, C> ReviewPipeline<T, S, R, C>
where
    T: InstallationTokens,
    S: PullRequestSource,
    R: TextReviewer,
    C: CommentSink,
{
    pub fn new(tokens: T, source: S, reviewer: R, sink: C, settings: ReviewSettings) -> Self {
        Self {
            tokens,
            source,
            reviewer,
            sink,
            settings,
        }
    }

    pub fn settings(&self) -> &ReviewSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn reviewer(&self) -> &R {
        &self.reviewer
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// Posts the usage instructions on a freshly opened PR.
    pub async fn greet(&self, installation_id: u64, comments_url: &str) -> ReviewResult<()> {
        let token = self.tokens.installation_token(installation_id).await?;
        self.sink
            .post(&token, comments_url, &greeting(&self.settings.handle))
            .await?;
        info!(installation_id, comments_url, "greeting posted");
        Ok(())
    }

    /// Runs a full review and posts the result as one comment.
    ///
    /// Files that cannot be expanded or reviewed are listed as skipped in the
    /// comment. When no file is left a short notice is posted and the model
    /// is not called.
    pub async fn run(&self, req: ReviewRequest) -> ReviewResult<ReviewOutcome> {
        let t_total = Instant::now();
        info!(
            pr = %req.pr,
            installation_id = req.installation_id,
            filters = ?req.command.filters,
            payload = ?self.settings.payload,
            "review started"
        );

        // Step 1: token + diff
        let t1 = Instant::now();
        let token = self.tokens.installation_token(req.installation_id).await?;
        let diff = self.source.diff(&token, &req.pr).await?;
        debug!(
            bytes = diff.len(),
            elapsed_ms = t1.elapsed().as_millis(),
            "step1: diff fetched"
        );

        // Step 2: text blocks
        let t2 = Instant::now();
        let (blocks, mut skipped) = self.collect_blocks(&token, &req, &diff).await?;
        debug!(
            files = blocks.len(),
            skipped = skipped.len(),
            elapsed_ms = t2.elapsed().as_millis(),
            "step2: text blocks collected"
        );

        if blocks.is_empty() {
            let body = render_nothing_to_review(&req.command.filters, &skipped);
            self.sink.post(&token, &req.comments_url, &body).await?;
            info!(pr = %req.pr, "nothing to review, notice posted");
            return Ok(ReviewOutcome {
                skipped,
                ..ReviewOutcome::default()
            });
        }

        // Step 3: model
        let t3 = Instant::now();
        let reviewed_paths: Vec<String> = blocks.keys().cloned().collect();
        let completion = if self.settings.max_concurrency > 1 && blocks.len() > 1 {
            let report = review_fan_out(&self.reviewer, &blocks, self.settings.max_concurrency).await;
            let mut first_err = None;
            for (path, err) in report.failures {
                skipped.push(SkippedFile {
                    path,
                    reason: format!("review failed: {err}"),
                });
                first_err.get_or_insert(err);
            }
            match (report.completion, first_err) {
                (Some(c), _) => c,
                (None, Some(err)) => return Err(err.into()),
                (None, None) => Completion {
                    model: String::new(),
                    content: String::new(),
                    usage: TokenUsage::default(),
                },
            }
        } else {
            self.reviewer.review(&blocks).await?
        };
        debug!(
            model = %completion.model,
            tokens = completion.usage.total(),
            elapsed_ms = t3.elapsed().as_millis(),
            "step3: model answered"
        );

        // Step 4: publish
        let reviewed = reviewed_paths
            .into_iter()
            .filter(|p| !skipped.iter().any(|s| &s.path == p))
            .collect();
        let outcome = ReviewOutcome {
            reviewed,
            skipped,
            model: Some(completion.model),
            usage: completion.usage,
        };
        let body = render_report(&outcome, &completion.content);
        self.sink.post(&token, &req.comments_url, &body).await?;

        info!(
            pr = %req.pr,
            reviewed = outcome.reviewed.len(),
            skipped = outcome.skipped.len(),
            prompt_tokens = outcome.usage.prompt_tokens,
            completion_tokens = outcome.usage.completion_tokens,
            total_ms = t_total.elapsed().as_millis(),
            "review posted"
        );
        Ok(outcome)
    }

    /// Builds the filtered per-file payload for the configured mode.
    ///
    /// Files with no added text are dropped; files whose context cannot be
    /// built are returned as skipped.
    async fn collect_blocks(
        &self,
        token: &str,
        req: &ReviewRequest,
        diff: &str,
    ) -> ReviewResult<(Blocks, Vec<SkippedFile>)> {
        let filters = &req.command.filters;

        let (blocks, skipped) = match self.settings.payload {
            PayloadMode::AddedText => (filter_files(parse_added_text(diff), filters), Vec::new()),
            PayloadMode::Context { radius } => {
                let changed = filter_files(parse_added_line_numbers(diff)?, filters);
                let changed: IndexMap<String, Vec<usize>> =
                    changed.into_iter().filter(|(_, lines)| !lines.is_empty()).collect();
                if changed.is_empty() {
                    return Ok((Blocks::new(), Vec::new()));
                }

                let branch = self.source.head_branch(token, &req.pr).await?;
                let paths: Vec<String> = changed.keys().cloned().collect();
                let snapshot = self.source.snapshot(token, &req.pr, &branch, &paths).await?;
                debug!(branch = %branch, wanted = paths.len(), got = snapshot.len(), "head snapshot loaded");

                let mut blocks = Blocks::with_capacity(changed.len());
                let mut skipped = Vec::new();
                for (path, result) in expand_context_per_file(&snapshot, &changed, radius) {
                    match result {
                        Ok(windows) => {
                            blocks.insert(path, windows);
                        }
                        Err(err) => {
                            warn!(%path, error = %err, "file skipped");
                            skipped.push(SkippedFile {
                                path,
                                reason: err.to_string(),
                            });
                        }
                    }
                }
                (blocks, skipped)
            }
        };

        let blocks = blocks.into_iter().filter(|(_, text)| !text.is_empty()).collect();
        Ok((blocks, skipped))
    }
}
