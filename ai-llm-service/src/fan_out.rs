//! Per-file review fan-out with bounded concurrency.

use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{error_handler::AiLlmError, types::Completion, writing_review::TextReviewer};

/// Result of [`review_fan_out`].
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// Merged completion of every file that succeeded, `None` if none did.
    pub completion: Option<Completion>,
    /// Files whose review call failed, in input order.
    pub failures: Vec<(String, AiLlmError)>,
}

/// Reviews every file in `blocks` with its own call, at most `concurrency`
/// calls in flight (`0` is treated as `1`).
///
/// Usage counters are summed. Contents are merged in the order of `blocks`,
/// each under a `#### \`path\`` heading. The reported model is the one of
/// the first successful file.
pub async fn review_fan_out<R: TextReviewer>(
    reviewer: &R,
    blocks: &IndexMap<String, Vec<String>>,
    concurrency: usize,
) -> FanOutReport {
    info!(files = blocks.len(), concurrency, "review fan-out started");

    // Owned items keep the stream free of borrowed closure arguments.
    let jobs: Vec<(usize, String, Vec<String>)> = blocks
        .iter()
        .enumerate()
        .map(|(idx, (path, lines))| (idx, path.clone(), lines.clone()))
        .collect();

    let mut results: Vec<(usize, String, Result<Completion, AiLlmError>)> =
        stream::iter(jobs)
            .map(|(idx, path, lines)| async move {
                let mut one = IndexMap::with_capacity(1);
                one.insert(path.clone(), lines);
                let res = reviewer.review(&one).await;
                (idx, path, res)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

    results.sort_by_key(|(idx, _, _)| *idx);

    let mut report = FanOutReport::default();
    let mut sections = Vec::new();

    for (_, path, res) in results {
        match res {
            Ok(c) => {
                debug!(file = %path, tokens = c.usage.total(), "file reviewed");
                sections.push(format!("#### `{path}`\n\n{}", c.content.trim()));
                match report.completion.as_mut() {
                    Some(acc) => acc.usage += c.usage,
                    None => {
                        report.completion = Some(Completion {
                            model: c.model,
                            content: String::new(),
                            usage: c.usage,
                        })
                    }
                }
            }
            Err(e) => {
                warn!(file = %path, error = %e, "file review failed");
                report.failures.push((path, e));
            }
        }
    }

    if let Some(acc) = report.completion.as_mut() {
        acc.content = sections.join("\n\n");
    }

    info!(
        reviewed = sections.len(),
        failed = report.failures.len(),
        "review fan-out finished"
    );
    report
}
