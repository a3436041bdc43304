use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Log targets of the workspace crates (module paths use underscores).
pub const WORKSPACE_TARGETS: [&str; 6] = [
    "docu_mentor",
    "api",
    "mentor_review",
    "github_app",
    "ai_llm_service",
    "diff_context",
];

/// RFC3339 UTC timer implemented via `chrono` (no extra features).
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        // Keep timestamps compact: no fractional seconds, Z-suffix
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Formatting layer for the service binary.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line` and target
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    // `event_format` replaces the whole formatter, so timer and fields go on it.
    let format = fmt::format()
        .compact()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_source_location(true);

    fmt::layer().with_ansi(use_ansi).event_format(format)
}

/// Level directive for one target, e.g. `mentor_review=debug`.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    format!("{target}={}", level.as_str().to_lowercase())
        .parse()
        .ok()
}

/// `RUST_LOG` when set; otherwise `default` globally and `level` for the
/// workspace crates.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        WORKSPACE_TARGETS
            .iter()
            .filter_map(|t| level_directive(t, level))
            .fold(EnvFilter::new(default), |f, d| f.add_directive(d))
    })
}
