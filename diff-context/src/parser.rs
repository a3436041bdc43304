//! Unified-diff parser producing per-file added text or added-line positions.
//!
//! Lines are classified by prefix ([`classify_line`]) and fed through a small
//! state machine ([`LineNumberParser`]) with three states:
//!
//! - `NoFile`: nothing seen yet, every line is ignored;
//! - `InFile`: after a `diff --git` header, before its first hunk;
//! - `InHunk`: after a `@@` header, counter synced to the hunk's new start.
//!
//! Counting rules (new-file, 0-based):
//! - a file header resets the counter to 0;
//! - a hunk header sets it to `new_start - 1`;
//! - `+` lines are recorded, then advance the counter;
//! - `-` lines (including the `---` marker) neither record nor advance;
//! - everything else advances, including the `+++` marker line.

use tracing::debug;

use crate::errors::{DiffContextError, DiffContextResult};
use crate::types::{AddedLines, AddedText};

const FILE_HEADER: &str = "diff --git ";
const HUNK_HEADER: &str = "@@";
const NEW_FILE_MARKER: &str = "+++";

/// Prefix classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `diff --git a/<path> b/<path>`, carrying `<path>`.
    FileHeader(&'a str),
    /// `@@ -o,oc +n,nc @@`.
    HunkHeader,
    /// `+<text>` that is not the `+++` marker, carrying `<text>`.
    Added(&'a str),
    /// `-<text>`, the `---` marker included.
    Removed,
    /// Context, blank and any other line (`+++`, `index`, `\ No newline`).
    Context,
}

/// Classifies one line of a unified diff by its prefix.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.starts_with(FILE_HEADER) {
        return LineKind::FileHeader(file_header_path(line));
    }
    if line.starts_with(HUNK_HEADER) {
        return LineKind::HunkHeader;
    }
    if line.starts_with(NEW_FILE_MARKER) {
        return LineKind::Context;
    }
    if let Some(text) = line.strip_prefix('+') {
        return LineKind::Added(text);
    }
    if line.starts_with('-') {
        return LineKind::Removed;
    }
    LineKind::Context
}

/// Third space-separated token of the header with its `a/` marker removed.
fn file_header_path(line: &str) -> &str {
    line.split(' ')
        .nth(2)
        .and_then(|token| token.get(2..))
        .unwrap_or_default()
}

/// Parses the new-file start of a hunk header into a 0-based line number.
///
/// `@@ -1,3 +7,4 @@ fn x()` yields `Some(6)`; a missing `+` token or a
/// non-numeric start yields `None`. A declared start of 0 (empty new file)
/// maps to 0.
pub fn hunk_new_start(header: &str) -> Option<usize> {
    let range = header.split(' ').nth(2)?.strip_prefix('+')?;
    let start: usize = range.split(',').next()?.parse().ok()?;
    Some(start.saturating_sub(1))
}

/// Where the parser currently is inside the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    NoFile,
    InFile { path: String, line: usize },
    InHunk { path: String, line: usize },
}

/// Incremental added-line-number parser; feed lines, then [`finish`](Self::finish).
#[derive(Debug)]
pub struct LineNumberParser {
    state: ParserState,
    out: AddedLines,
    diff_line: usize,
}

impl Default for LineNumberParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineNumberParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::NoFile,
            out: AddedLines::new(),
            diff_line: 0,
        }
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Consumes one diff line (without its trailing `\n`).
    ///
    /// # Errors
    /// [`DiffContextError::MalformedDiff`] when a hunk header inside a file
    /// section has no parsable new-file start.
    pub fn feed(&mut self, raw: &str) -> DiffContextResult<()> {
        self.diff_line += 1;
        let kind = classify_line(raw);
        let state = std::mem::replace(&mut self.state, ParserState::NoFile);

        self.state = match (state, kind) {
            (_, LineKind::FileHeader(path)) => {
                // Re-introducing a path resets its list but keeps its position.
                self.out.insert(path.to_string(), Vec::new());
                ParserState::InFile {
                    path: path.to_string(),
                    line: 0,
                }
            }
            (ParserState::NoFile, _) => ParserState::NoFile,
            (
                ParserState::InFile { path, .. } | ParserState::InHunk { path, .. },
                LineKind::HunkHeader,
            ) => {
                let line =
                    hunk_new_start(raw).ok_or_else(|| DiffContextError::MalformedDiff {
                        line: self.diff_line,
                        header: raw.to_string(),
                    })?;
                ParserState::InHunk { path, line }
            }
            (ParserState::InFile { path, line }, kind) => ParserState::InFile {
                line: self.count(&path, line, kind),
                path,
            },
            (ParserState::InHunk { path, line }, kind) => ParserState::InHunk {
                line: self.count(&path, line, kind),
                path,
            },
        };
        Ok(())
    }

    /// Applies a content line to the counter, recording additions.
    fn count(&mut self, path: &str, line: usize, kind: LineKind<'_>) -> usize {
        match kind {
            LineKind::Added(_) => {
                if let Some(lines) = self.out.get_mut(path) {
                    lines.push(line);
                }
                line + 1
            }
            LineKind::Removed => line,
            _ => line + 1,
        }
    }

    pub fn finish(self) -> AddedLines {
        self.out
    }
}

/// Collects the text of every added line, grouped by file.
///
/// Lines before the first `diff --git` header are ignored. A file with a
/// header but no additions maps to an empty list.
pub fn parse_added_text(diff: &str) -> AddedText {
    let mut out = AddedText::new();
    let mut current: Option<&str> = None;

    for raw in diff.split('\n') {
        match classify_line(raw) {
            LineKind::FileHeader(path) => {
                out.insert(path.to_string(), Vec::new());
                current = Some(path);
            }
            LineKind::Added(text) => {
                if let Some(lines) = current.and_then(|path| out.get_mut(path)) {
                    lines.push(text.to_string());
                }
            }
            _ => {}
        }
    }

    debug!(files = out.len(), "parsed added text");
    out
}

/// Collects the 0-based new-file position of every added line, per file.
///
/// # Errors
/// [`DiffContextError::MalformedDiff`] for a hunk header whose `+start`
/// token is missing or non-numeric.
pub fn parse_added_line_numbers(diff: &str) -> DiffContextResult<AddedLines> {
    let mut parser = LineNumberParser::new();
    for raw in diff.split('\n') {
        parser.feed(raw)?;
    }
    let out = parser.finish();
    debug!(files = out.len(), "parsed added line numbers");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const README_DIFF: &str = "diff --git a/readme.txt b/readme.txt\n\
@@ -1,3 +1,4 @@\n \
line one\n\
+inserted line\n \
line two\n \
line three";

    fn lines_of(out: &AddedLines, path: &str) -> Vec<usize> {
        out.get(path).cloned().unwrap_or_default()
    }

    #[test]
    fn classifies_by_prefix() {
        assert_eq!(
            classify_line("diff --git a/doc/x.md b/doc/x.md"),
            LineKind::FileHeader("doc/x.md")
        );
        assert_eq!(classify_line("@@ -1 +1 @@"), LineKind::HunkHeader);
        assert_eq!(classify_line("+hello"), LineKind::Added("hello"));
        assert_eq!(classify_line("+"), LineKind::Added(""));
        assert_eq!(classify_line("+++ b/doc/x.md"), LineKind::Context);
        assert_eq!(classify_line("--- a/doc/x.md"), LineKind::Removed);
        assert_eq!(classify_line("-gone"), LineKind::Removed);
        assert_eq!(classify_line(" same"), LineKind::Context);
        assert_eq!(classify_line(""), LineKind::Context);
        assert_eq!(classify_line("index 3b18e51..a9c2f4d 100644"), LineKind::Context);
    }

    #[test]
    fn hunk_start_is_zero_based() {
        assert_eq!(hunk_new_start("@@ -1,3 +1,4 @@"), Some(0));
        assert_eq!(hunk_new_start("@@ -10,3 +12,4 @@ fn main() {"), Some(11));
        assert_eq!(hunk_new_start("@@ -5 +7 @@"), Some(6));
        assert_eq!(hunk_new_start("@@ -1,3 +0,0 @@"), Some(0));
        assert_eq!(hunk_new_start("@@ -1,3 +x,4 @@"), None);
        assert_eq!(hunk_new_start("@@ -1,3"), None);
        assert_eq!(hunk_new_start("@@ -1,3 12,4 @@"), None);
    }

    #[test]
    fn readme_example_text() {
        let out = parse_added_text(README_DIFF);
        assert_eq!(out.len(), 1);
        assert_eq!(out["readme.txt"], vec!["inserted line".to_string()]);
    }

    #[test]
    fn readme_example_line_numbers() {
        let out = parse_added_line_numbers(README_DIFF).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(lines_of(&out, "readme.txt"), vec![1]);
    }

    #[test]
    fn empty_diff_gives_empty_maps() {
        assert!(parse_added_text("").is_empty());
        assert!(parse_added_line_numbers("").unwrap().is_empty());
    }

    #[test]
    fn header_without_additions_is_kept() {
        let diff = "diff --git a/gone.md b/gone.md\n@@ -1,2 +1 @@\n keep\n-drop\n";
        assert_eq!(parse_added_text(diff)["gone.md"], Vec::<String>::new());
        assert_eq!(
            lines_of(&parse_added_line_numbers(diff).unwrap(), "gone.md"),
            Vec::<usize>::new()
        );
    }

    #[test]
    fn markers_are_not_added_text() {
        let diff = "diff --git a/a.md b/a.md\n\
--- a/a.md\n\
+++ b/a.md\n\
@@ -1 +1 @@\n\
-old\n\
+new";
        assert_eq!(parse_added_text(diff)["a.md"], vec!["new".to_string()]);
        assert_eq!(lines_of(&parse_added_line_numbers(diff).unwrap(), "a.md"), vec![0]);
    }

    #[test]
    fn removed_lines_do_not_advance() {
        let diff = "diff --git a/a.md b/a.md\n\
@@ -3,4 +3,4 @@\n \
ctx\n\
-old one\n\
-old two\n\
+new one\n\
+new two\n \
tail";
        let out = parse_added_line_numbers(diff).unwrap();
        assert_eq!(lines_of(&out, "a.md"), vec![3, 4]);
    }

    #[test]
    fn every_hunk_resyncs_the_counter() {
        let diff = "diff --git a/a.md b/a.md\n\
@@ -1,2 +1,3 @@\n \
one\n\
+two\n \
three\n\
@@ -40,2 +41,3 @@\n \
forty\n\
+forty-one\n \
forty-two";
        let out = parse_added_line_numbers(diff).unwrap();
        assert_eq!(lines_of(&out, "a.md"), vec![1, 41]);
    }

    #[test]
    fn counter_restarts_per_file_and_order_is_kept() {
        let diff = "diff --git a/z.md b/z.md\n\
@@ -1 +1,2 @@\n \
z\n\
+z2\n\
diff --git a/a.md b/a.md\n\
@@ -0,0 +1,2 @@\n\
+a1\n\
+a2";
        let out = parse_added_line_numbers(diff).unwrap();
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z.md", "a.md"]);
        assert_eq!(lines_of(&out, "z.md"), vec![1]);
        assert_eq!(lines_of(&out, "a.md"), vec![0, 1]);

        let text = parse_added_text(diff);
        let keys: Vec<&str> = text.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z.md", "a.md"]);
    }

    #[test]
    fn repeated_header_resets_but_keeps_position() {
        let diff = "diff --git a/a.md b/a.md\n\
@@ -1 +1 @@\n\
+first\n\
diff --git a/b.md b/b.md\n\
@@ -1 +1 @@\n\
+bee\n\
diff --git a/a.md b/a.md\n\
@@ -9 +9 @@\n\
+second";
        let text = parse_added_text(diff);
        let keys: Vec<&str> = text.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a.md", "b.md"]);
        assert_eq!(text["a.md"], vec!["second".to_string()]);

        let lines = parse_added_line_numbers(diff).unwrap();
        assert_eq!(lines_of(&lines, "a.md"), vec![8]);
    }

    #[test]
    fn lines_before_any_header_are_ignored() {
        let diff = "+stray\n@@ -1 +1 @@\n+also stray\ndiff --git a/a.md b/a.md\n@@ -1 +1 @@\n+kept";
        assert_eq!(parse_added_text(diff)["a.md"], vec!["kept".to_string()]);
        let lines = parse_added_line_numbers(diff).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines_of(&lines, "a.md"), vec![0]);
    }

    #[test]
    fn malformed_hunk_header_is_an_error() {
        let diff = "diff --git a/a.md b/a.md\n@@ -1,2 +abc,3 @@\n+x";
        let err = parse_added_line_numbers(diff).unwrap_err();
        match err {
            DiffContextError::MalformedDiff { line, header } => {
                assert_eq!(line, 2);
                assert_eq!(header, "@@ -1,2 +abc,3 @@");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn text_mode_ignores_malformed_hunk_headers() {
        let diff = "diff --git a/a.md b/a.md\n@@ broken\n+x";
        assert_eq!(parse_added_text(diff)["a.md"], vec!["x".to_string()]);
    }

    #[test]
    fn state_machine_transitions() {
        let mut p = LineNumberParser::new();
        p.feed("preamble").unwrap();
        assert_eq!(p.state(), &ParserState::NoFile);

        p.feed("diff --git a/a.md b/a.md").unwrap();
        assert_eq!(
            p.state(),
            &ParserState::InFile {
                path: "a.md".into(),
                line: 0
            }
        );

        // `---` is a removal-prefixed line: no advance.
        p.feed("--- a/a.md").unwrap();
        // `+++` counts as an ordinary context line.
        p.feed("+++ b/a.md").unwrap();
        assert_eq!(
            p.state(),
            &ParserState::InFile {
                path: "a.md".into(),
                line: 1
            }
        );

        p.feed("@@ -4,2 +5,3 @@").unwrap();
        assert_eq!(
            p.state(),
            &ParserState::InHunk {
                path: "a.md".into(),
                line: 4
            }
        );

        p.feed("+added").unwrap();
        p.feed(" ctx").unwrap();
        p.feed("-gone").unwrap();
        assert_eq!(
            p.state(),
            &ParserState::InHunk {
                path: "a.md".into(),
                line: 6
            }
        );
        assert_eq!(p.finish()["a.md"], vec![4]);
    }

    #[test]
    fn utf8_paths_and_short_tokens() {
        assert_eq!(
            classify_line("diff --git a/dök/ü.md b/dök/ü.md"),
            LineKind::FileHeader("dök/ü.md")
        );
        assert_eq!(classify_line("diff --git x"), LineKind::FileHeader(""));
        assert_eq!(classify_line("diff --git "), LineKind::FileHeader(""));
    }
}
