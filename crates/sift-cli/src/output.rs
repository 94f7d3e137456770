//! Rendering of matches, failures and hints.
//!
//! Human output prints `path:line:col` followed by the extended code frame
//! with line numbers. JSON output prints one object per line: a serialised
//! match, or `{"error": ...}` for a failure.

use std::io::{self, Write};

use clap::ValueEnum;
use serde_json::json;
use sift_core::{Hint, Match, SearchFailure};

/// Output format selection for search results.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    Auto,
    /// Always render human-readable output.
    Human,
    /// Always emit JSON lines.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Human-readable output with source context.
    Human,
    /// One JSON object per line.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto => {
                if stdout_is_terminal {
                    ResolvedOutputFormat::Human
                } else {
                    ResolvedOutputFormat::Json
                }
            }
            Self::Human => ResolvedOutputFormat::Human,
            Self::Json => ResolvedOutputFormat::Json,
        }
    }
}

pub(crate) struct Renderer<'a, W: Write, E: Write> {
    format: ResolvedOutputFormat,
    stdout: &'a mut W,
    stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> Renderer<'a, W, E> {
    pub(crate) const fn new(
        format: ResolvedOutputFormat,
        stdout: &'a mut W,
        stderr: &'a mut E,
    ) -> Self {
        Self {
            format,
            stdout,
            stderr,
        }
    }

    pub(crate) fn found(&mut self, found: &Match) -> io::Result<()> {
        match self.format {
            ResolvedOutputFormat::Human => render_human_match(self.stdout, found),
            ResolvedOutputFormat::Json => {
                serde_json::to_writer(&mut *self.stdout, found)?;
                writeln!(self.stdout)
            }
        }
    }

    pub(crate) fn failure(&mut self, failure: &SearchFailure) -> io::Result<()> {
        match self.format {
            ResolvedOutputFormat::Human => writeln!(self.stderr, "error: {}", describe(failure)),
            ResolvedOutputFormat::Json => {
                serde_json::to_writer(&mut *self.stdout, &json!({ "error": failure }))?;
                writeln!(self.stdout)
            }
        }
    }

    /// Reports an error that happened outside the search itself, such as an
    /// unreadable file.
    pub(crate) fn problem(&mut self, message: &str) -> io::Result<()> {
        match self.format {
            ResolvedOutputFormat::Human => writeln!(self.stderr, "error: {message}"),
            ResolvedOutputFormat::Json => {
                let line = json!({ "error": { "message": message } });
                serde_json::to_writer(&mut *self.stdout, &line)?;
                writeln!(self.stdout)
            }
        }
    }

    pub(crate) fn hint(&mut self, query_index: usize, hint: &Hint) -> io::Result<()> {
        writeln!(self.stderr, "hint: query {}: {}", query_index + 1, hint.text)
    }
}

fn describe(failure: &SearchFailure) -> String {
    match (&failure.path, failure.query_index) {
        (Some(path), _) => format!("{path}: {}", failure.error),
        (None, Some(index)) => format!("query {}: {}", index + 1, failure.error),
        (None, None) => failure.error.to_string(),
    }
}

pub(crate) fn render_human_match<W: Write>(out: &mut W, found: &Match) -> io::Result<()> {
    let start = found.span().start();
    writeln!(
        out,
        "{}:{}:{}",
        found.file_path(),
        start.line() + 1,
        start.column() + 1
    )?;

    let frame = found.extended_code_frame();
    let first = u64::from(frame.start_line) + 1;
    let lines: Vec<&str> = frame.code.lines().collect();
    let last = (first + lines.len() as u64).saturating_sub(1);
    let width = last.to_string().len();
    for (line_number, line) in (first..).zip(lines) {
        writeln!(out, "{line_number:>width$} | {line}")?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use insta::assert_snapshot;
    use rstest::rstest;
    use sift_core::{AliasBindingSet, LineCol, SearchError, Span};

    const SOURCE: &str = "function run() {\n  go(1);\n}\n";

    fn sample() -> Match {
        let span = Span::new(19, 24, LineCol::new(1, 2), LineCol::new(1, 7));
        Match::new(Utf8Path::new("src/run.js"), 0, span, SOURCE, AliasBindingSet::new())
    }

    fn render(
        format: ResolvedOutputFormat,
        action: impl FnOnce(&mut Renderer<'_, Vec<u8>, Vec<u8>>),
    ) -> (String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut renderer = Renderer::new(format, &mut stdout, &mut stderr);
        action(&mut renderer);
        (
            String::from_utf8_lossy(&stdout).into_owned(),
            String::from_utf8_lossy(&stderr).into_owned(),
        )
    }

    #[rstest]
    #[case(OutputFormat::Auto, true, ResolvedOutputFormat::Human)]
    #[case(OutputFormat::Auto, false, ResolvedOutputFormat::Json)]
    #[case(OutputFormat::Json, true, ResolvedOutputFormat::Json)]
    #[case(OutputFormat::Human, false, ResolvedOutputFormat::Human)]
    fn auto_follows_the_terminal(
        #[case] format: OutputFormat,
        #[case] terminal: bool,
        #[case] expected: ResolvedOutputFormat,
    ) {
        assert_eq!(format.resolve(terminal), expected);
    }

    #[test]
    fn human_match_shows_location_and_frame() {
        let (stdout, _) = render(ResolvedOutputFormat::Human, |renderer| {
            renderer
                .found(&sample())
                .unwrap_or_else(|err| panic!("render: {err}"));
        });
        assert_snapshot!(stdout.trim_end(), @r"
        src/run.js:2:3
        1 | function run() {
        2 |   go(1);
        3 | }
        ");
    }

    #[test]
    fn json_match_is_one_line() {
        let (stdout, _) = render(ResolvedOutputFormat::Json, |renderer| {
            renderer
                .found(&sample())
                .unwrap_or_else(|err| panic!("render: {err}"));
        });
        assert_eq!(stdout.lines().count(), 1);
        let value: serde_json::Value =
            serde_json::from_str(&stdout).unwrap_or_else(|err| panic!("json: {err}"));
        assert_eq!(value["filePath"], "src/run.js");
        assert_eq!(value["code"], "go(1)");
    }

    #[test]
    fn failures_go_to_stderr_for_humans() {
        let failure = SearchFailure {
            path: Some("bad.js".into()),
            query_index: None,
            adapter: Some("javascript"),
            error: SearchError::file_parse("syntax error", None),
        };
        let (stdout, stderr) = render(ResolvedOutputFormat::Human, |renderer| {
            renderer
                .failure(&failure)
                .unwrap_or_else(|err| panic!("render: {err}"));
        });
        assert!(stdout.is_empty());
        assert!(stderr.starts_with("error: bad.js: "), "{stderr}");
    }

    #[test]
    fn failures_are_json_lines_for_machines() {
        let (stdout, _) = render(ResolvedOutputFormat::Json, |renderer| {
            renderer
                .problem("failed to read x.js")
                .unwrap_or_else(|err| panic!("render: {err}"));
        });
        assert_eq!(stdout, "{\"error\":{\"message\":\"failed to read x.js\"}}\n");
    }
}
