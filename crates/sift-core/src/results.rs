//! Match results and the code excerpts attached to them.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::aliases::AliasBindingSet;
use crate::span::Span;

/// Code around a match, widened to whole lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFrame {
    /// The excerpt.
    pub code: String,
    /// Zero-indexed line on which the excerpt starts.
    pub start_line: u32,
}

/// A match of one query in one file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    file_path: Utf8PathBuf,
    query_index: usize,
    span: Span,
    code: String,
    indentation_base: usize,
    extended_code_frame: CodeFrame,
    aliases: AliasBindingSet,
}

impl Match {
    /// Builds a match, extracting the code excerpts from `source`.
    #[must_use]
    pub fn new(
        file_path: &Utf8Path,
        query_index: usize,
        span: Span,
        source: &str,
        aliases: AliasBindingSet,
    ) -> Self {
        let (code, indentation_base) = prepare_code(source, &span);
        Self {
            file_path: file_path.to_owned(),
            query_index,
            span,
            code,
            indentation_base,
            extended_code_frame: extended_code_frame(source, &span),
            aliases,
        }
    }

    /// Returns the file the match was found in.
    #[must_use]
    pub fn file_path(&self) -> &Utf8Path {
        &self.file_path
    }

    /// Returns the index of the query that matched.
    #[must_use]
    pub const fn query_index(&self) -> usize {
        self.query_index
    }

    /// Returns the matched span.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Returns the matched code with common indentation removed.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the indentation removed from [`Match::code`].
    #[must_use]
    pub const fn indentation_base(&self) -> usize {
        self.indentation_base
    }

    /// Returns the excerpt with surrounding context lines.
    #[must_use]
    pub const fn extended_code_frame(&self) -> &CodeFrame {
        &self.extended_code_frame
    }

    /// Returns the alias bindings.
    #[must_use]
    pub const fn aliases(&self) -> &AliasBindingSet {
        &self.aliases
    }
}

/// Extracts the matched code and strips the indentation of its first line
/// from every line.
///
/// Returns the code and the number of indentation characters removed.
#[must_use]
pub fn prepare_code(source: &str, span: &Span) -> (String, usize) {
    let code = source.get(span.byte_range()).unwrap_or_default();
    let line_start = line_start(source, span.start_byte());
    let first_line = source.get(line_start..span.start_byte()).unwrap_or_default();
    let indentation = first_line
        .chars()
        .take_while(|ch| ch.is_whitespace())
        .count();
    if indentation == 0 {
        return (code.to_owned(), 0);
    }

    let dedented = code
        .split('\n')
        .map(|line| {
            let cut = line
                .char_indices()
                .take(indentation)
                .take_while(|(_, ch)| ch.is_whitespace())
                .last()
                .map_or(0, |(offset, ch)| offset + ch.len_utf8());
            line.get(cut..).unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    (dedented, indentation)
}

/// Widens the match to whole lines, adding one line of context above and
/// below when the match spans fewer than three lines.
#[must_use]
pub fn extended_code_frame(source: &str, span: &Span) -> CodeFrame {
    let matched = source.get(span.byte_range()).unwrap_or_default();
    let line_count = matched.matches('\n').count() + 1;

    let mut start = line_start(source, span.start_byte());
    let mut end = line_end(source, span.end_byte());
    let mut start_line = span.start().line();
    if line_count < 3 {
        if start > 0 {
            start = line_start(source, start - 1);
            start_line = start_line.saturating_sub(1);
        }
        if end < source.len() {
            end = line_end(source, end + 1);
        }
    }

    CodeFrame {
        code: source.get(start..end).unwrap_or_default().to_owned(),
        start_line,
    }
}

fn line_start(source: &str, offset: usize) -> usize {
    source
        .get(..offset)
        .and_then(|before| before.rfind('\n'))
        .map_or(0, |newline| newline + 1)
}

fn line_end(source: &str, offset: usize) -> usize {
    source
        .get(offset..)
        .and_then(|after| after.find('\n'))
        .map_or(source.len(), |newline| offset + newline)
}

/// Removes matches sharing a file and span with an earlier match, keeping
/// the first occurrence.
#[must_use]
pub fn dedup_matches(matches: Vec<Match>) -> Vec<Match> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|found| {
            seen.insert((
                found.file_path.clone(),
                found.span.start_byte(),
                found.span.end_byte(),
            ))
        })
        .collect()
}
