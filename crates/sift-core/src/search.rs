//! The search entry point.

use std::collections::BTreeMap;
use std::ptr;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use crate::adapter::{AdapterResolver, ParserAdapter};
use crate::compare::MatchContext;
use crate::config::{SearchConfig, SearchContext, SearchMetrics};
use crate::error::{SearchError, SearchFailure};
use crate::filter::passes_shallow_filter;
use crate::node::Node;
use crate::query::{Hint, ParsedQuery, parse_query};
use crate::results::{Match, dedup_matches};
use crate::span::Span;
use crate::traverse::traverse;

/// A file handed to the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: Utf8PathBuf,
    content: String,
}

impl SourceFile {
    /// Creates a file from its path and contents.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns the path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the contents.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Everything a search produced.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Deduplicated matches in discovery order.
    pub matches: Vec<Match>,
    /// Query and file errors.
    pub errors: Vec<SearchFailure>,
    /// Hints for each query, indexed like the queries.
    pub hints: Vec<Vec<Hint>>,
    /// Counters for the run.
    pub metrics: SearchMetrics,
    /// `true` when the result budget or the stop flag ended the search.
    pub stopped_early: bool,
}

/// Queries parsed lazily, once per adapter.
struct QueryTable<'q> {
    texts: &'q [String],
    parsed: BTreeMap<&'static str, Vec<Result<ParsedQuery, SearchError>>>,
}

impl<'q> QueryTable<'q> {
    const fn new(texts: &'q [String]) -> Self {
        Self {
            texts,
            parsed: BTreeMap::new(),
        }
    }

    fn for_adapter(
        &mut self,
        adapter: &dyn ParserAdapter,
        config: &SearchConfig,
        outcome: &mut SearchOutcome,
    ) -> &[Result<ParsedQuery, SearchError>] {
        let texts = self.texts;
        self.parsed.entry(adapter.name()).or_insert_with(|| {
            texts
                .iter()
                .enumerate()
                .map(|(index, text)| {
                    let parsed = parse_query(adapter, text, config);
                    let hints = match &parsed {
                        Ok(query) => query.hints(),
                        Err(err) => err.hints(),
                    };
                    record_hints(outcome, index, hints);
                    if let Err(err) = &parsed {
                        warn!(adapter = adapter.name(), query = index, %err, "query rejected");
                        outcome
                            .errors
                            .push(SearchFailure::for_query(index, adapter.name(), err.clone()));
                    }
                    parsed
                })
                .collect()
        })
    }
}

fn record_hints(outcome: &mut SearchOutcome, index: usize, hints: &[Hint]) {
    let Some(slot) = outcome.hints.get_mut(index) else {
        return;
    };
    for hint in hints {
        if !slot.contains(hint) {
            slot.push(hint.clone());
        }
    }
}

/// Searches `files` for every query.
///
/// Queries are parsed for each adapter the resolver hands out. Files without
/// an adapter, files that fail to parse and queries that fail to parse are
/// reported in [`SearchOutcome::errors`] and skipped. The stop flag and the
/// result budget are checked between files.
pub fn search<I>(
    queries: &[String],
    config: &SearchConfig,
    resolver: &dyn AdapterResolver,
    files: I,
    context: &SearchContext,
) -> SearchOutcome
where
    I: IntoIterator<Item = SourceFile>,
{
    let mut outcome = SearchOutcome {
        hints: vec![Vec::new(); queries.len()],
        ..SearchOutcome::default()
    };
    let mut table = QueryTable::new(queries);
    let mut found = Vec::new();

    for file in files {
        if context.stop_flag().is_stopped() {
            info!("search stopped by caller");
            outcome.stopped_early = true;
            break;
        }
        if config.max_results().is_some_and(|limit| found.len() >= limit) {
            outcome.stopped_early = true;
            break;
        }
        outcome.metrics.files_seen += 1;

        let Some(adapter) = resolver.resolve(file.path()) else {
            debug!(path = %file.path(), "no adapter for file");
            outcome.metrics.files_failed += 1;
            outcome.errors.push(SearchFailure::for_file(
                file.path().to_owned(),
                SearchError::UnsupportedFile {
                    path: file.path().to_owned(),
                },
            ));
            continue;
        };

        let parsed = table.for_adapter(adapter, config, &mut outcome);
        search_file(adapter, config, &file, parsed, &mut outcome, &mut found);
    }

    let mut matches = dedup_matches(found);
    if let Some(limit) = config.max_results()
        && matches.len() > limit
    {
        matches.truncate(limit);
        outcome.stopped_early = true;
    }
    outcome.matches = matches;
    info!(
        files = outcome.metrics.files_seen,
        matches = outcome.matches.len(),
        errors = outcome.errors.len(),
        "search finished"
    );
    outcome
}

fn search_file(
    adapter: &dyn ParserAdapter,
    config: &SearchConfig,
    file: &SourceFile,
    parsed: &[Result<ParsedQuery, SearchError>],
    outcome: &mut SearchOutcome,
    found: &mut Vec<Match>,
) {
    let queries: Vec<(usize, &ParsedQuery)> = parsed
        .iter()
        .enumerate()
        .filter_map(|(index, query)| query.as_ref().ok().map(|query| (index, query)))
        .collect();
    if queries.is_empty() {
        return;
    }
    if !passes_shallow_filter(
        file.content(),
        queries.iter().map(|(_, query)| query.unique_tokens()),
        config.case_insensitive(),
    ) {
        debug!(path = %file.path(), "skipped by token filter");
        outcome.metrics.files_filtered += 1;
        return;
    }

    let root = match adapter.parse(file.content()) {
        Ok(root) => root,
        Err(failure) => {
            warn!(path = %file.path(), message = %failure.message, "file failed to parse");
            outcome.metrics.files_failed += 1;
            outcome.errors.push(SearchFailure::for_file(
                file.path().to_owned(),
                SearchError::file_parse(failure.message, failure.location),
            ));
            return;
        }
    };
    outcome.metrics.files_parsed += 1;

    let cx = MatchContext::new(adapter, config, file.content());
    for (index, query) in queries {
        for raw in traverse(&cx, &root, query.node()) {
            let span = if query.is_multistatement() {
                narrow_multistatement(&cx, raw.node, query.node())
            } else {
                *raw.node.span()
            };
            outcome.metrics.raw_matches += 1;
            found.push(Match::new(
                file.path(),
                index,
                span,
                file.content(),
                raw.aliases,
            ));
        }
    }
    outcome.metrics.invariant_violations += cx.invariant_violations();
}

/// Narrows a block match to the statements the query actually names.
///
/// Each query statement picks the first sub-match not already picked, never
/// the block itself, and the result spans from the earliest to the latest
/// pick.
fn narrow_multistatement(cx: &MatchContext<'_>, matched: &Node, query: &Node) -> Span {
    let mut picked: Vec<&Node> = vec![matched];
    let mut span: Option<Span> = None;
    for statement in query.children() {
        let sub = traverse(cx, matched, statement)
            .into_iter()
            .find(|candidate| !picked.iter().any(|seen| ptr::eq(*seen, candidate.node)));
        if let Some(sub) = sub {
            picked.push(sub.node);
            span = Some(span.map_or(*sub.node.span(), |covered| covered.cover(sub.node.span())));
        }
    }
    span.unwrap_or(*matched.span())
}
