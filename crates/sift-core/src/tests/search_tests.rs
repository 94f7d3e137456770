//! End-to-end tests of the search entry point over the toy language.

use camino::Utf8Path;
use rstest::{fixture, rstest};

use crate::tests::support::ToyAdapter;
use crate::{
    AdapterResolver, Mode, ParserAdapter, SearchConfig, SearchContext, SearchError, SearchOutcome,
    SingleAdapter, SourceFile, StopFlag, search,
};

struct ToyFilesOnly(ToyAdapter);

impl AdapterResolver for ToyFilesOnly {
    fn resolve(&self, path: &Utf8Path) -> Option<&dyn ParserAdapter> {
        (path.extension() == Some("toy")).then_some(&self.0 as &dyn ParserAdapter)
    }
}

#[fixture]
fn adapter() -> ToyAdapter {
    ToyAdapter::default()
}

fn run(
    adapter: &ToyAdapter,
    queries: &[&str],
    config: &SearchConfig,
    files: Vec<SourceFile>,
) -> SearchOutcome {
    let queries: Vec<String> = queries.iter().map(|query| (*query).to_owned()).collect();
    search(
        &queries,
        config,
        &SingleAdapter(adapter),
        files,
        &SearchContext::new(),
    )
}

fn codes(outcome: &SearchOutcome) -> Vec<&str> {
    outcome.matches.iter().map(|found| found.code()).collect()
}

#[rstest]
fn finds_nested_matches_in_pre_order(adapter: ToyAdapter) {
    let outcome = run(
        &adapter,
        &["log($$$)"],
        &SearchConfig::default(),
        vec![SourceFile::new("a.toy", "log(log(1))\nother(2)\nlog(3)")],
    );
    assert_eq!(codes(&outcome), vec!["log(log(1))", "log(1)", "log(3)"]);
    assert_eq!(outcome.metrics.files_parsed, 1);
    assert_eq!(outcome.metrics.raw_matches, 3);
}

#[rstest]
fn aliases_are_reported_per_match(adapter: ToyAdapter) {
    let outcome = run(
        &adapter,
        &["set($$_key, $$_key)"],
        &SearchConfig::default(),
        vec![SourceFile::new("a.toy", "set(a, a)\nset(a, b)\nset(b, b)")],
    );
    let bound: Vec<_> = outcome
        .matches
        .iter()
        .filter_map(|found| found.aliases().identifier_aliases().get("key"))
        .map(|binding| binding.value().to_owned())
        .collect();
    assert_eq!(bound, vec!["a", "b"]);
}

#[rstest]
fn identifier_wildcards_skip_literal_arguments(adapter: ToyAdapter) {
    let outcome = run(
        &adapter,
        &["f($$)"],
        &SearchConfig::default(),
        vec![SourceFile::new("a.toy", "f(1)\nf(x)")],
    );
    assert_eq!(codes(&outcome), vec!["f(x)"]);
}

#[rstest]
fn token_filter_skips_files_before_parsing(adapter: ToyAdapter) {
    let outcome = run(
        &adapter,
        &["needle($$$)"],
        &SearchConfig::default(),
        vec![
            SourceFile::new("a.toy", "haystack(1)"),
            SourceFile::new("b.toy", "broken((("),
            SourceFile::new("c.toy", "needle(2)"),
        ],
    );
    assert_eq!(codes(&outcome), vec!["needle(2)"]);
    assert_eq!(outcome.metrics.files_filtered, 2);
    assert!(outcome.errors.is_empty(), "filtered files are never parsed");
}

#[rstest]
fn file_parse_errors_do_not_stop_the_search(adapter: ToyAdapter) {
    let outcome = run(
        &adapter,
        &["needle($$$)"],
        &SearchConfig::default(),
        vec![
            SourceFile::new("a.toy", "needle((("),
            SourceFile::new("b.toy", "needle(2)"),
        ],
    );
    assert_eq!(codes(&outcome), vec!["needle(2)"]);
    let failure = outcome.errors.first().unwrap_or_else(|| panic!("expected an error"));
    assert_eq!(failure.path.as_deref().map(Utf8Path::as_str), Some("a.toy"));
    assert!(matches!(failure.error, SearchError::FileParse { .. }));
    assert_eq!(outcome.metrics.files_failed, 1);
}

#[rstest]
fn unsupported_files_are_reported(adapter: ToyAdapter) {
    let queries = vec!["x".to_owned()];
    let outcome = search(
        &queries,
        &SearchConfig::default(),
        &ToyFilesOnly(adapter),
        vec![
            SourceFile::new("a.txt", "x"),
            SourceFile::new("b.toy", "x"),
        ],
        &SearchContext::new(),
    );
    assert_eq!(outcome.matches.len(), 1);
    assert!(matches!(
        outcome.errors.first().map(|failure| &failure.error),
        Some(SearchError::UnsupportedFile { .. })
    ));
}

#[rstest]
fn invalid_queries_are_reported_once(adapter: ToyAdapter) {
    let outcome = run(
        &adapter,
        &["f($$$$)", "f($$$)"],
        &SearchConfig::default(),
        vec![
            SourceFile::new("a.toy", "f(1)"),
            SourceFile::new("b.toy", "f(2)"),
        ],
    );
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors.first().and_then(|failure| failure.query_index), Some(0));
    assert_eq!(outcome.matches.len(), 2);
    assert!(outcome.matches.iter().all(|found| found.query_index() == 1));
}

#[rstest]
fn duplicate_matches_from_several_queries_collapse(adapter: ToyAdapter) {
    let outcome = run(
        &adapter,
        &["f($$$)", "f(1)"],
        &SearchConfig::default(),
        vec![SourceFile::new("a.toy", "f(1)")],
    );
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.metrics.raw_matches, 2);
}

#[rstest]
fn max_results_truncates_and_flags(adapter: ToyAdapter) {
    let config = SearchConfig::default().with_max_results(Some(2));
    let outcome = run(
        &adapter,
        &["f($$$)"],
        &config,
        vec![
            SourceFile::new("a.toy", "f(1)\nf(2)\nf(3)"),
            SourceFile::new("b.toy", "f(4)"),
        ],
    );
    assert_eq!(codes(&outcome), vec!["f(1)", "f(2)"]);
    assert!(outcome.stopped_early);
    assert_eq!(outcome.metrics.files_seen, 1);
}

#[rstest]
fn stop_flag_ends_the_search_between_files(adapter: ToyAdapter) {
    let stop = StopFlag::new();
    let context = SearchContext::with_stop_flag(stop.clone());
    let queries = vec!["f($$$)".to_owned()];
    let files = vec![
        SourceFile::new("a.toy", "f(1)"),
        SourceFile::new("b.toy", "f(2)"),
    ]
    .into_iter()
    .inspect(|file| {
        if file.path().as_str() == "a.toy" {
            stop.stop();
        }
    });
    let outcome = search(
        &queries,
        &SearchConfig::default(),
        &SingleAdapter(&adapter),
        files,
        &context,
    );
    assert!(outcome.stopped_early);
    assert_eq!(outcome.metrics.files_seen, 0);
}

#[rstest]
fn multistatement_matches_cover_the_named_statements(adapter: ToyAdapter) {
    let source = "setup()\nopen(file)\nwork()\nclose(file)\nteardown()";
    let outcome = run(
        &adapter,
        &["open($$_f)\nclose($$_f)"],
        &SearchConfig::default(),
        vec![SourceFile::new("a.toy", source)],
    );
    assert_eq!(codes(&outcome), vec!["open(file)\nwork()\nclose(file)"]);
}

#[rstest]
#[case::exact(Mode::Exact, 1)]
#[case::include(Mode::Include, 2)]
fn mode_controls_extra_arguments(adapter: ToyAdapter, #[case] mode: Mode, #[case] expected: usize) {
    let outcome = run(
        &adapter,
        &["f(a)"],
        &SearchConfig::default().with_mode(mode),
        vec![SourceFile::new("a.toy", "f(a)\nf(a, b)")],
    );
    assert_eq!(outcome.matches.len(), expected);
}

#[rstest]
fn hints_are_collected_per_query(adapter: ToyAdapter) {
    let outcome = run(
        &adapter,
        &["{ a: 1 }", "f()"],
        &SearchConfig::default(),
        vec![SourceFile::new("a.toy", "f()")],
    );
    assert_eq!(outcome.hints.len(), 2);
    assert_eq!(outcome.hints.first().map(Vec::len), Some(1));
    assert_eq!(outcome.hints.get(1).map(Vec::len), Some(0));
}
