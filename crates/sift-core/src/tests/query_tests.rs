//! Tests for query parsing, hints and token extraction.

use crate::tests::support::{TOY_KINDS, ToyAdapter};
use crate::{
    HintTokenKind, Node, NodeKinds, ParseFailure, ParserAdapter, SearchConfig, SearchError,
    parse_query,
};

static WRAPPING_KINDS: NodeKinds = NodeKinds {
    statement_wrappers: &["parenthesized"],
    ..TOY_KINDS
};

/// The toy grammar with parentheses treated as a statement wrapper.
struct WrappingToy(ToyAdapter);

impl ParserAdapter for WrappingToy {
    fn name(&self) -> &'static str {
        "wrapping-toy"
    }

    fn parse(&self, source: &str) -> Result<Node, ParseFailure> {
        self.0.parse(source)
    }

    fn kinds(&self) -> &NodeKinds {
        &WRAPPING_KINDS
    }

    fn is_field_optional(&self, kind: &str, field: &str) -> bool {
        self.0.is_field_optional(kind, field)
    }
}

#[test]
fn rejects_long_wildcard_runs_with_position() {
    let err = parse_query(&ToyAdapter::default(), "f(a)\nfoo$$$$", &SearchConfig::default())
        .err()
        .map(|err| err.to_string());
    insta::assert_snapshot!(err.unwrap_or_default(), @"invalid wildcard at line 2, column 4");
}

#[test]
fn rejects_blank_queries() {
    let result = parse_query(&ToyAdapter::default(), " \n\t", &SearchConfig::default());
    assert!(matches!(result, Err(SearchError::EmptyQuery)));
}

#[test]
fn single_statement_is_used_directly() {
    let query = parse_query(&ToyAdapter::default(), "f(x)", &SearchConfig::default())
        .unwrap_or_else(|err| panic!("query should parse: {err}"));
    assert_eq!(query.node().kind(), "call");
    assert!(!query.is_multistatement());
    assert_eq!(query.text(), "f(x)");
}

#[test]
fn user_parentheses_are_kept() {
    let query = parse_query(&ToyAdapter::default(), "(x)", &SearchConfig::default())
        .unwrap_or_else(|err| panic!("query should parse: {err}"));
    assert_eq!(query.node().kind(), "parenthesized");
}

#[test]
fn statement_wrappers_are_peeled_to_their_only_child() {
    let adapter = WrappingToy(ToyAdapter::default());
    let query = parse_query(&adapter, "((f(x)))", &SearchConfig::default())
        .unwrap_or_else(|err| panic!("query should parse: {err}"));
    assert_eq!(query.node().kind(), "call");
}

#[test]
fn several_statements_become_a_block() {
    let query = parse_query(&ToyAdapter::default(), "a()\nb()", &SearchConfig::default())
        .unwrap_or_else(|err| panic!("query should parse: {err}"));
    assert!(query.is_multistatement());
    assert_eq!(query.node().kind(), "block");
    assert_eq!(query.node().children().len(), 2);
}

#[test]
fn parse_failures_report_first_location() {
    let err = parse_query(&ToyAdapter::default(), "f(a b)", &SearchConfig::default()).err();
    match err {
        Some(SearchError::QueryParse { location, .. }) => {
            assert_eq!(location.map(|at| (at.line, at.column)), Some((1, 6)));
        }
        other => panic!("expected a query parse error, got {other:?}"),
    }
}

#[test]
fn object_like_queries_get_a_hint() {
    let err = parse_query(&ToyAdapter::default(), "{ key: 1 }", &SearchConfig::default())
        .err()
        .unwrap_or_else(|| panic!("toy grammar has no objects"));
    let hint = err.hints().first().cloned().unwrap_or_else(|| panic!("expected a hint"));
    assert_eq!(
        hint.text,
        "To look for object, add expression brackets ({ key:val })"
    );
    let kinds: Vec<_> = hint.tokens.iter().map(|token| token.kind).collect();
    assert_eq!(kinds, vec![HintTokenKind::Text, HintTokenKind::Code]);
}

#[test]
fn broken_string_queries_get_a_hint() {
    let err = parse_query(&ToyAdapter::default(), "'unterminated", &SearchConfig::default())
        .err()
        .unwrap_or_else(|| panic!("unterminated string should fail"));
    let texts: Vec<_> = err.hints().iter().map(|hint| hint.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["To look for string, add expression brackets ('some string')"]
    );
}

#[test]
fn collects_literal_tokens() {
    let query = parse_query(
        &ToyAdapter::default(),
        "fooBar($$_x, 'hello  big world', 42, 0x0, ab$$cd, $$$)",
        &SearchConfig::default(),
    )
    .unwrap_or_else(|err| panic!("query should parse: {err}"));
    let tokens: Vec<_> = query.unique_tokens().iter().cloned().collect();
    assert_eq!(
        tokens,
        vec!["42", "ab", "big", "cd", "fooBar", "hello", "world"]
    );
}

#[test]
fn case_insensitive_tokens_are_lowercased() {
    let config = SearchConfig::default().with_case_insensitive(true);
    let query = parse_query(&ToyAdapter::default(), "getUser(x)", &config)
        .unwrap_or_else(|err| panic!("query should parse: {err}"));
    assert!(query.unique_tokens().contains("getuser"));
}
