//! Tests for single-level node comparison.

use rstest::rstest;

use crate::tests::support::{ToyAdapter, context, statement};
use crate::{
    AliasBindingSet, CompareRule, FieldPath, Mode, Node, ParserAdapter, RuleContext, RuleVerdict,
    SearchConfig, WildcardKind, WildcardSyntax, compare,
};

fn compare_statements(config: &SearchConfig, file: &str, query: &str) -> (bool, usize) {
    let adapter = ToyAdapter::default();
    let cx = context(&adapter, config, file);
    let mut aliases = AliasBindingSet::new();
    let comparison = compare(
        &cx,
        Some(&statement(file)),
        Some(&statement(query)),
        &mut aliases,
    );
    (comparison.level_match, comparison.query_keys.len())
}

#[test]
fn missing_nodes_never_match() {
    let adapter = ToyAdapter::default();
    let config = SearchConfig::default();
    let cx = context(&adapter, &config, "f(x)");
    let file = statement("f(x)");
    let comparison = compare(&cx, Some(&file), None, &mut AliasBindingSet::new());
    assert!(!comparison.level_match);
    assert_eq!(comparison.file_keys_for_other_matches, vec!["function", "arguments"]);
}

#[rstest]
#[case::same_identifier("foo", "foo", true)]
#[case::other_identifier("foo", "bar", false)]
#[case::optional_wildcard("fooBar", "foo$$", true)]
#[case::required_wildcard_needs_text("foo", "foo$$$", false)]
#[case::node_tree_matches_call("foo(x)", "$$$", true)]
#[case::node_tree_matches_number("12", "$$$", true)]
#[case::identifier_wildcard_needs_identifier("12", "$$", false)]
#[case::string_wildcard("'hello world'", "'hello $$'", true)]
#[case::string_wildcard_mismatch("'goodbye'", "'hello $$'", false)]
#[case::numeric_wildcard("0x10", "0x0", true)]
#[case::numeric_wildcard_rejects_string("'1'", "0x0", false)]
#[case::quotes_are_sanitised("'a'", "'a'", true)]
fn compares_leaves(#[case] file: &str, #[case] query: &str, #[case] expected: bool) {
    let (level_match, _) = compare_statements(&SearchConfig::default(), file, query);
    assert_eq!(level_match, expected);
}

#[test]
fn generic_fallback_queues_node_keys() {
    let (level_match, keys) = compare_statements(&SearchConfig::default(), "f(x)", "f(y)");
    assert!(level_match, "calls match at their own level");
    assert_eq!(keys, 2);
}

#[test]
fn equivalent_kinds_compare_as_one() {
    let (level_match, _) = compare_statements(&SearchConfig::default(), "new(x)", "other(x)");
    assert!(level_match, "function names are checked one level down");
    let adapter = ToyAdapter::default();
    assert!(adapter.kinds().same_kind("call", "new_call"));
    assert!(!adapter.kinds().same_kind("call", "arguments"));
}

#[test]
fn include_mode_ignores_optional_file_keys() {
    let include = SearchConfig::default();
    let exact = SearchConfig::default().with_mode(Mode::Exact);
    assert!(compare_statements(&include, "x:int", "x").0);
    assert!(!compare_statements(&exact, "x:int", "x").0);
}

#[test]
fn exact_mode_checks_type_annotation_presence_on_wildcards() {
    let exact = SearchConfig::default().with_mode(Mode::Exact);
    assert!(!compare_statements(&exact, "x:int", "$$").0);
    assert!(compare_statements(&exact, "x:int", "$$:int").0);
    assert!(compare_statements(&SearchConfig::default(), "x:int", "$$").0);
}

#[test]
fn default_values_desugar_in_include_mode() {
    assert!(compare_statements(&SearchConfig::default(), "limit = 10", "limit").0);
    let exact = SearchConfig::default().with_mode(Mode::Exact);
    assert!(!compare_statements(&exact, "limit = 10", "limit").0);
}

#[test]
fn case_insensitive_compares_values_loosely() {
    let config = SearchConfig::default().with_case_insensitive(true);
    assert!(compare_statements(&config, "FOO", "foo").0);
    assert!(compare_statements(&config, "getUSER", "get$$_x_User").0);
    assert!(!compare_statements(&SearchConfig::default(), "FOO", "foo").0);
}

#[test]
fn node_tree_alias_binds_code_and_subtree() {
    let adapter = ToyAdapter::default();
    let config = SearchConfig::default();
    let source = "f(a)";
    let cx = context(&adapter, &config, source);
    let mut aliases = AliasBindingSet::new();
    let file = statement(source);
    let query = statement("$$$_whole");
    assert!(compare(&cx, Some(&file), Some(&query), &mut aliases).level_match);
    let bound = aliases.node_tree_aliases().get("whole");
    assert_eq!(bound.map(|binding| binding.value()), Some("f(a)"));
    assert!(bound.and_then(|binding| binding.node()).is_some());

    let other = statement("f(b)");
    assert!(!compare(&cx, Some(&other), Some(&query), &mut aliases).level_match);
}

struct AlwaysReject;

impl CompareRule for AlwaysReject {
    fn apply(
        &self,
        file: &Node,
        _query: &Node,
        _cx: &RuleContext<'_>,
        _aliases: &mut AliasBindingSet,
    ) -> Option<RuleVerdict> {
        (file.kind() == "identifier").then(RuleVerdict::reject)
    }
}

static ALWAYS_REJECT: AlwaysReject = AlwaysReject;

#[test]
fn rules_run_before_wildcards() {
    let adapter = ToyAdapter {
        before: vec![&ALWAYS_REJECT],
    };
    let config = SearchConfig::default();
    let cx = context(&adapter, &config, "x");
    let comparison = compare(
        &cx,
        Some(&statement("x")),
        Some(&statement("$$")),
        &mut AliasBindingSet::new(),
    );
    assert!(!comparison.level_match);
    assert!(comparison.query_keys.is_empty());
    assert_eq!(
        RuleVerdict::accept(vec![(FieldPath::direct("a"), FieldPath::direct("b"))]).query_keys,
        vec![FieldPath::direct("a")]
    );
}

#[test]
fn rule_wildcard_text_binds_and_checks_aliases() {
    let wildcards = WildcardSyntax::default();
    let cx = RuleContext {
        mode: Mode::Include,
        case_insensitive: false,
        wildcards: &wildcards,
    };
    let mut aliases = AliasBindingSet::new();

    assert!(cx.match_wildcard_text("$$_unit", "px", WildcardKind::String, &mut aliases));
    assert_eq!(
        aliases.string_aliases().get("unit").map(|binding| binding.value()),
        Some("px")
    );
    assert!(!cx.match_wildcard_text("$$_unit", "em", WildcardKind::String, &mut aliases));
    assert!(!cx.match_wildcard_text("p$$", "em", WildcardKind::String, &mut aliases));
}
