//! Single-level comparison of a file node with a query node.
//!
//! [`compare`] decides whether two nodes match at their own level and which
//! child keys must be validated recursively. The steps run in a fixed order:
//!
//! 1. a missing node on either side never matches
//! 2. adapter rules that run before wildcards
//! 3. default-value desugaring in include modes
//! 4. identifier wildcards, including node-tree wildcards
//! 5. string wildcards
//! 6. the numeric wildcard
//! 7. block queries against program roots
//! 8. adapter rules that run after wildcards
//! 9. the generic field-by-field fallback

use std::cell::Cell;

use tracing::{error, trace};

use crate::adapter::{ParserAdapter, RuleContext, RuleVerdict};
use crate::aliases::AliasBindingSet;
use crate::config::{Mode, SearchConfig};
use crate::node::{CHILDREN, Field, FieldPath, Node, TEXT_KEY};
use crate::wildcard::{PatternCache, WildcardContext, WildcardKind, WildcardSyntax};

/// Everything the matcher needs while searching one file.
pub struct MatchContext<'a> {
    adapter: &'a dyn ParserAdapter,
    config: &'a SearchConfig,
    source: &'a str,
    patterns: PatternCache,
    invariant_violations: Cell<usize>,
}

impl<'a> MatchContext<'a> {
    /// Creates a context for matching inside `source`.
    #[must_use]
    pub fn new(adapter: &'a dyn ParserAdapter, config: &'a SearchConfig, source: &'a str) -> Self {
        Self {
            adapter,
            config,
            source,
            patterns: PatternCache::default(),
            invariant_violations: Cell::new(0),
        }
    }

    /// Returns the adapter.
    #[must_use]
    pub fn adapter(&self) -> &'a dyn ParserAdapter {
        self.adapter
    }

    /// Returns the active match mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.config.mode()
    }

    /// Returns the wildcard markers.
    #[must_use]
    pub const fn wildcards(&self) -> &WildcardSyntax {
        self.config.wildcards()
    }

    /// Returns the source text being searched.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Returns how many invariant violations the matcher has seen.
    #[must_use]
    pub fn invariant_violations(&self) -> usize {
        self.invariant_violations.get()
    }

    pub(crate) fn report_invariant(&self, message: &str) {
        error!(adapter = self.adapter.name(), "{message}");
        self.invariant_violations
            .set(self.invariant_violations.get() + 1);
    }

    const fn case_insensitive(&self) -> bool {
        self.config.case_insensitive()
    }

    fn rule_context(&self) -> RuleContext<'_> {
        RuleContext {
            mode: self.mode(),
            case_insensitive: self.case_insensitive(),
            wildcards: self.wildcards(),
        }
    }

    fn code(&self, node: &Node) -> &'a str {
        self.source.get(node.span().byte_range()).unwrap_or_default()
    }

    fn match_wildcard_text(
        &self,
        pattern: &str,
        value: &str,
        kind: WildcardKind,
        aliases: &mut AliasBindingSet,
    ) -> bool {
        match self
            .patterns
            .get(self.wildcards(), pattern, self.case_insensitive())
        {
            Ok(compiled) => aliases.match_text(&compiled, value, kind, self.case_insensitive()),
            Err(err) => {
                trace!(%err, "wildcard pattern rejected");
                false
            }
        }
    }
}

/// The result of comparing two nodes at one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Whether the nodes match at this level.
    pub level_match: bool,
    /// Query keys to validate recursively.
    pub query_keys: Vec<FieldPath>,
    /// File keys paired with `query_keys`.
    pub file_keys: Vec<FieldPath>,
    /// Node-valued fields of the file node in which traversal continues.
    pub file_keys_for_other_matches: Vec<&'static str>,
}

impl Comparison {
    fn new(file: Option<&Node>, level_match: bool) -> Self {
        Self {
            level_match,
            query_keys: Vec::new(),
            file_keys: Vec::new(),
            file_keys_for_other_matches: file.map(node_keys).unwrap_or_default(),
        }
    }

    fn from_verdict(file: &Node, verdict: RuleVerdict) -> Self {
        Self {
            level_match: verdict.level_match,
            query_keys: verdict.query_keys,
            file_keys: verdict.file_keys,
            file_keys_for_other_matches: node_keys(file),
        }
    }

    fn with_pairs(mut self, pairs: impl IntoIterator<Item = (FieldPath, FieldPath)>) -> Self {
        for (query_key, file_key) in pairs {
            self.query_keys.push(query_key);
            self.file_keys.push(file_key);
        }
        self
    }
}

fn node_keys(node: &Node) -> Vec<&'static str> {
    node.fields()
        .filter(|(_, field)| field.holds_nodes())
        .map(|(name, _)| name)
        .collect()
}

/// Compares `file` with `query` at one level, binding aliases as wildcards
/// match.
#[must_use]
pub fn compare(
    cx: &MatchContext<'_>,
    file: Option<&Node>,
    query: Option<&Node>,
    aliases: &mut AliasBindingSet,
) -> Comparison {
    let (Some(file), Some(query)) = (file, query) else {
        return Comparison::new(file, false);
    };
    let comparison = compare_present(cx, file, query, aliases);
    trace!(
        query = query.kind(),
        file = file.kind(),
        level_match = comparison.level_match,
        "compared nodes"
    );
    comparison
}

fn compare_present(
    cx: &MatchContext<'_>,
    file: &Node,
    query: &Node,
    aliases: &mut AliasBindingSet,
) -> Comparison {
    let rule_cx = cx.rule_context();
    for rule in cx.adapter().rules_before_wildcards() {
        if let Some(verdict) = rule.apply(file, query, &rule_cx, aliases) {
            return Comparison::from_verdict(file, verdict);
        }
    }

    let kinds = cx.adapter().kinds();
    if cx.mode().is_include()
        && kinds.is_identifier(query.kind())
        && let Some(inner_key) = kinds.default_value_field(file.kind())
    {
        let inner = compare(cx, file.child(inner_key), Some(query), aliases);
        return Comparison {
            level_match: inner.level_match,
            query_keys: inner.query_keys,
            file_keys: inner
                .file_keys
                .into_iter()
                .map(|key| key.prefixed(inner_key))
                .collect(),
            file_keys_for_other_matches: node_keys(file),
        };
    }

    if let Some(comparison) = compare_wildcards(cx, file, query, aliases) {
        return comparison;
    }

    for rule in cx.adapter().rules_after_wildcards() {
        if let Some(verdict) = rule.apply(file, query, &rule_cx, aliases) {
            return Comparison::from_verdict(file, verdict);
        }
    }

    compare_fields(cx, file, query)
}

fn compare_wildcards(
    cx: &MatchContext<'_>,
    file: &Node,
    query: &Node,
    aliases: &mut AliasBindingSet,
) -> Option<Comparison> {
    let kinds = cx.adapter().kinds();
    let wildcards = cx.wildcards();

    if kinds.is_identifier(query.kind())
        && let Some(name) = query.text()
        && wildcards.has_wildcard(name)
    {
        return Some(compare_identifier_wildcard(cx, file, query, name, aliases));
    }

    if kinds.is_string(query.kind()) && query.kind() == file.kind() {
        let query_value = query.text().map(|text| cx.adapter().sanitize(query.kind(), text));
        if let Some(pattern) = query_value.filter(|value| wildcards.has_wildcard(value)) {
            let file_value = file
                .text()
                .map(|text| cx.adapter().sanitize(file.kind(), text))
                .unwrap_or_default();
            let level_match =
                cx.match_wildcard_text(&pattern, &file_value, WildcardKind::String, aliases);
            return Some(Comparison::new(Some(file), level_match));
        }
    }

    if kinds.is_number(query.kind())
        && query.text().is_some_and(|text| wildcards.is_numeric_wildcard(text))
    {
        return Some(Comparison::new(Some(file), kinds.is_number(file.kind())));
    }

    if query.kind() == kinds.block && kinds.is_program(file.kind()) {
        let body = FieldPath::direct(CHILDREN);
        return Some(Comparison::new(Some(file), true).with_pairs([(body.clone(), body)]));
    }

    None
}

fn compare_identifier_wildcard(
    cx: &MatchContext<'_>,
    file: &Node,
    query: &Node,
    name: &str,
    aliases: &mut AliasBindingSet,
) -> Comparison {
    let wildcards = cx.wildcards();
    let kinds = cx.adapter().kinds();

    if wildcards.is_node_tree(name) {
        let alias = wildcards
            .classify(name, WildcardContext::Identifier)
            .into_iter()
            .find_map(|meta| meta.alias);
        let level_match =
            alias.is_none_or(|alias| aliases.match_node_tree(&alias, cx.code(file), file));
        return Comparison::new(Some(file), level_match);
    }

    let mut level_match = kinds.is_identifier(file.kind())
        && file.text().is_some_and(|value| {
            cx.match_wildcard_text(name, value, WildcardKind::Identifier, aliases)
        });
    if cx.mode() == Mode::Exact
        && let Some(annotation) = kinds.type_annotation
    {
        level_match &= query.field(annotation).is_some() == file.field(annotation).is_some();
    }

    let pairs = query
        .fields()
        .filter(|(_, field)| field.holds_nodes())
        .map(|(key, _)| (FieldPath::direct(key), FieldPath::direct(key)))
        .collect::<Vec<_>>();
    Comparison::new(Some(file), level_match).with_pairs(pairs)
}

/// The generic fallback: kinds must agree, scalar values must agree and
/// node-valued keys are queued for validation.
fn compare_fields(cx: &MatchContext<'_>, file: &Node, query: &Node) -> Comparison {
    let adapter = cx.adapter();
    let kinds = adapter.kinds();
    if !kinds.same_kind(query.kind(), file.kind()) {
        return Comparison::new(Some(file), false);
    }

    let query_keys = query.keys();
    let mut file_keys = file.keys();
    if cx.mode().is_include() {
        file_keys.retain(|key| {
            query_keys.contains(key) || !adapter.is_field_optional(file.kind(), key)
        });
    }
    if query_keys.len() != file_keys.len() {
        return Comparison::new(Some(file), false);
    }

    let mut primitives_matched = true;
    let mut all_keys_present = true;
    let mut pairs = Vec::new();
    for key in &query_keys {
        if !file_keys.contains(key) {
            all_keys_present = false;
            continue;
        }
        if *key == TEXT_KEY {
            primitives_matched &= same_value(
                cx,
                &adapter.sanitize(query.kind(), query.text().unwrap_or_default()),
                &adapter.sanitize(file.kind(), file.text().unwrap_or_default()),
            );
            continue;
        }
        match (query.field(key), file.field(key)) {
            (Some(Field::Token(left)), Some(Field::Token(right))) => {
                primitives_matched &= same_value(cx, left, right);
            }
            (Some(_), Some(_)) => pairs.push((FieldPath::direct(key), FieldPath::direct(key))),
            _ => all_keys_present = false,
        }
    }

    Comparison::new(Some(file), primitives_matched && all_keys_present).with_pairs(pairs)
}

fn same_value(cx: &MatchContext<'_>, left: &str, right: &str) -> bool {
    if cx.case_insensitive() {
        left.to_lowercase() == right.to_lowercase()
    } else {
        left == right
    }
}
