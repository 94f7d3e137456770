//! JavaScript, TypeScript and TSX.

use std::borrow::Cow;

use sift_core::{
    AliasBindingSet, CHILDREN, CompareRule, Field, FieldPath, LineCol, Mode, Node, NodeKinds,
    RuleContext, RuleVerdict, Span, WildcardKind,
};

use crate::dialect::{Dialect, collapse_whitespace, strip_quotes};

const JAVASCRIPT_KINDS: NodeKinds = NodeKinds {
    identifiers: &[
        "identifier",
        "property_identifier",
        "shorthand_property_identifier",
        "shorthand_property_identifier_pattern",
        "private_property_identifier",
        "statement_identifier",
    ],
    strings: &["string", "string_fragment", "jsx_text"],
    numbers: &["number"],
    programs: &["program"],
    block: "statement_block",
    statement_wrappers: &["expression_statement"],
    parenthesized: Some("parenthesized_expression"),
    equivalent: &[],
    default_values: &[
        ("assignment_pattern", "left"),
        ("object_assignment_pattern", "left"),
    ],
    type_annotation: None,
};

const TYPESCRIPT_KINDS: NodeKinds = NodeKinds {
    identifiers: &[
        "identifier",
        "property_identifier",
        "shorthand_property_identifier",
        "shorthand_property_identifier_pattern",
        "private_property_identifier",
        "statement_identifier",
        "type_identifier",
        "predefined_type",
    ],
    ..JAVASCRIPT_KINDS
};

/// The ECMAScript family. TypeScript and TSX share one instance.
pub(crate) struct EcmaDialect {
    kinds: &'static NodeKinds,
    modifiers: &'static [&'static str],
}

pub(crate) static JAVASCRIPT: EcmaDialect = EcmaDialect {
    kinds: &JAVASCRIPT_KINDS,
    modifiers: &["async", "static", "get", "set", "*", "default"],
};

pub(crate) static TYPESCRIPT: EcmaDialect = EcmaDialect {
    kinds: &TYPESCRIPT_KINDS,
    modifiers: &[
        "async", "static", "get", "set", "*", "default", "readonly", "abstract", "declare",
        "override",
    ],
};

static RULES_BEFORE: [&dyn CompareRule; 1] = [&JsxSelfClosing];

static RULES_AFTER: [&dyn CompareRule; 3] =
    [&DestructureBeforeRename, &PropertyShapes, &OptionalChain];

impl Dialect for EcmaDialect {
    fn kinds(&self) -> &'static NodeKinds {
        self.kinds
    }

    fn leaf_kinds(&self) -> &'static [&'static str] {
        &["string"]
    }

    fn modifiers(&self) -> &'static [&'static str] {
        self.modifiers
    }

    fn leaf_text(&self, kind: &str, raw: &str) -> String {
        if kind == "jsx_text" {
            collapse_whitespace(raw)
        } else {
            raw.to_owned()
        }
    }

    fn finish(&self, node: &mut Node) {
        if node.kind() == "template_string" {
            merge_template_fragments(node);
        }
    }

    fn sanitize<'t>(&self, kind: &str, text: &'t str) -> Cow<'t, str> {
        if kind == "string" {
            Cow::Borrowed(strip_quotes(text, &['\'', '"']))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn should_compare(&self, node: &Node) -> bool {
        node.kind() != "jsx_text" || node.text().is_some_and(|text| !text.is_empty())
    }

    fn rules_before_wildcards(&self) -> &'static [&'static dyn CompareRule] {
        &RULES_BEFORE
    }

    fn rules_after_wildcards(&self) -> &'static [&'static dyn CompareRule] {
        &RULES_AFTER
    }
}

/// Rewrites template children so text fragments and substitutions alternate,
/// starting and ending with a fragment. Adjacent fragments and escape
/// sequences merge into one fragment; missing ones are inserted empty.
fn merge_template_fragments(node: &mut Node) {
    let parts = match node.take_field(CHILDREN) {
        Some(Field::Nodes(parts)) => parts,
        _ => Vec::new(),
    };
    let opening = node.span();
    let mut position = empty_span(
        opening.start_byte() + 1,
        LineCol::new(opening.start().line(), opening.start().column() + 1),
    );

    let mut merged = Vec::with_capacity(parts.len() * 2 + 1);
    let mut pending: Option<(String, Span)> = None;
    for part in parts {
        if part.kind() == "template_substitution" {
            merged.push(fragment(pending.take(), position));
            position = empty_span(part.span().end_byte(), part.span().end());
            merged.push(part);
            continue;
        }
        let text = part.text().unwrap_or_default();
        pending = Some(pending.take().map_or_else(
            || (text.to_owned(), *part.span()),
            |(mut joined, span)| {
                joined.push_str(text);
                (joined, span.cover(part.span()))
            },
        ));
    }
    merged.push(fragment(pending, position));
    node.set_field(CHILDREN, Field::Nodes(merged));
}

fn fragment(pending: Option<(String, Span)>, position: Span) -> Node {
    let (text, span) = pending.unwrap_or((String::new(), position));
    Node::leaf("string_fragment", text, span)
}

const fn empty_span(byte: usize, at: LineCol) -> Span {
    Span::new(byte, byte, at, at)
}

/// Lets `<X />` and `<X></X>` match each other.
///
/// The self-closing side's `name` and `attribute` fields are paired with the
/// same fields of the expanded element's opening tag. In exact mode the
/// expanded element must be empty and both sides must agree on having
/// attributes.
struct JsxSelfClosing;

const SELF_CLOSING: &str = "jsx_self_closing_element";
const ELEMENT: &str = "jsx_element";
const OPEN_TAG: &str = "open_tag";

impl CompareRule for JsxSelfClosing {
    fn apply(
        &self,
        file: &Node,
        query: &Node,
        cx: &RuleContext<'_>,
        _aliases: &mut AliasBindingSet,
    ) -> Option<RuleVerdict> {
        match (query.kind(), file.kind()) {
            (SELF_CLOSING, ELEMENT) => {
                if cx.mode == Mode::Exact && has_content(file) {
                    return Some(RuleVerdict::reject());
                }
                Some(pair_tags(query, FieldPath::direct, file, open_tag_path, cx))
            }
            (ELEMENT, SELF_CLOSING) => {
                if has_content(query) {
                    return Some(RuleVerdict::reject());
                }
                Some(pair_tags(query, open_tag_path, file, FieldPath::direct, cx))
            }
            _ => None,
        }
    }
}

fn open_tag_path(field: &'static str) -> FieldPath {
    FieldPath::nested(&[OPEN_TAG, field])
}

fn has_content(element: &Node) -> bool {
    element
        .children()
        .iter()
        .any(|child| child.kind() != "jsx_text" || child.text().is_some_and(|t| !t.is_empty()))
}

fn pair_tags(
    query: &Node,
    query_path: fn(&'static str) -> FieldPath,
    file: &Node,
    file_path: fn(&'static str) -> FieldPath,
    cx: &RuleContext<'_>,
) -> RuleVerdict {
    let mut pairs = Vec::new();
    for field in ["name", "attribute"] {
        let (query_key, file_key) = (query_path(field), file_path(field));
        let in_query = query.resolve(&query_key).is_some();
        let in_file = file.resolve(&file_key).is_some();
        match (in_query, in_file) {
            (true, true) => pairs.push((query_key, file_key)),
            (true, false) => return RuleVerdict::reject(),
            (false, true) if cx.mode == Mode::Exact => return RuleVerdict::reject(),
            (false, _) => {}
        }
    }
    RuleVerdict::accept(pairs)
}

/// Lets a destructured property match the same property bound to a new
/// name: `const { a } = o` finds `const { a: b } = o`, and renames to
/// different names match each other. Include modes only.
struct DestructureBeforeRename;

const SHORTHAND_PATTERN: &str = "shorthand_property_identifier_pattern";
const PAIR_PATTERN: &str = "pair_pattern";

impl CompareRule for DestructureBeforeRename {
    fn apply(
        &self,
        file: &Node,
        query: &Node,
        cx: &RuleContext<'_>,
        aliases: &mut AliasBindingSet,
    ) -> Option<RuleVerdict> {
        if !cx.mode.is_include() {
            return None;
        }
        let (query_key, file_key) = match (query.kind(), file.kind()) {
            (SHORTHAND_PATTERN, PAIR_PATTERN) if renames(file) => {
                (query.text()?, plain_key(file)?)
            }
            (PAIR_PATTERN, SHORTHAND_PATTERN) if renames(query) => {
                (plain_key(query)?, file.text()?)
            }
            (PAIR_PATTERN, PAIR_PATTERN) if renames(query) && renames(file) => {
                (plain_key(query)?, plain_key(file)?)
            }
            _ => return None,
        };
        Some(verdict(text_matches(
            cx,
            aliases,
            query_key,
            file_key,
            WildcardKind::Identifier,
        )))
    }
}

/// Returns `true` for `key: name` patterns that bind a plain identifier.
fn renames(pair: &Node) -> bool {
    pair.child("value")
        .is_some_and(|value| value.kind() == "identifier")
}

fn plain_key(pair: &Node) -> Option<&str> {
    pair.child("key")
        .filter(|key| key.kind() == "property_identifier")
        .and_then(Node::text)
}

/// Matches object properties written in different shapes: `{ a }` and
/// `{ a: a }`, or keys spelled as a name, a string or a number. Include
/// modes only.
struct PropertyShapes;

const SHORTHAND: &str = "shorthand_property_identifier";
const PAIR: &str = "pair";

impl CompareRule for PropertyShapes {
    fn apply(
        &self,
        file: &Node,
        query: &Node,
        cx: &RuleContext<'_>,
        aliases: &mut AliasBindingSet,
    ) -> Option<RuleVerdict> {
        if !cx.mode.is_include() {
            return None;
        }
        match (query.kind(), file.kind()) {
            (SHORTHAND, PAIR) => {
                let name = query.text()?;
                let (key, value) = (key_text(file.child("key")?)?, file.child("value")?);
                let value_matches = value.kind() == "identifier"
                    && value.text().is_some_and(|bound| same_text(cx, name, bound));
                Some(verdict(
                    value_matches && text_matches(cx, aliases, name, &key, WildcardKind::Identifier),
                ))
            }
            (PAIR, SHORTHAND) => {
                let name = file.text()?;
                let (key, value) = (key_text(query.child("key")?)?, query.child("value")?);
                let value_matches = value.kind() == "identifier"
                    && value.text().is_some_and(|pattern| {
                        text_matches(cx, aliases, pattern, name, WildcardKind::Identifier)
                    });
                Some(verdict(
                    value_matches && text_matches(cx, aliases, &key, name, WildcardKind::Identifier),
                ))
            }
            (PAIR, PAIR) => {
                let (query_key, file_key) = (query.child("key")?, file.child("key")?);
                if query_key.kind() == file_key.kind() {
                    return None;
                }
                let (pattern, value) = (key_text(query_key)?, key_text(file_key)?);
                if !text_matches(cx, aliases, &pattern, &value, WildcardKind::String) {
                    return Some(RuleVerdict::reject());
                }
                let value_path = FieldPath::direct("value");
                Some(RuleVerdict::accept(vec![(value_path.clone(), value_path)]))
            }
            _ => None,
        }
    }
}

/// Lets `a?.b` in a query match `a.b` in include modes. The reverse already
/// holds because `optional_chain` is an optional field.
struct OptionalChain;

const OPTIONAL_CHAIN: &str = "optional_chain";

impl CompareRule for OptionalChain {
    fn apply(
        &self,
        file: &Node,
        query: &Node,
        cx: &RuleContext<'_>,
        _aliases: &mut AliasBindingSet,
    ) -> Option<RuleVerdict> {
        let chained = matches!(
            query.kind(),
            "member_expression" | "subscript_expression" | "call_expression"
        );
        if !cx.mode.is_include()
            || !chained
            || query.kind() != file.kind()
            || query.field(OPTIONAL_CHAIN).is_none()
            || file.field(OPTIONAL_CHAIN).is_some()
        {
            return None;
        }
        let pairs: Vec<(FieldPath, FieldPath)> = query
            .fields()
            .filter(|(name, field)| *name != OPTIONAL_CHAIN && field.holds_nodes())
            .map(|(name, _)| (FieldPath::direct(name), FieldPath::direct(name)))
            .collect();
        if pairs.iter().any(|(_, key)| file.resolve(key).is_none()) {
            return Some(RuleVerdict::reject());
        }
        Some(RuleVerdict::accept(pairs))
    }
}

/// Returns a property key as written, without quotes for string keys.
fn key_text(key: &Node) -> Option<Cow<'_, str>> {
    let text = key.text()?;
    match key.kind() {
        "property_identifier" | "number" => Some(Cow::Borrowed(text)),
        "string" => Some(Cow::Borrowed(strip_quotes(text, &['\'', '"']))),
        _ => None,
    }
}

fn text_matches(
    cx: &RuleContext<'_>,
    aliases: &mut AliasBindingSet,
    pattern: &str,
    value: &str,
    kind: WildcardKind,
) -> bool {
    if cx.wildcards.has_wildcard(pattern) {
        cx.match_wildcard_text(pattern, value, kind, aliases)
    } else {
        same_text(cx, pattern, value)
    }
}

fn same_text(cx: &RuleContext<'_>, left: &str, right: &str) -> bool {
    if cx.case_insensitive {
        left.to_lowercase() == right.to_lowercase()
    } else {
        left == right
    }
}

fn verdict(level_match: bool) -> RuleVerdict {
    if level_match {
        RuleVerdict::accept(Vec::new())
    } else {
        RuleVerdict::reject()
    }
}
