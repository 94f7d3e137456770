//! CSS.

use std::borrow::Cow;
use std::mem;

use sift_core::{
    AliasBindingSet, CHILDREN, CompareRule, Field, Node, NodeKinds, RuleContext, RuleVerdict,
    WildcardKind,
};

use crate::dialect::{Dialect, strip_quotes, take_children};

const KINDS: NodeKinds = NodeKinds {
    identifiers: &[
        "tag_name",
        "class_name",
        "id_name",
        "property_name",
        "plain_value",
        "attribute_name",
        "feature_name",
        "function_name",
    ],
    strings: &["string_value"],
    numbers: &["integer_value", "float_value"],
    programs: &["stylesheet"],
    block: "block",
    statement_wrappers: &[],
    parenthesized: None,
    equivalent: &[],
    default_values: &[],
    type_annotation: None,
};

pub(crate) struct CssDialect;

pub(crate) static CSS: CssDialect = CssDialect;

static RULES: [&dyn CompareRule; 2] = [&Dimensions, &HashWildcard];

impl Dialect for CssDialect {
    fn kinds(&self) -> &'static NodeKinds {
        &KINDS
    }

    fn leaf_kinds(&self) -> &'static [&'static str] {
        &["string_value", "integer_value", "float_value", "class_name"]
    }

    fn encodes_wildcards(&self) -> bool {
        true
    }

    fn finish(&self, node: &mut Node) {
        if node.kind() == "declaration" {
            join_adjacent_numbers(node);
        }
    }

    fn sanitize<'t>(&self, kind: &str, text: &'t str) -> Cow<'t, str> {
        if kind == "string_value" {
            Cow::Borrowed(strip_quotes(text, &['\'', '"']))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn wrap_for_retry(&self, text: &str) -> String {
        format!("a {{ {text} }}")
    }

    /// A wrapped query yields the declarations inside the synthetic rule.
    fn query_statements(&self, root: Node, wrapped: bool) -> Vec<Node> {
        let statements = take_children(root);
        if !wrapped {
            return statements;
        }
        statements
            .into_iter()
            .flat_map(|rule| {
                take_children(rule)
                    .into_iter()
                    .filter(|part| part.kind() == "block")
                    .flat_map(take_children)
            })
            .collect()
    }

    fn rules_before_wildcards(&self) -> &'static [&'static dyn CompareRule] {
        &RULES
    }
}

fn is_number(kind: &str) -> bool {
    KINDS.is_number(kind)
}

/// Joins a number with the value tokens written directly after it.
///
/// The grammar splits `0x0px` into `0x` and `0px`, and the encoded form of
/// `5$$` into `5a` and `_x_2_x_a`. Joined, they read back as one dimension.
fn join_adjacent_numbers(node: &mut Node) {
    let Some(Field::Nodes(values)) = node.field_mut(CHILDREN) else {
        return;
    };
    let mut joined: Vec<Node> = Vec::with_capacity(values.len());
    for value in mem::take(values) {
        if let Some(previous) = joined.last_mut()
            && is_number(previous.kind())
            && (is_number(value.kind()) || value.kind() == "plain_value")
            && previous.span().end_byte() == value.span().start_byte()
            && let (Some(left), Some(right)) = (previous.text(), value.text())
        {
            let text = format!("{left}{right}");
            let span = previous.span().cover(value.span());
            *previous = Node::leaf(previous.kind(), text, span);
            continue;
        }
        joined.push(value);
    }
    *values = joined;
}

/// Splits a dimension such as `-1.5em` into its number and unit.
fn split_dimension(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut seen_dot = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => {}
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    text.split_at_checked(end).unwrap_or((text, ""))
}

/// Compares dimensions by number and unit, so `0x0px` matches any pixel
/// length and `5$$` matches `5` in any unit.
struct Dimensions;

impl CompareRule for Dimensions {
    fn apply(
        &self,
        file: &Node,
        query: &Node,
        cx: &RuleContext<'_>,
        aliases: &mut AliasBindingSet,
    ) -> Option<RuleVerdict> {
        if !is_number(query.kind()) || !is_number(file.kind()) {
            return None;
        }
        let (query_text, file_text) = (query.text()?, file.text()?);
        let (query_number, query_unit) = match query_text.strip_prefix(cx.wildcards.numeric()) {
            Some(unit) => (None, unit),
            None => {
                let (number, unit) = split_dimension(query_text);
                (Some(number), unit)
            }
        };
        let (file_number, file_unit) = split_dimension(file_text);

        let level_match = query_number.is_none_or(|number| number == file_number)
            && if cx.wildcards.has_wildcard(query_unit) {
                cx.match_wildcard_text(query_unit, file_unit, WildcardKind::String, aliases)
            } else if cx.case_insensitive {
                query_unit.eq_ignore_ascii_case(file_unit)
            } else {
                query_unit == file_unit
            };
        Some(if level_match {
            RuleVerdict::accept(Vec::new())
        } else {
            RuleVerdict::reject()
        })
    }
}

/// Lets a wildcard value match a hex colour: `color: $$` finds `#000`.
struct HashWildcard;

impl CompareRule for HashWildcard {
    fn apply(
        &self,
        file: &Node,
        query: &Node,
        cx: &RuleContext<'_>,
        aliases: &mut AliasBindingSet,
    ) -> Option<RuleVerdict> {
        if query.kind() != "plain_value" || file.kind() != "color_value" {
            return None;
        }
        let pattern = query.text().filter(|text| cx.wildcards.has_wildcard(text))?;
        let hex = file.text()?.strip_prefix('#')?;
        cx.match_wildcard_text(pattern, hex, WildcardKind::String, aliases)
            .then(|| RuleVerdict::accept(Vec::new()))
    }
}
