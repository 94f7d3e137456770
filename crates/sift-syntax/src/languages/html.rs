//! HTML.

use sift_core::{CHILDREN, Field, LineCol, Node, NodeKinds, Span};

use crate::dialect::{Dialect, collapse_whitespace};

const KINDS: NodeKinds = NodeKinds {
    identifiers: &["tag_name", "attribute_name"],
    strings: &["text", "attribute_value"],
    numbers: &[],
    programs: &["document"],
    block: "document",
    statement_wrappers: &[],
    parenthesized: None,
    equivalent: &[("self_closing_tag", "start_tag")],
    default_values: &[],
    type_annotation: None,
};

pub(crate) struct HtmlDialect;

pub(crate) static HTML: HtmlDialect = HtmlDialect;

impl Dialect for HtmlDialect {
    fn kinds(&self) -> &'static NodeKinds {
        &KINDS
    }

    fn leaf_text(&self, kind: &str, raw: &str) -> String {
        if kind == "text" {
            collapse_whitespace(raw)
        } else {
            raw.to_owned()
        }
    }

    fn finish(&self, node: &mut Node) {
        if node.kind() == "element" {
            trim_implicit_close(node);
            return;
        }
        if node.kind() == "quoted_attribute_value" && node.children().is_empty() {
            let span = *node.span();
            let byte = span.start_byte() + 1;
            let at = LineCol::new(span.start().line(), span.start().column() + 1);
            let inside = Span::new(byte, byte, at, at);
            node.set_field(
                CHILDREN,
                Field::Nodes(vec![Node::leaf("attribute_value", "", inside)]),
            );
        }
    }

    fn should_compare(&self, node: &Node) -> bool {
        match node.kind() {
            "end_tag" => false,
            "text" => node.text().is_some_and(|text| !text.is_empty()),
            _ => true,
        }
    }

    fn wrap_for_retry(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// Ends a void or unclosed element at its last meaningful child, so the
/// whitespace the grammar folds into the implicit close is not reported.
fn trim_implicit_close(node: &mut Node) {
    let children = node.children();
    if children.iter().any(|child| child.kind() == "end_tag") {
        return;
    }
    let Some(last) = children
        .iter()
        .rev()
        .find(|child| !(child.kind() == "text" && child.text().is_some_and(str::is_empty)))
    else {
        return;
    };
    let span = *node.span();
    let end = *last.span();
    node.set_span(Span::new(
        span.start_byte(),
        end.end_byte(),
        span.start(),
        end.end(),
    ));
}
