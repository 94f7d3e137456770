//! Python.

use sift_core::{CHILDREN, Field, Node, NodeKinds, Span};

use crate::dialect::Dialect;

const KINDS: NodeKinds = NodeKinds {
    identifiers: &["identifier"],
    strings: &["string_content"],
    numbers: &["integer", "float"],
    programs: &["module"],
    block: "block",
    statement_wrappers: &["expression_statement"],
    parenthesized: Some("parenthesized_expression"),
    equivalent: &[],
    default_values: &[
        ("default_parameter", "name"),
        ("typed_default_parameter", "name"),
    ],
    type_annotation: None,
};

pub(crate) struct PythonDialect;

pub(crate) static PYTHON: PythonDialect = PythonDialect;

impl Dialect for PythonDialect {
    fn kinds(&self) -> &'static NodeKinds {
        &KINDS
    }

    fn leaf_kinds(&self) -> &'static [&'static str] {
        &["string_content"]
    }

    fn modifiers(&self) -> &'static [&'static str] {
        &["async"]
    }

    fn encodes_wildcards(&self) -> bool {
        true
    }

    fn finish(&self, node: &mut Node) {
        if node.kind() == "string" {
            insert_empty_content(node);
        }
    }

    fn should_compare(&self, node: &Node) -> bool {
        !matches!(node.kind(), "string_start" | "string_end")
    }
}

/// Gives `""` a `string_content` child so string wildcards can match it.
fn insert_empty_content(node: &mut Node) {
    let Some(Field::Nodes(parts)) = node.field_mut(CHILDREN) else {
        return;
    };
    let has_body = parts
        .iter()
        .any(|part| matches!(part.kind(), "string_content" | "interpolation"));
    if has_body {
        return;
    }
    let Some(start) = parts.first().filter(|part| part.kind() == "string_start") else {
        return;
    };
    let end = start.span().end();
    let byte = start.span().end_byte();
    parts.insert(
        1,
        Node::leaf("string_content", "", Span::new(byte, byte, end, end)),
    );
}
