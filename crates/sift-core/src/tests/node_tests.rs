//! Tests for [`Node`] helpers.

use crate::tests::support::{parse, statement};
use crate::{CHILDREN, Field, FieldPath, LineCol, Node, Span, TEXT_KEY};

fn span(start: usize, end: usize) -> Span {
    Span::new(start, end, LineCol::new(0, start as u32), LineCol::new(0, end as u32))
}

#[test]
fn structural_equality_ignores_spans() {
    let first = statement("foo(a, 1)");
    let second = parse("\n\n   foo(a, 1)").children().first().cloned();
    assert!(second.is_some_and(|node| node.structurally_eq(&first)));
}

#[test]
fn structural_equality_sees_text_changes() {
    assert!(!statement("foo(a)").structurally_eq(&statement("foo(b)")));
    assert!(!statement("foo(a)").structurally_eq(&statement("foo(a, b)")));
}

#[test]
fn resolves_nested_paths() {
    let call = statement("outer(x)");
    let path = FieldPath::nested(&["function"]).prefixed("unused");
    assert_eq!(path.to_string(), "unused.function");
    assert!(call.resolve(&path).is_none());

    let arguments = call
        .resolve(&FieldPath::nested(&["arguments", CHILDREN]))
        .and_then(Field::as_nodes)
        .map(<[Node]>::len);
    assert_eq!(arguments, Some(1));
}

#[test]
fn keys_list_fields_then_text() {
    let ident = Node::leaf("identifier", "x", span(0, 1))
        .with_child("type", Node::leaf("type_identifier", "int", span(2, 5)));
    assert_eq!(ident.keys(), vec!["type", TEXT_KEY]);
    assert!(ident.has_key(TEXT_KEY));
    assert!(!Node::branch("arguments", span(0, 2)).has_key(TEXT_KEY));
}

#[test]
fn set_field_replaces_existing_value() {
    let mut node = Node::branch("call", span(0, 3)).with_field("op", Field::Token("+".to_owned()));
    node.set_field("op", Field::Token("-".to_owned()));
    assert_eq!(node.field("op").and_then(Field::as_token), Some("-"));
    assert_eq!(node.fields().count(), 1);
    assert!(node.take_field("op").is_some());
    assert!(node.field("op").is_none());
}

#[test]
fn walk_visits_in_pre_order() {
    let tree = statement("f(g(x), y)");
    let mut kinds = Vec::new();
    tree.walk(&mut |node| kinds.push(node.text().unwrap_or(node.kind()).to_owned()));
    assert_eq!(
        kinds,
        vec!["call", "f", "arguments", "call", "g", "arguments", "x", "y"]
    );
}
