//! Conversion from Tree-sitter trees to matcher [`Node`]s.
//!
//! Only named nodes survive. A named child reached through a field lands
//! under that field, as a list when the grammar allows several nodes there.
//! Other named children land under [`CHILDREN`]. Anonymous tokens are kept
//! only when they sit in a field (operators, declaration keywords) or are
//! one of the dialect's modifier keywords.
//!
//! Trees nested deeper than [`MAX_DEPTH`] are rejected rather than converted,
//! since matching recurses over the converted tree.

use std::mem;

use sift_core::{CHILDREN, Field, LineCol, Node, ParseFailure};

use crate::dialect::Dialect;
use crate::node_types::NodeTypes;
use crate::position::{node_span, point_to_one_based};

/// Deepest node nesting a converted tree may have.
pub(crate) const MAX_DEPTH: usize = 512;

pub(crate) struct Converter<'a> {
    source: &'a str,
    dialect: &'a dyn Dialect,
    types: &'a NodeTypes,
}

impl<'a> Converter<'a> {
    pub(crate) const fn new(source: &'a str, dialect: &'a dyn Dialect, types: &'a NodeTypes) -> Self {
        Self {
            source,
            dialect,
            types,
        }
    }

    /// Converts `node` and everything below it.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] when the tree is nested deeper than
    /// [`MAX_DEPTH`].
    pub(crate) fn convert(&self, node: tree_sitter::Node<'_>) -> Result<Node, ParseFailure> {
        self.convert_at(node, 0)
    }

    fn convert_at(&self, node: tree_sitter::Node<'_>, depth: usize) -> Result<Node, ParseFailure> {
        if depth > MAX_DEPTH {
            return Err(ParseFailure::new(
                format!("nesting deeper than {MAX_DEPTH} levels"),
                Some(point_to_one_based(node.start_position())),
            ));
        }
        let kind = node.kind();
        let span = node_span(node);
        if self.is_leaf(node) {
            let raw = self.source.get(node.byte_range()).unwrap_or_default();
            return Ok(Node::leaf(kind, self.dialect.leaf_text(kind, raw), span));
        }

        let mut converted = Node::branch(kind, span);
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                self.attach(&mut converted, cursor.node(), cursor.field_name(), depth)?;
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        self.dialect.finish(&mut converted);
        Ok(converted)
    }

    fn is_leaf(&self, node: tree_sitter::Node<'_>) -> bool {
        let kind = node.kind();
        if self.dialect.leaf_kinds().contains(&kind) {
            return true;
        }
        self.types
            .shape(kind)
            .map_or(node.named_child_count() == 0, |shape| shape.is_terminal())
    }

    fn attach(
        &self,
        parent: &mut Node,
        child: tree_sitter::Node<'_>,
        field: Option<&'static str>,
        depth: usize,
    ) -> Result<(), ParseFailure> {
        if child.is_extra() {
            return Ok(());
        }
        if child.is_named() {
            let converted = self.convert_at(child, depth + 1)?;
            match field {
                Some(name) if self.types.is_multiple(parent.kind(), name) => {
                    push_node(parent, name, converted);
                }
                Some(name) => parent.set_field(name, Field::Node(Box::new(converted))),
                None => push_node(parent, CHILDREN, converted),
            }
            return Ok(());
        }

        let token = child.kind();
        if let Some(name) = field {
            push_token(parent, name, token);
        } else if let Some(&modifier) = self.dialect.modifiers().iter().find(|m| **m == token) {
            parent.set_field(modifier, Field::Token(modifier.to_owned()));
        }
        Ok(())
    }
}

fn push_node(parent: &mut Node, name: &'static str, child: Node) {
    match parent.field_mut(name) {
        Some(Field::Nodes(nodes)) => nodes.push(child),
        Some(slot) => {
            let mut nodes = match mem::replace(slot, Field::Nodes(Vec::new())) {
                Field::Node(previous) => vec![*previous],
                Field::Nodes(nodes) => nodes,
                Field::Token(_) => Vec::new(),
            };
            nodes.push(child);
            *slot = Field::Nodes(nodes);
        }
        None => parent.set_field(name, Field::Nodes(vec![child])),
    }
}

fn push_token(parent: &mut Node, name: &'static str, token: &str) {
    match parent.field_mut(name) {
        Some(Field::Token(existing)) => {
            existing.push(' ');
            existing.push_str(token);
        }
        _ => parent.set_field(name, Field::Token(token.to_owned())),
    }
}

/// Returns the first ERROR or MISSING node, in document order, as a parse
/// failure.
///
/// The walk uses a cursor instead of recursion, so arbitrarily deep trees
/// are safe to scan. Subtrees without errors are not entered.
pub(crate) fn first_syntax_error(root: tree_sitter::Node<'_>) -> Option<ParseFailure> {
    if !root.has_error() {
        return None;
    }
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(syntax_failure(node));
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn syntax_failure(node: tree_sitter::Node<'_>) -> ParseFailure {
    let message = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        "syntax error".to_owned()
    };
    let location: LineCol = point_to_one_based(node.start_position());
    ParseFailure::new(message, Some(location))
}
