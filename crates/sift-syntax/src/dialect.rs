//! Per-grammar behaviour layered over the shared tree-sitter conversion.
//!
//! A [`Dialect`] supplies the kind tables and the handful of hooks where a
//! grammar needs special treatment. [`crate::LanguageAdapter`] combines a
//! dialect with a parser and the grammar's node-type table.

use std::borrow::Cow;

use sift_core::{CHILDREN, CompareRule, Field, Node, NodeKinds};

/// Grammar-specific tables and hooks.
pub trait Dialect: Send + Sync {
    /// Returns the kind tables handed to the matcher.
    fn kinds(&self) -> &'static NodeKinds;

    /// Kinds converted to leaves even though the grammar gives them children.
    fn leaf_kinds(&self) -> &'static [&'static str] {
        &[]
    }

    /// Anonymous keywords kept as tokens under their own name.
    fn modifiers(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns `true` when query text must have its wildcards encoded before
    /// parsing.
    fn encodes_wildcards(&self) -> bool {
        false
    }

    /// Builds the text stored on a leaf from its source slice.
    fn leaf_text(&self, _kind: &str, raw: &str) -> String {
        raw.to_owned()
    }

    /// Adjusts a converted node once all its children are attached.
    fn finish(&self, _node: &mut Node) {}

    /// Normalises a leaf value before comparison.
    fn sanitize<'t>(&self, _kind: &str, text: &'t str) -> Cow<'t, str> {
        Cow::Borrowed(text)
    }

    /// Returns `false` for nodes ignored when comparing sequences.
    fn should_compare(&self, _node: &Node) -> bool {
        true
    }

    /// Wraps query text for the second parse attempt.
    fn wrap_for_retry(&self, text: &str) -> String {
        format!("({text})")
    }

    /// Returns the top-level statements of a parsed query.
    fn query_statements(&self, root: Node, _wrapped: bool) -> Vec<Node> {
        take_children(root)
    }

    /// Rules tried before wildcard handling.
    fn rules_before_wildcards(&self) -> &'static [&'static dyn CompareRule] {
        &[]
    }

    /// Rules tried after wildcard handling.
    fn rules_after_wildcards(&self) -> &'static [&'static dyn CompareRule] {
        &[]
    }
}

/// Removes and returns the unnamed children of `node`.
pub(crate) fn take_children(mut node: Node) -> Vec<Node> {
    match node.take_field(CHILDREN) {
        Some(Field::Nodes(nodes)) => nodes,
        Some(Field::Node(node)) => vec![*node],
        _ => Vec::new(),
    }
}

/// Strips one layer of matching quote characters.
pub(crate) fn strip_quotes<'t>(text: &'t str, quotes: &[char]) -> &'t str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && quotes.contains(&open) => {
            text.get(open.len_utf8()..text.len() - close.len_utf8())
                .unwrap_or(text)
        }
        _ => text,
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
