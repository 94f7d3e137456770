//! Query parsing.
//!
//! A query is ordinary source code in the adapter's language, possibly
//! containing wildcards. Parsing runs in this order:
//!
//! 1. reject runs of four or more wildcard markers
//! 2. reject blank queries
//! 3. let the adapter rewrite the text (for grammars where `$` is not an
//!    identifier character)
//! 4. parse, and on failure parse again inside the adapter's retry wrapper
//! 5. let the adapter rewrite the tree
//! 6. reduce the program to a single statement, or wrap several statements
//!    in a block

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::adapter::ParserAdapter;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::filter::unique_tokens;
use crate::node::{CHILDREN, Field, Node};
use crate::span::LineCol;

/// Whether a hint fragment is prose or code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HintTokenKind {
    /// Prose.
    Text,
    /// Code the user can copy.
    Code,
}

/// One fragment of a [`Hint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HintToken {
    /// Fragment kind.
    pub kind: HintTokenKind,
    /// Fragment text.
    pub content: String,
}

/// A suggestion for rewriting a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    /// The full hint as plain text.
    pub text: String,
    /// The hint split into prose and code fragments.
    pub tokens: Vec<HintToken>,
}

impl Hint {
    fn new(prose: &str, code: &str) -> Self {
        Self {
            text: format!("{prose}{code}"),
            tokens: vec![
                HintToken {
                    kind: HintTokenKind::Text,
                    content: prose.to_owned(),
                },
                HintToken {
                    kind: HintTokenKind::Code,
                    content: code.to_owned(),
                },
            ],
        }
    }
}

/// A query ready for matching.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    text: String,
    node: Node,
    unique_tokens: BTreeSet<String>,
    is_multistatement: bool,
    hints: Vec<Hint>,
}

impl ParsedQuery {
    /// Returns the query text as written.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the query tree.
    #[must_use]
    pub const fn node(&self) -> &Node {
        &self.node
    }

    /// Returns the literal tokens a file must contain to possibly match.
    #[must_use]
    pub const fn unique_tokens(&self) -> &BTreeSet<String> {
        &self.unique_tokens
    }

    /// Returns `true` when the query holds several statements.
    #[must_use]
    pub const fn is_multistatement(&self) -> bool {
        self.is_multistatement
    }

    /// Returns hints about the query.
    #[must_use]
    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }
}

/// Parses query text with `adapter`.
///
/// # Errors
///
/// Returns [`SearchError::InvalidWildcard`] for runs of four or more markers,
/// [`SearchError::EmptyQuery`] when nothing remains to match, and
/// [`SearchError::QueryParse`] when neither the text nor its retry wrapping
/// parses.
pub fn parse_query(
    adapter: &dyn ParserAdapter,
    text: &str,
    config: &SearchConfig,
) -> Result<ParsedQuery, SearchError> {
    if let Some(offset) = config.wildcards().find_invalid(text) {
        let position = one_based(text, offset);
        return Err(SearchError::InvalidWildcard {
            line: position.line,
            column: position.column,
        });
    }
    if text.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let source = adapter.preprocess_query(text);
    let (root, wrapped) = match adapter.parse(&source) {
        Ok(root) => (root, false),
        Err(first) => {
            debug!(adapter = adapter.name(), message = %first.message, "retrying query inside wrapper");
            match adapter.parse(&adapter.wrap_for_retry(&source)) {
                Ok(root) => (root, true),
                Err(_) => {
                    return Err(SearchError::query_parse(first.message, first.location)
                        .with_hints(hints_for(text, true)));
                }
            }
        }
    };

    let root = adapter.postprocess_query(root);
    let root_span = *root.span();
    let mut statements = adapter.query_statements(root, wrapped);
    let (node, is_multistatement) = match statements.len() {
        0 => return Err(SearchError::EmptyQuery),
        1 => {
            let statement = statements.pop().ok_or(SearchError::EmptyQuery)?;
            (unwrap_statement(adapter, statement, wrapped), false)
        }
        _ => (
            Node::branch(adapter.kinds().block, root_span).with_children(CHILDREN, statements),
            true,
        ),
    };

    let unique_tokens = unique_tokens(&node, adapter, config);
    Ok(ParsedQuery {
        text: text.to_owned(),
        node,
        unique_tokens,
        is_multistatement,
        hints: hints_for(text, false),
    })
}

/// Strips statement wrappers (and the retry parentheses) around a lone
/// expression.
fn unwrap_statement(adapter: &dyn ParserAdapter, statement: Node, wrapped: bool) -> Node {
    let kinds = adapter.kinds();
    let mut node = statement;
    loop {
        let unwrappable = kinds.statement_wrappers.contains(&node.kind())
            || (wrapped && kinds.parenthesized == Some(node.kind()));
        if !unwrappable {
            return node;
        }
        match sole_child(&mut node) {
            Some(inner) => node = inner,
            None => return node,
        }
    }
}

fn sole_child(node: &mut Node) -> Option<Node> {
    let name = {
        let mut node_fields = node.fields().filter(|(_, field)| field.holds_nodes());
        let (name, field) = node_fields.next()?;
        let single = match field {
            Field::Node(_) => true,
            Field::Nodes(children) => children.len() == 1,
            Field::Token(_) => false,
        };
        if !single || node_fields.next().is_some() {
            return None;
        }
        name
    };
    match node.take_field(name)? {
        Field::Node(child) => Some(*child),
        Field::Nodes(mut children) => children.pop(),
        Field::Token(_) => None,
    }
}

fn hints_for(text: &str, failed: bool) -> Vec<Hint> {
    let trimmed = text.trim_start();
    let mut hints = Vec::new();
    if trimmed.starts_with('{') {
        hints.push(Hint::new(
            "To look for object, add expression brackets ",
            "({ key:val })",
        ));
    }
    if failed && trimmed.starts_with(['"', '\'', '`']) {
        hints.push(Hint::new(
            "To look for string, add expression brackets ",
            "('some string')",
        ));
    }
    hints
}

/// Converts a byte offset into a one-based line and character column.
fn one_based(text: &str, offset: usize) -> LineCol {
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |last| last.chars().count())
        + 1;
    LineCol::new(
        u32::try_from(line).unwrap_or(u32::MAX),
        u32::try_from(column).unwrap_or(u32::MAX),
    )
}
