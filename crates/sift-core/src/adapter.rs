//! The boundary between the matcher and a concrete parser.
//!
//! A [`ParserAdapter`] turns source text into [`Node`] trees and describes the
//! grammar's node kinds through [`NodeKinds`]. Grammar quirks that the generic
//! comparator cannot express are supplied as [`CompareRule`]s.

use std::borrow::Cow;

use camino::Utf8Path;
use tracing::trace;

use crate::aliases::AliasBindingSet;
use crate::config::Mode;
use crate::node::{CHILDREN, Field, FieldPath, Node};
use crate::span::LineCol;
use crate::wildcard::{WildcardKind, WildcardSyntax};

/// Grammar-specific node kind tables.
#[derive(Debug, Clone, Copy)]
pub struct NodeKinds {
    /// Kinds holding identifier names.
    pub identifiers: &'static [&'static str],
    /// Kinds holding string content that wildcards may match.
    pub strings: &'static [&'static str],
    /// Kinds holding numeric literals.
    pub numbers: &'static [&'static str],
    /// Kinds of the root node.
    pub programs: &'static [&'static str],
    /// Kind used for the synthetic block wrapping multi-statement queries.
    pub block: &'static str,
    /// Statement wrappers unwrapped when a query is a single statement.
    pub statement_wrappers: &'static [&'static str],
    /// Parenthesised expression kind unwrapped after the retry wrapper.
    pub parenthesized: Option<&'static str>,
    /// Pairs of kinds that compare as the same kind.
    pub equivalent: &'static [(&'static str, &'static str)],
    /// Default-value kinds and the field holding their identifier.
    pub default_values: &'static [(&'static str, &'static str)],
    /// Field holding an identifier's type annotation, if the grammar has one.
    pub type_annotation: Option<&'static str>,
}

impl NodeKinds {
    /// Returns `true` for identifier kinds.
    #[must_use]
    pub fn is_identifier(&self, kind: &str) -> bool {
        self.identifiers.contains(&kind)
    }

    /// Returns `true` for string-like kinds.
    #[must_use]
    pub fn is_string(&self, kind: &str) -> bool {
        self.strings.contains(&kind)
    }

    /// Returns `true` for numeric literal kinds.
    #[must_use]
    pub fn is_number(&self, kind: &str) -> bool {
        self.numbers.contains(&kind)
    }

    /// Returns `true` for root kinds.
    #[must_use]
    pub fn is_program(&self, kind: &str) -> bool {
        self.programs.contains(&kind)
    }

    /// Returns `true` when two kinds compare as equal.
    #[must_use]
    pub fn same_kind(&self, left: &str, right: &str) -> bool {
        left == right
            || self
                .equivalent
                .iter()
                .any(|(a, b)| (*a == left && *b == right) || (*a == right && *b == left))
    }

    /// Returns the identifier field of a default-value kind.
    #[must_use]
    pub fn default_value_field(&self, kind: &str) -> Option<&'static str> {
        self.default_values
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, field)| *field)
    }
}

/// A parse failure reported by an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// Description of the failure.
    pub message: String,
    /// One-based location of the failure, when known.
    pub location: Option<LineCol>,
}

impl ParseFailure {
    /// Creates a failure.
    #[must_use]
    pub fn new(message: impl Into<String>, location: Option<LineCol>) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Settings a [`CompareRule`] may consult.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The active match mode.
    pub mode: Mode,
    /// Whether values compare case-insensitively.
    pub case_insensitive: bool,
    /// The wildcard markers in use.
    pub wildcards: &'a WildcardSyntax,
}

impl RuleContext<'_> {
    /// Matches `value` against the wildcard pattern `pattern`, checking and
    /// binding aliases of the given kind.
    ///
    /// An invalid pattern never matches.
    #[must_use]
    pub fn match_wildcard_text(
        &self,
        pattern: &str,
        value: &str,
        kind: WildcardKind,
        aliases: &mut AliasBindingSet,
    ) -> bool {
        match self.wildcards.compile(pattern, self.case_insensitive) {
            Ok(compiled) => aliases.match_text(&compiled, value, kind, self.case_insensitive),
            Err(err) => {
                trace!(%err, "wildcard pattern rejected");
                false
            }
        }
    }
}

/// The outcome of a [`CompareRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleVerdict {
    /// Whether the nodes match at this level.
    pub level_match: bool,
    /// Query keys to validate recursively.
    pub query_keys: Vec<FieldPath>,
    /// File keys paired with `query_keys`.
    pub file_keys: Vec<FieldPath>,
}

impl RuleVerdict {
    /// A verdict that rejects the pair.
    #[must_use]
    pub const fn reject() -> Self {
        Self {
            level_match: false,
            query_keys: Vec::new(),
            file_keys: Vec::new(),
        }
    }

    /// A verdict that accepts the pair and validates the given key pairs.
    #[must_use]
    pub fn accept(pairs: Vec<(FieldPath, FieldPath)>) -> Self {
        let (query_keys, file_keys) = pairs.into_iter().unzip();
        Self {
            level_match: true,
            query_keys,
            file_keys,
        }
    }
}

/// A grammar-specific comparison step.
///
/// Returning `None` passes the pair on to the next step. Aliases bound by a
/// rule that then returns `None` stay bound.
pub trait CompareRule: Send + Sync {
    /// Compares a file node with a query node.
    fn apply(
        &self,
        file: &Node,
        query: &Node,
        cx: &RuleContext<'_>,
        aliases: &mut AliasBindingSet,
    ) -> Option<RuleVerdict>;
}

/// Parses one language and describes its nodes.
pub trait ParserAdapter: Send + Sync {
    /// Short name used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Parses source text into a tree rooted at a program node.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] when the source contains syntax errors.
    fn parse(&self, source: &str) -> Result<Node, ParseFailure>;

    /// Returns the grammar's kind tables.
    fn kinds(&self) -> &NodeKinds;

    /// Returns `true` when `field` may be absent on nodes of `kind`.
    fn is_field_optional(&self, kind: &str, field: &str) -> bool;

    /// Normalises a leaf value before comparison.
    fn sanitize<'t>(&self, _kind: &str, text: &'t str) -> Cow<'t, str> {
        Cow::Borrowed(text)
    }

    /// Returns `false` for nodes ignored when comparing sequences.
    fn should_compare(&self, _node: &Node) -> bool {
        true
    }

    /// Rewrites query text before it is parsed.
    fn preprocess_query<'q>(&self, text: &'q str) -> Cow<'q, str> {
        Cow::Borrowed(text)
    }

    /// Rewrites the parsed query tree.
    fn postprocess_query(&self, node: Node) -> Node {
        node
    }

    /// Wraps query text for the second parse attempt.
    fn wrap_for_retry(&self, text: &str) -> String {
        format!("({text})")
    }

    /// Returns the top-level statements of a parsed query. `wrapped` is set
    /// when the text only parsed inside [`ParserAdapter::wrap_for_retry`].
    fn query_statements(&self, mut root: Node, _wrapped: bool) -> Vec<Node> {
        match root.take_field(CHILDREN) {
            Some(Field::Nodes(nodes)) => nodes,
            _ => Vec::new(),
        }
    }

    /// Rules tried before wildcard handling.
    fn rules_before_wildcards(&self) -> &[&'static dyn CompareRule] {
        &[]
    }

    /// Rules tried after wildcard handling and before the generic fallback.
    fn rules_after_wildcards(&self) -> &[&'static dyn CompareRule] {
        &[]
    }
}

/// Picks the adapter responsible for a file.
pub trait AdapterResolver {
    /// Returns the adapter for `path`, or `None` when the file is not
    /// supported.
    fn resolve(&self, path: &Utf8Path) -> Option<&dyn ParserAdapter>;
}

/// Resolves every path to the same adapter.
#[derive(Clone, Copy)]
pub struct SingleAdapter<'a>(pub &'a dyn ParserAdapter);

impl AdapterResolver for SingleAdapter<'_> {
    fn resolve(&self, _path: &Utf8Path) -> Option<&dyn ParserAdapter> {
        Some(self.0)
    }
}
