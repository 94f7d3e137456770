//! [`ParserAdapter`] implementation backed by Tree-sitter.

use std::borrow::Cow;

use sift_core::{
    CHILDREN, CompareRule, Node, NodeKinds, ParseFailure, ParserAdapter, WildcardSyntax,
};
use tracing::trace;

use crate::convert::{Converter, first_syntax_error};
use crate::dialect::Dialect;
use crate::encoding::{decode_tree, encode};
use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::languages::dialect_for;
use crate::node_types::{NodeTypes, node_types};

/// A parser adapter for one [`SupportedLanguage`].
pub struct LanguageAdapter {
    language: SupportedLanguage,
    grammar: tree_sitter::Language,
    dialect: &'static dyn Dialect,
    types: &'static NodeTypes,
    wildcards: WildcardSyntax,
}

impl LanguageAdapter {
    /// Creates an adapter that recognises the given wildcard markers in
    /// queries.
    ///
    /// # Errors
    ///
    /// Returns an error when the grammar cannot be loaded into a parser or
    /// its node-type table is malformed.
    pub fn new(language: SupportedLanguage, wildcards: WildcardSyntax) -> Result<Self, SyntaxError> {
        let grammar = language.tree_sitter_language();
        tree_sitter::Parser::new()
            .set_language(&grammar)
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;
        Ok(Self {
            language,
            grammar,
            dialect: dialect_for(language),
            types: node_types(language)?,
            wildcards,
        })
    }

    /// Returns the adapter's language.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    fn tree(&self, source: &str) -> Result<tree_sitter::Tree, ParseFailure> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.grammar)
            .map_err(|e| ParseFailure::new(e.to_string(), None))?;
        parser.parse(source, None).ok_or_else(|| {
            let err = SyntaxError::NoTree {
                language: self.language,
            };
            ParseFailure::new(err.to_string(), None)
        })
    }
}

impl ParserAdapter for LanguageAdapter {
    fn name(&self) -> &'static str {
        self.language.as_str()
    }

    fn parse(&self, source: &str) -> Result<Node, ParseFailure> {
        let tree = self.tree(source)?;
        let root = tree.root_node();
        if let Some(failure) = first_syntax_error(root) {
            trace!(language = %self.language, message = %failure.message, "syntax error");
            return Err(failure);
        }
        Converter::new(source, self.dialect, self.types).convert(root)
    }

    fn kinds(&self) -> &NodeKinds {
        self.dialect.kinds()
    }

    fn is_field_optional(&self, kind: &str, field: &str) -> bool {
        self.types.is_optional(kind, field, CHILDREN)
    }

    fn sanitize<'t>(&self, kind: &str, text: &'t str) -> Cow<'t, str> {
        self.dialect.sanitize(kind, text)
    }

    fn should_compare(&self, node: &Node) -> bool {
        self.dialect.should_compare(node)
    }

    fn preprocess_query<'q>(&self, text: &'q str) -> Cow<'q, str> {
        if self.dialect.encodes_wildcards() {
            encode(text, &self.wildcards)
        } else {
            Cow::Borrowed(text)
        }
    }

    fn postprocess_query(&self, mut node: Node) -> Node {
        if self.dialect.encodes_wildcards() {
            decode_tree(&mut node, &self.wildcards);
        }
        node
    }

    fn wrap_for_retry(&self, text: &str) -> String {
        self.dialect.wrap_for_retry(text)
    }

    fn query_statements(&self, root: Node, wrapped: bool) -> Vec<Node> {
        self.dialect.query_statements(root, wrapped)
    }

    fn rules_before_wildcards(&self) -> &[&'static dyn CompareRule] {
        self.dialect.rules_before_wildcards()
    }

    fn rules_after_wildcards(&self) -> &[&'static dyn CompareRule] {
        self.dialect.rules_after_wildcards()
    }
}
