//! Lua.

use std::borrow::Cow;

use sift_core::{Node, NodeKinds};

use crate::dialect::{Dialect, strip_quotes, take_children};

const KINDS: NodeKinds = NodeKinds {
    identifiers: &["identifier"],
    strings: &["string"],
    numbers: &["number"],
    programs: &["chunk"],
    block: "block",
    statement_wrappers: &[],
    parenthesized: Some("parenthesized_expression"),
    equivalent: &[],
    default_values: &[],
    type_annotation: None,
};

pub(crate) struct LuaDialect;

pub(crate) static LUA: LuaDialect = LuaDialect;

impl Dialect for LuaDialect {
    fn kinds(&self) -> &'static NodeKinds {
        &KINDS
    }

    fn leaf_kinds(&self) -> &'static [&'static str] {
        &["string"]
    }

    fn modifiers(&self) -> &'static [&'static str] {
        &["local"]
    }

    fn encodes_wildcards(&self) -> bool {
        true
    }

    fn sanitize<'t>(&self, kind: &str, text: &'t str) -> Cow<'t, str> {
        if kind == "string" {
            Cow::Borrowed(strip_quotes(text, &['\'', '"']))
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Bare expressions are not statements in Lua, so they are retried as
    /// the value of a `return`.
    fn wrap_for_retry(&self, text: &str) -> String {
        format!("return {text}")
    }

    fn query_statements(&self, root: Node, wrapped: bool) -> Vec<Node> {
        let statements = take_children(root);
        if !wrapped {
            return statements;
        }
        statements
            .into_iter()
            .filter(|statement| statement.kind() == "return_statement")
            .flat_map(take_children)
            .flat_map(|values| {
                if values.kind() == "expression_list" {
                    take_children(values)
                } else {
                    vec![values]
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{CHILDREN, LineCol, Span};

    fn span() -> Span {
        Span::new(0, 0, LineCol::new(0, 0), LineCol::new(0, 0))
    }

    #[test]
    fn strings_lose_either_quote() {
        assert_eq!(LUA.sanitize("string", "'hi'"), "hi");
        assert_eq!(LUA.sanitize("string", "\"hi\""), "hi");
        assert_eq!(LUA.sanitize("string", "[[hi]]"), "[[hi]]");
        assert_eq!(LUA.sanitize("identifier", "'hi'"), "'hi'");
    }

    #[test]
    fn wrapped_query_yields_the_returned_values() {
        let values = Node::branch("expression_list", span()).with_children(
            CHILDREN,
            vec![
                Node::leaf("identifier", "a", span()),
                Node::leaf("number", "1", span()),
            ],
        );
        let returned =
            Node::branch("return_statement", span()).with_children(CHILDREN, vec![values]);
        let root = Node::branch("chunk", span()).with_children(CHILDREN, vec![returned]);

        let statements = LUA.query_statements(root, true);

        let kinds: Vec<_> = statements.iter().map(Node::kind).collect();
        assert_eq!(kinds, ["identifier", "number"]);
    }

    #[test]
    fn retry_returns_the_expression() {
        assert_eq!(LUA.wrap_for_retry("a + 1"), "return a + 1");
    }
}
