//! Alias bindings collected while a query matches.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::node::Node;
use crate::wildcard::{CompiledPattern, WildcardKind};

/// The value an alias was bound to.
#[derive(Debug, Clone, Serialize)]
pub struct AliasBinding {
    value: String,
    #[serde(skip)]
    node: Option<Node>,
}

impl AliasBinding {
    /// Creates a textual binding.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            node: None,
        }
    }

    /// Creates a node-tree binding with the matched code and subtree.
    #[must_use]
    pub fn tree(code: impl Into<String>, node: Node) -> Self {
        Self {
            value: code.into(),
            node: Some(node),
        }
    }

    /// Returns the bound text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the bound subtree for node-tree aliases.
    #[must_use]
    pub const fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }
}

/// Alias bindings of one match, grouped by wildcard kind.
///
/// Identifier and string aliases share one namespace when values are
/// compared: `$$_a` in an identifier and `$$_a` in a string must bind to the
/// same text.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasBindingSet {
    identifier_aliases: BTreeMap<String, AliasBinding>,
    string_aliases: BTreeMap<String, AliasBinding>,
    node_tree_aliases: BTreeMap<String, AliasBinding>,
}

impl AliasBindingSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifier_aliases.is_empty()
            && self.string_aliases.is_empty()
            && self.node_tree_aliases.is_empty()
    }

    /// Returns the identifier bindings.
    #[must_use]
    pub const fn identifier_aliases(&self) -> &BTreeMap<String, AliasBinding> {
        &self.identifier_aliases
    }

    /// Returns the string bindings.
    #[must_use]
    pub const fn string_aliases(&self) -> &BTreeMap<String, AliasBinding> {
        &self.string_aliases
    }

    /// Returns the node-tree bindings.
    #[must_use]
    pub const fn node_tree_aliases(&self) -> &BTreeMap<String, AliasBinding> {
        &self.node_tree_aliases
    }

    /// Looks up a textual binding in the shared identifier/string namespace.
    #[must_use]
    pub fn textual(&self, alias: &str) -> Option<&AliasBinding> {
        self.identifier_aliases
            .get(alias)
            .or_else(|| self.string_aliases.get(alias))
    }

    /// Binds a textual alias of the given kind.
    pub fn bind(&mut self, kind: WildcardKind, alias: impl Into<String>, binding: AliasBinding) {
        let map = match kind {
            WildcardKind::Identifier => &mut self.identifier_aliases,
            WildcardKind::String => &mut self.string_aliases,
            WildcardKind::NodeTree => &mut self.node_tree_aliases,
        };
        map.insert(alias.into(), binding);
    }

    /// Checks a node-tree alias against `node`, binding it on first use.
    pub(crate) fn match_node_tree(&mut self, alias: &str, code: &str, node: &Node) -> bool {
        match self.node_tree_aliases.get(alias).and_then(AliasBinding::node) {
            Some(bound) => bound.structurally_eq(node),
            None => {
                self.node_tree_aliases
                    .insert(alias.to_owned(), AliasBinding::tree(code, node.clone()));
                true
            }
        }
    }

    /// Matches `value` against a compiled wildcard pattern, checking and
    /// recording alias captures.
    ///
    /// Nothing is recorded when the match fails.
    pub(crate) fn match_text(
        &mut self,
        pattern: &CompiledPattern,
        value: &str,
        kind: WildcardKind,
        case_insensitive: bool,
    ) -> bool {
        let Some(captures) = pattern.regex.captures(value) else {
            return false;
        };
        let mut fresh: Vec<(&str, &str)> = Vec::new();
        for (alias, group) in &pattern.aliases {
            let captured = captures.name(group).map_or("", |m| m.as_str());
            let previous = self
                .textual(alias)
                .map(AliasBinding::value)
                .or_else(|| {
                    fresh
                        .iter()
                        .find(|(name, _)| name == alias)
                        .map(|(_, text)| *text)
                });
            match previous {
                Some(bound) if !same_text(bound, captured, case_insensitive) => return false,
                Some(_) => {}
                None => fresh.push((alias, captured)),
            }
        }
        for (alias, captured) in fresh {
            self.bind(kind, alias, AliasBinding::text(captured));
        }
        true
    }
}

fn same_text(left: &str, right: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        left.to_lowercase() == right.to_lowercase()
    } else {
        left == right
    }
}
