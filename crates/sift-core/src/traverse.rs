//! Pre-order traversal collecting every subtree that matches a query.

use crate::aliases::AliasBindingSet;
use crate::compare::{MatchContext, compare};
use crate::node::{Field, Node};
use crate::validate::validate_keys;

/// A matched file subtree and the aliases it bound.
#[derive(Debug, Clone)]
pub struct RawMatch<'t> {
    /// The matched node.
    pub node: &'t Node,
    /// Aliases bound while matching.
    pub aliases: AliasBindingSet,
}

/// Finds every node under `root` (inclusive) that matches `query`.
///
/// Each candidate starts with fresh alias bindings. Matching nodes are still
/// descended into, so nested matches are reported after their ancestors.
#[must_use]
pub fn traverse<'t>(cx: &MatchContext<'_>, root: &'t Node, query: &Node) -> Vec<RawMatch<'t>> {
    let mut matches = Vec::new();
    visit(cx, root, query, &mut matches);
    matches
}

fn visit<'t>(cx: &MatchContext<'_>, node: &'t Node, query: &Node, out: &mut Vec<RawMatch<'t>>) {
    let mut aliases = AliasBindingSet::new();
    let comparison = compare(cx, Some(node), Some(query), &mut aliases);
    if comparison.level_match && validate_keys(cx, node, query, &comparison, &mut aliases) {
        out.push(RawMatch { node, aliases });
    }

    for key in &comparison.file_keys_for_other_matches {
        match node.field(key) {
            Some(Field::Node(child)) => visit(cx, child, query, out),
            Some(Field::Nodes(children)) => {
                for child in children {
                    visit(cx, child, query, out);
                }
            }
            _ => {}
        }
    }
}
