//! Recursive validation of the keys a comparison queued.

use std::cmp::Reverse;

use crate::aliases::AliasBindingSet;
use crate::compare::{Comparison, MatchContext, compare};
use crate::config::Mode;
use crate::node::{Field, Node};

/// Returns `true` when `query` matches `file` at every depth.
#[must_use]
pub fn validate(
    cx: &MatchContext<'_>,
    file: &Node,
    query: &Node,
    aliases: &mut AliasBindingSet,
) -> bool {
    let comparison = compare(cx, Some(file), Some(query), aliases);
    comparison.level_match && validate_keys(cx, file, query, &comparison, aliases)
}

/// Walks the key pairs of a level match and validates each pair.
pub(crate) fn validate_keys(
    cx: &MatchContext<'_>,
    file: &Node,
    query: &Node,
    comparison: &Comparison,
    aliases: &mut AliasBindingSet,
) -> bool {
    if comparison.query_keys.len() != comparison.file_keys.len() {
        cx.report_invariant(&format!(
            "key count mismatch comparing {} with {}: {} query keys, {} file keys",
            query.kind(),
            file.kind(),
            comparison.query_keys.len(),
            comparison.file_keys.len(),
        ));
        return false;
    }

    comparison
        .query_keys
        .iter()
        .zip(&comparison.file_keys)
        .all(|(query_key, file_key)| {
            match (query.resolve(query_key), file.resolve(file_key)) {
                (Some(Field::Node(query_child)), Some(Field::Node(file_child))) => {
                    validate(cx, file_child, query_child, aliases)
                }
                (Some(Field::Nodes(query_children)), Some(Field::Nodes(file_children))) => {
                    validate_sequence(cx, file_children, query_children, aliases)
                }
                _ => false,
            }
        })
}

/// Matches a query sequence against a file sequence according to the mode.
fn validate_sequence(
    cx: &MatchContext<'_>,
    file: &[Node],
    query: &[Node],
    aliases: &mut AliasBindingSet,
) -> bool {
    let adapter = cx.adapter();
    let file: Vec<&Node> = file.iter().filter(|n| adapter.should_compare(n)).collect();
    let query: Vec<&Node> = query.iter().filter(|n| adapter.should_compare(n)).collect();

    if cx.mode() == Mode::Exact {
        return file.len() == query.len()
            && file
                .iter()
                .zip(&query)
                .all(|(file_node, query_node)| validate(cx, file_node, query_node, aliases));
    }

    if query.len() > file.len() {
        return false;
    }

    let mut order: Vec<usize> = (0..query.len()).collect();
    order.sort_by_key(|&index| query.get(index).map(|node| specificity(cx, node)));

    let mut claimed = vec![false; file.len()];
    let mut positions: Vec<Option<usize>> = vec![None; query.len()];
    for query_index in order {
        let Some(query_node) = query.get(query_index) else {
            return false;
        };
        let found = file.iter().enumerate().find_map(|(file_index, file_node)| {
            if claimed.get(file_index).copied().unwrap_or(true) {
                return None;
            }
            let mut trial = aliases.clone();
            validate(cx, file_node, query_node, &mut trial).then_some((file_index, trial))
        });
        let Some((file_index, trial)) = found else {
            return false;
        };
        *aliases = trial;
        if let Some(slot) = claimed.get_mut(file_index) {
            *slot = true;
        }
        if let Some(slot) = positions.get_mut(query_index) {
            *slot = Some(file_index);
        }
    }

    cx.mode() != Mode::IncludeWithOrder
        || positions
            .windows(2)
            .all(|pair| matches!(pair, [Some(earlier), Some(later)] if earlier < later))
}

/// Sort key placing the most constrained query elements first: nodes without
/// identifier wildcards, then identifier wildcards with longer literal text,
/// then node-tree wildcards.
fn specificity(cx: &MatchContext<'_>, node: &Node) -> (u8, Reverse<usize>) {
    let wildcards = cx.wildcards();
    let name = node
        .text()
        .filter(|_| cx.adapter().kinds().is_identifier(node.kind()))
        .filter(|text| wildcards.has_wildcard(text));
    match name {
        None => (0, Reverse(0)),
        Some(text) if wildcards.is_node_tree(text) => (2, Reverse(0)),
        Some(text) => (1, Reverse(wildcards.literal_len(text))),
    }
}
