//! Literal tokens of a query and the cheap pre-parse file filter.
//!
//! A file is only parsed when its raw text contains every literal token of
//! at least one query. Tokens are taken from identifier names, string values
//! and numeric literals with the wildcards cut out, so the filter never
//! rejects a file that could match.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::adapter::ParserAdapter;
use crate::config::SearchConfig;
use crate::node::Node;

const MIN_TOKEN_CHARS: usize = 2;

/// Collects the literal tokens of a query tree.
#[must_use]
pub fn unique_tokens(
    query: &Node,
    adapter: &dyn ParserAdapter,
    config: &SearchConfig,
) -> BTreeSet<String> {
    let kinds = adapter.kinds();
    let wildcards = config.wildcards();
    let mut tokens = BTreeSet::new();
    let mut keep = |fragment: &str| {
        if fragment.chars().count() >= MIN_TOKEN_CHARS {
            tokens.insert(if config.case_insensitive() {
                fragment.to_lowercase()
            } else {
                fragment.to_owned()
            });
        }
    };

    query.walk(&mut |node| {
        let Some(text) = node.text() else {
            return;
        };
        if kinds.is_identifier(node.kind()) {
            for fragment in wildcards.literal_fragments(text) {
                keep(&fragment);
            }
        } else if kinds.is_string(node.kind()) {
            let value = adapter.sanitize(node.kind(), text);
            for fragment in wildcards.literal_fragments(&value) {
                fragment.split_whitespace().for_each(&mut keep);
            }
        } else if kinds.is_number(node.kind()) {
            let literal = text.strip_prefix(wildcards.numeric()).unwrap_or(text);
            for fragment in wildcards.literal_fragments(literal) {
                keep(&fragment);
            }
        }
    });
    tokens
}

/// Returns `true` when `content` holds every token of at least one token
/// set.
#[must_use]
pub fn passes_shallow_filter<'a>(
    content: &str,
    token_sets: impl IntoIterator<Item = &'a BTreeSet<String>>,
    case_insensitive: bool,
) -> bool {
    let haystack = if case_insensitive {
        Cow::Owned(content.to_lowercase())
    } else {
        Cow::Borrowed(content)
    };
    token_sets
        .into_iter()
        .any(|tokens| tokens.iter().all(|token| haystack.contains(token.as_str())))
}
