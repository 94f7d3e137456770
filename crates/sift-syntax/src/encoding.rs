//! Wildcard encoding for grammars that reject the `$` marker.
//!
//! Python, C#, CSS, Rust and Lua do not accept `$` in identifiers, so query
//! text is rewritten to use placeholder identifiers before parsing and the
//! placeholders are turned back into markers in the parsed tree.

use std::borrow::Cow;

use sift_core::{Field, Node, WildcardSyntax};

const REQUIRED_PLACEHOLDER: &str = "a_x_3_x_a";
const OPTIONAL_PLACEHOLDER: &str = "a_x_2_x_a";

/// Replaces wildcard markers with placeholder identifiers.
#[must_use]
pub fn encode<'q>(text: &'q str, wildcards: &WildcardSyntax) -> Cow<'q, str> {
    let required = wildcards.required();
    let optional = wildcards.optional();
    if !text.contains(&optional) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace(&required, REQUIRED_PLACEHOLDER)
            .replace(&optional, OPTIONAL_PLACEHOLDER),
    )
}

/// Replaces placeholder identifiers with wildcard markers.
#[must_use]
pub fn decode<'t>(text: &'t str, wildcards: &WildcardSyntax) -> Cow<'t, str> {
    if !text.contains(REQUIRED_PLACEHOLDER) && !text.contains(OPTIONAL_PLACEHOLDER) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace(REQUIRED_PLACEHOLDER, &wildcards.required())
            .replace(OPTIONAL_PLACEHOLDER, &wildcards.optional()),
    )
}

/// Decodes every leaf text and token in a parsed query.
pub fn decode_tree(root: &mut Node, wildcards: &WildcardSyntax) {
    root.walk_mut(&mut |node: &mut Node| {
        if let Some(decoded) = node.text().and_then(|text| owned(decode(text, wildcards))) {
            node.set_text(Some(decoded));
        }
        let tokens: Vec<&'static str> = node
            .fields()
            .filter(|(_, field)| matches!(field, Field::Token(_)))
            .map(|(name, _)| name)
            .collect();
        for name in tokens {
            if let Some(Field::Token(token)) = node.field_mut(name)
                && let Some(decoded) = owned(decode(token, wildcards))
            {
                *token = decoded;
            }
        }
    });
}

fn owned(text: Cow<'_, str>) -> Option<String> {
    match text {
        Cow::Owned(text) => Some(text),
        Cow::Borrowed(_) => None,
    }
}
