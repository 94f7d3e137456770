//! Rust.

use std::borrow::Cow;

use sift_core::NodeKinds;

use crate::dialect::{Dialect, strip_quotes};

const KINDS: NodeKinds = NodeKinds {
    identifiers: &[
        "identifier",
        "field_identifier",
        "type_identifier",
        "shorthand_field_identifier",
        "primitive_type",
    ],
    strings: &["string_literal"],
    numbers: &["integer_literal", "float_literal"],
    programs: &["source_file"],
    block: "block",
    statement_wrappers: &["expression_statement"],
    parenthesized: Some("parenthesized_expression"),
    equivalent: &[],
    default_values: &[],
    type_annotation: None,
};

pub(crate) struct RustDialect;

pub(crate) static RUST: RustDialect = RustDialect;

impl Dialect for RustDialect {
    fn kinds(&self) -> &'static NodeKinds {
        &KINDS
    }

    fn leaf_kinds(&self) -> &'static [&'static str] {
        &["string_literal"]
    }

    fn modifiers(&self) -> &'static [&'static str] {
        &["async", "unsafe", "move", "const"]
    }

    fn encodes_wildcards(&self) -> bool {
        true
    }

    fn sanitize<'t>(&self, kind: &str, text: &'t str) -> Cow<'t, str> {
        if kind == "string_literal" {
            Cow::Borrowed(strip_quotes(text, &['"']))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn wrap_for_retry(&self, text: &str) -> String {
        format!("({text});")
    }
}
