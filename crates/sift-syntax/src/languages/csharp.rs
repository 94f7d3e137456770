//! C#.

use std::borrow::Cow;

use sift_core::NodeKinds;

use crate::dialect::{Dialect, strip_quotes};

const KINDS: NodeKinds = NodeKinds {
    identifiers: &["identifier"],
    strings: &["string_literal", "verbatim_string_literal"],
    numbers: &["integer_literal", "real_literal"],
    programs: &["compilation_unit"],
    block: "block",
    statement_wrappers: &["global_statement", "expression_statement"],
    parenthesized: Some("parenthesized_expression"),
    equivalent: &[],
    default_values: &[],
    type_annotation: None,
};

pub(crate) struct CSharpDialect;

pub(crate) static CSHARP: CSharpDialect = CSharpDialect;

impl Dialect for CSharpDialect {
    fn kinds(&self) -> &'static NodeKinds {
        &KINDS
    }

    fn leaf_kinds(&self) -> &'static [&'static str] {
        &["string_literal"]
    }

    fn encodes_wildcards(&self) -> bool {
        true
    }

    fn sanitize<'t>(&self, kind: &str, text: &'t str) -> Cow<'t, str> {
        match kind {
            "string_literal" => Cow::Borrowed(strip_quotes(text, &['"'])),
            "verbatim_string_literal" => {
                Cow::Borrowed(strip_quotes(text.strip_prefix('@').unwrap_or(text), &['"']))
            }
            _ => Cow::Borrowed(text),
        }
    }

    fn wrap_for_retry(&self, text: &str) -> String {
        format!("({text});")
    }
}
