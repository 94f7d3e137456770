//! Field shapes read from a grammar's `node-types.json`.
//!
//! The converter needs to know, for every named node kind, which fields hold
//! several nodes and which fields may be absent. Tables are parsed once per
//! language and cached for the life of the process.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;

#[derive(Debug, Deserialize)]
struct RawNodeType {
    #[serde(rename = "type")]
    kind: String,
    named: bool,
    #[serde(default)]
    fields: HashMap<String, Arity>,
    children: Option<Arity>,
}

/// How many nodes a field holds and whether it may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Arity {
    /// The field may hold several nodes.
    pub multiple: bool,
    /// The field is always present.
    pub required: bool,
}

/// The fields and unnamed children of one node kind.
#[derive(Debug, Clone, Default)]
pub struct KindShape {
    fields: HashMap<String, Arity>,
    children: Option<Arity>,
}

impl KindShape {
    /// Returns `true` when the kind has neither fields nor unnamed children.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.fields.is_empty() && self.children.is_none()
    }

    /// Returns the arity of a named field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Arity> {
        self.fields.get(name).copied()
    }

    /// Returns the arity of the unnamed children.
    #[must_use]
    pub const fn children(&self) -> Option<Arity> {
        self.children
    }
}

/// The node-type table of one grammar.
#[derive(Debug, Clone, Default)]
pub struct NodeTypes {
    kinds: HashMap<String, KindShape>,
}

impl NodeTypes {
    /// Parses a `node-types.json` document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the document is malformed.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let raw: Vec<RawNodeType> = serde_json::from_str(json)?;
        let kinds = raw
            .into_iter()
            .filter(|entry| entry.named)
            .map(|entry| {
                (
                    entry.kind,
                    KindShape {
                        fields: entry.fields,
                        children: entry.children,
                    },
                )
            })
            .collect();
        Ok(Self { kinds })
    }

    /// Returns the shape of `kind`, if the grammar declares it.
    #[must_use]
    pub fn shape(&self, kind: &str) -> Option<&KindShape> {
        self.kinds.get(kind)
    }

    /// Returns `true` when `field` of `kind` may hold several nodes.
    ///
    /// Unknown fields are treated as single.
    #[must_use]
    pub fn is_multiple(&self, kind: &str, field: &str) -> bool {
        self.shape(kind)
            .and_then(|shape| shape.field(field))
            .is_some_and(|arity| arity.multiple)
    }

    /// Returns `true` when `field` of `kind` may be absent.
    ///
    /// Unnamed children are looked up under `children_key`. Fields the
    /// grammar does not declare, such as modifier tokens, are optional.
    #[must_use]
    pub fn is_optional(&self, kind: &str, field: &str, children_key: &str) -> bool {
        let Some(shape) = self.shape(kind) else {
            return true;
        };
        let arity = if field == children_key {
            shape.children()
        } else {
            shape.field(field)
        };
        arity.is_none_or(|arity| !arity.required)
    }
}

static TABLES: [OnceCell<NodeTypes>; 9] = [const { OnceCell::new() }; 9];

/// Returns the cached node-type table for `language`.
///
/// # Errors
///
/// Returns [`SyntaxError::NodeTypes`] when the bundled document is
/// malformed.
pub fn node_types(language: SupportedLanguage) -> Result<&'static NodeTypes, SyntaxError> {
    let Some(cell) = TABLES.get(language.index()) else {
        return Ok(empty());
    };
    cell.get_or_try_init(|| {
        NodeTypes::parse(language.node_types_json())
            .map_err(|source| SyntaxError::NodeTypes { language, source })
    })
}

fn empty() -> &'static NodeTypes {
    static EMPTY: OnceCell<NodeTypes> = OnceCell::new();
    EMPTY.get_or_init(NodeTypes::default)
}
