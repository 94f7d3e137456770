//! Language-neutral syntax tree used by the matcher.
//!
//! Every adapter converts its parser output into [`Node`] values. A node has
//! a kind, optional leaf text, an ordered list of named fields and a span.
//! Unnamed child nodes live under the [`CHILDREN`] field so the matcher can
//! treat every node-valued key the same way.

use std::fmt;

use crate::span::Span;

/// Field name holding a node's unnamed child nodes.
pub const CHILDREN: &str = "children";

/// Pseudo key under which a node's leaf text is compared.
pub const TEXT_KEY: &str = "#text";

/// The value stored under a node field.
#[derive(Debug, Clone)]
pub enum Field {
    /// A single child node.
    Node(Box<Node>),
    /// An ordered list of child nodes.
    Nodes(Vec<Node>),
    /// An anonymous token, such as an operator or declaration keyword.
    Token(String),
}

impl Field {
    /// Returns the child node when the field holds exactly one.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the child nodes when the field holds a list.
    #[must_use]
    pub fn as_nodes(&self) -> Option<&[Node]> {
        match self {
            Self::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Returns the token text when the field holds a token.
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    /// Returns `true` for node-valued fields.
    #[must_use]
    pub const fn holds_nodes(&self) -> bool {
        matches!(self, Self::Node(_) | Self::Nodes(_))
    }

    fn structurally_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Node(left), Self::Node(right)) => left.structurally_eq(right),
            (Self::Nodes(left), Self::Nodes(right)) => {
                left.len() == right.len()
                    && left.iter().zip(right).all(|(l, r)| l.structurally_eq(r))
            }
            (Self::Token(left), Self::Token(right)) => left == right,
            _ => false,
        }
    }
}

/// A path of field names leading from a node to a nested field.
///
/// Most paths have a single segment. Comparison rules that look through an
/// intermediate node (for example a JSX opening element) use longer paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<&'static str>);

impl FieldPath {
    /// A path naming a field of the node itself.
    #[must_use]
    pub fn direct(name: &'static str) -> Self {
        Self(vec![name])
    }

    /// A path through the given field names, outermost first.
    #[must_use]
    pub fn nested(names: &[&'static str]) -> Self {
        Self(names.to_vec())
    }

    /// Returns the path with `prefix` prepended.
    #[must_use]
    pub fn prefixed(mut self, prefix: &'static str) -> Self {
        self.0.insert(0, prefix);
        self
    }

    /// Returns the path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[&'static str] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// A syntax node.
#[derive(Debug, Clone)]
pub struct Node {
    kind: &'static str,
    text: Option<String>,
    fields: Vec<(&'static str, Field)>,
    span: Span,
}

impl Node {
    /// Creates a node without text or fields.
    #[must_use]
    pub const fn branch(kind: &'static str, span: Span) -> Self {
        Self {
            kind,
            text: None,
            fields: Vec::new(),
            span,
        }
    }

    /// Creates a leaf node carrying `text`.
    #[must_use]
    pub fn leaf(kind: &'static str, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            fields: Vec::new(),
            span,
        }
    }

    /// Adds a field and returns the node, for building trees by hand.
    #[must_use]
    pub fn with_field(mut self, name: &'static str, field: Field) -> Self {
        self.set_field(name, field);
        self
    }

    /// Adds a single child node field.
    #[must_use]
    pub fn with_child(self, name: &'static str, child: Self) -> Self {
        self.with_field(name, Field::Node(Box::new(child)))
    }

    /// Adds a list field.
    #[must_use]
    pub fn with_children(self, name: &'static str, children: Vec<Self>) -> Self {
        self.with_field(name, Field::Nodes(children))
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns the leaf text, if the node is a leaf.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replaces the leaf text.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Returns the node's source span.
    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    /// Replaces the node's source span.
    pub const fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    /// Iterates over the node's fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        self.fields.iter().map(|(name, field)| (*name, field))
    }

    /// Returns the field stored under `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, field)| field)
    }

    /// Returns the field stored under `name` for modification.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|(key, _)| *key == name)
            .map(|(_, field)| field)
    }

    /// Stores `field` under `name`, replacing any previous value.
    pub fn set_field(&mut self, name: &'static str, field: Field) {
        match self.field_mut(name) {
            Some(slot) => *slot = field,
            None => self.fields.push((name, field)),
        }
    }

    /// Removes and returns the field stored under `name`.
    pub fn take_field(&mut self, name: &str) -> Option<Field> {
        let index = self.fields.iter().position(|(key, _)| *key == name)?;
        Some(self.fields.remove(index).1)
    }

    /// Returns the single child node stored under `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.field(name).and_then(Field::as_node)
    }

    /// Returns the unnamed children, or an empty slice.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.field(CHILDREN).and_then(Field::as_nodes).unwrap_or(&[])
    }

    /// Follows `path` from this node.
    ///
    /// Intermediate segments must name single-node fields.
    #[must_use]
    pub fn resolve(&self, path: &FieldPath) -> Option<&Field> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.child(segment)?;
        }
        current.field(last)
    }

    /// Returns the comparison keys of the node: its field names followed by
    /// [`TEXT_KEY`] when the node carries text.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.fields.iter().map(|(name, _)| *name).collect();
        if self.text.is_some() {
            keys.push(TEXT_KEY);
        }
        keys
    }

    /// Returns `true` when `key` is one of [`Node::keys`].
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        if key == TEXT_KEY {
            self.text.is_some()
        } else {
            self.field(key).is_some()
        }
    }

    /// Compares two trees ignoring spans.
    #[must_use]
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.text == other.text
            && self.fields.len() == other.fields.len()
            && self.fields.iter().all(|(name, field)| {
                other
                    .field(name)
                    .is_some_and(|theirs| field.structurally_eq(theirs))
            })
    }

    /// Visits every node of the tree in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for (_, field) in &self.fields {
            match field {
                Field::Node(child) => child.walk(visit),
                Field::Nodes(children) => children.iter().for_each(|child| child.walk(visit)),
                Field::Token(_) => {}
            }
        }
    }

    /// Visits every node of the tree in pre-order, allowing modification.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Self)) {
        visit(self);
        for (_, field) in &mut self.fields {
            match field {
                Field::Node(child) => child.walk_mut(visit),
                Field::Nodes(children) => children.iter_mut().for_each(|child| child.walk_mut(visit)),
                Field::Token(_) => {}
            }
        }
    }
}
