//! Position conversion helpers.
//!
//! Tree-sitter positions are zero-based. Spans keep them that way; error
//! locations shown to users are one-based.

use sift_core::{LineCol, Span};

/// Converts a Tree-sitter point to a zero-based [`LineCol`].
#[must_use]
pub(crate) fn point_to_line_col(pos: tree_sitter::Point) -> LineCol {
    // Line/column numbers will realistically never exceed u32::MAX.
    LineCol::new(
        u32::try_from(pos.row).unwrap_or(u32::MAX),
        u32::try_from(pos.column).unwrap_or(u32::MAX),
    )
}

/// Converts a Tree-sitter point to one-based display coordinates.
#[must_use]
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> LineCol {
    LineCol::new(
        u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX),
        u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX),
    )
}

/// Returns the span of a Tree-sitter node.
#[must_use]
pub(crate) fn node_span(node: tree_sitter::Node<'_>) -> Span {
    Span::new(
        node.start_byte(),
        node.end_byte(),
        point_to_line_col(node.start_position()),
        point_to_line_col(node.end_position()),
    )
}
