//! Error types reported by the search engine.
//!
//! Errors never abort a whole search. Query problems are recorded once per
//! query and adapter, file problems once per file, and the search carries on
//! with whatever remains valid.

use std::fmt;

use camino::Utf8PathBuf;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::query::Hint;
use crate::span::LineCol;

/// Errors raised while parsing queries or searching files.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The query text could not be parsed, even after the retry wrapper.
    #[error("failed to parse query: {message}")]
    QueryParse {
        /// Parser message for the first failure.
        message: String,
        /// One-based location of the failure, when known.
        location: Option<LineCol>,
        /// Hints that may help the user rewrite the query.
        hints: Vec<Hint>,
    },

    /// The query contains a run of four or more wildcard markers.
    #[error("invalid wildcard at line {line}, column {column}")]
    InvalidWildcard {
        /// One-based line of the offending run.
        line: u32,
        /// One-based column of the offending run.
        column: u32,
    },

    /// The query parsed to nothing.
    #[error("query is empty")]
    EmptyQuery,

    /// A source file could not be parsed.
    #[error("failed to parse file: {message}")]
    FileParse {
        /// Parser message for the first failure.
        message: String,
        /// One-based location of the failure, when known.
        location: Option<LineCol>,
    },

    /// No adapter handles the file.
    #[error("unsupported file: {path}")]
    UnsupportedFile {
        /// The rejected path.
        path: Utf8PathBuf,
    },

    /// The matcher reached a state it should never reach.
    #[error("internal invariant violated: {message}")]
    InternalInvariant {
        /// Description of the violation.
        message: String,
    },

    /// A wildcard pattern produced a regular expression that failed to
    /// compile.
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidRegex {
        /// The wildcard text the expression was built from.
        pattern: String,
        /// Compiler message.
        message: String,
    },
}

impl SearchError {
    /// Creates a query parse error.
    #[must_use]
    pub fn query_parse(message: impl Into<String>, location: Option<LineCol>) -> Self {
        Self::QueryParse {
            message: message.into(),
            location,
            hints: Vec::new(),
        }
    }

    /// Creates a file parse error.
    #[must_use]
    pub fn file_parse(message: impl Into<String>, location: Option<LineCol>) -> Self {
        Self::FileParse {
            message: message.into(),
            location,
        }
    }

    /// Creates an internal invariant error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalInvariant {
            message: message.into(),
        }
    }

    /// Creates an invalid regex error.
    #[must_use]
    pub fn invalid_regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRegex {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Attaches hints to a query parse error. Other variants are returned
    /// unchanged.
    #[must_use]
    pub fn with_hints(self, new_hints: Vec<Hint>) -> Self {
        match self {
            Self::QueryParse {
                message, location, ..
            } => Self::QueryParse {
                message,
                location,
                hints: new_hints,
            },
            other => other,
        }
    }

    /// Returns the hints attached to the error.
    #[must_use]
    pub fn hints(&self) -> &[Hint] {
        match self {
            Self::QueryParse { hints, .. } => hints,
            _ => &[],
        }
    }
}

/// An error tied to the file and query that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchFailure {
    /// The file being searched, if the error is file-specific.
    pub path: Option<Utf8PathBuf>,
    /// Index of the query, if the error is query-specific.
    pub query_index: Option<usize>,
    /// Adapter that rejected the query, if the error is query-specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter: Option<&'static str>,
    /// The error itself.
    #[serde(rename = "message", serialize_with = "serialize_display")]
    pub error: SearchError,
}

impl SearchFailure {
    /// Creates a failure for a query that could not be prepared.
    #[must_use]
    pub const fn for_query(query_index: usize, adapter: &'static str, error: SearchError) -> Self {
        Self {
            path: None,
            query_index: Some(query_index),
            adapter: Some(adapter),
            error,
        }
    }

    /// Creates a failure for a file that could not be searched.
    #[must_use]
    pub const fn for_file(path: Utf8PathBuf, error: SearchError) -> Self {
        Self {
            path: Some(path),
            query_index: None,
            adapter: None,
            error,
        }
    }
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, self.query_index) {
            (Some(path), Some(index)) => write!(f, "{path} (query {index}): {}", self.error),
            (Some(path), None) => write!(f, "{path}: {}", self.error),
            (None, Some(index)) => match self.adapter {
                Some(adapter) => write!(f, "query {index} ({adapter}): {}", self.error),
                None => write!(f, "query {index}: {}", self.error),
            },
            (None, None) => write!(f, "{}", self.error),
        }
    }
}

fn serialize_display<S: Serializer>(value: &SearchError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
