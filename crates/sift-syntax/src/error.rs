//! Error types for grammar setup and parsing.

use thiserror::Error;

use crate::language::SupportedLanguage;

/// Errors raised while preparing or running a Tree-sitter parser.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInit {
        /// The language that failed to initialise.
        language: SupportedLanguage,
        /// Description of the failure.
        message: String,
    },

    /// The grammar's node-type table could not be read.
    #[error("invalid node types for {language}: {source}")]
    NodeTypes {
        /// The language whose table is broken.
        language: SupportedLanguage,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Tree-sitter returned no tree.
    #[error("failed to parse {language}")]
    NoTree {
        /// The language being parsed.
        language: SupportedLanguage,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SupportedLanguage, message: impl Into<String>) -> Self {
        Self::ParserInit {
            language,
            message: message.into(),
        }
    }
}
