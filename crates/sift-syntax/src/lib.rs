//! Tree-sitter parser adapters for structural search.
//!
//! This crate turns source files into the language-neutral trees matched by
//! `sift-core`. Each [`SupportedLanguage`] pairs a Tree-sitter grammar with a
//! dialect that fills the matcher's kind tables and smooths over grammar
//! quirks.
//!
//! # Supported Languages
//!
//! - JavaScript and JSX (`.js`, `.jsx`, `.mjs`, `.cjs`)
//! - TypeScript (`.ts`, `.mts`, `.cts`) and TSX (`.tsx`)
//! - Python (`.py`, `.pyi`)
//! - C# (`.cs`)
//! - CSS (`.css`)
//! - HTML (`.html`, `.htm`)
//! - Rust (`.rs`)
//! - Lua (`.lua`)
//!
//! # Example
//!
//! ```ignore
//! use sift_core::{SearchConfig, SearchContext, SourceFile, search};
//! use sift_syntax::AdapterRegistry;
//!
//! let config = SearchConfig::default();
//! let registry = AdapterRegistry::new(config.wildcards().clone());
//! let outcome = search(
//!     &["fetch($$$)".to_owned()],
//!     &config,
//!     &registry,
//!     [SourceFile::new("api.ts", "await fetch(url, { method });")],
//!     &SearchContext::new(),
//! );
//! assert_eq!(outcome.matches.len(), 1);
//! ```

mod adapter;
mod convert;
mod dialect;
mod encoding;
mod error;
mod language;
mod languages;
mod node_types;
mod position;
mod registry;

pub use adapter::LanguageAdapter;
pub use encoding::{decode, decode_tree, encode};
pub use error::SyntaxError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use node_types::{Arity, KindShape, NodeTypes, node_types};
pub use registry::AdapterRegistry;
