//! Structural code search over language-neutral syntax trees.
//!
//! Queries are written as ordinary code containing wildcards. The engine
//! parses each query with a [`ParserAdapter`], parses candidate files with the
//! same adapter, and walks every file tree looking for subtrees the query
//! matches under the configured [`Mode`].
//!
//! # Core types
//!
//! - [`Node`] and [`Field`] for the syntax trees adapters produce
//! - [`ParserAdapter`] and [`AdapterResolver`] for the parser boundary
//! - [`WildcardSyntax`] for the wildcard markers and their expansion
//! - [`SearchConfig`] and [`SearchContext`] for run options and cancellation
//! - [`Match`] and [`SearchOutcome`] for results
//! - [`SearchError`] and [`SearchFailure`] for reported problems
//!
//! # Example
//!
//! ```ignore
//! use sift_core::{SearchConfig, SearchContext, SingleAdapter, SourceFile, search};
//!
//! let outcome = search(
//!     &["console.log($$)".to_owned()],
//!     &SearchConfig::default(),
//!     &SingleAdapter(&adapter),
//!     [SourceFile::new("a.js", "console.log('hi');")],
//!     &SearchContext::new(),
//! );
//! assert_eq!(outcome.matches.len(), 1);
//! ```

mod adapter;
mod aliases;
mod compare;
mod config;
mod error;
mod filter;
mod node;
mod query;
mod results;
mod search;
mod span;
mod traverse;
mod validate;
mod wildcard;

pub use adapter::{
    AdapterResolver, CompareRule, NodeKinds, ParseFailure, ParserAdapter, RuleContext, RuleVerdict,
    SingleAdapter,
};
pub use aliases::{AliasBinding, AliasBindingSet};
pub use compare::{Comparison, MatchContext, compare};
pub use config::{Mode, SearchConfig, SearchContext, SearchMetrics, StopFlag};
pub use error::{SearchError, SearchFailure};
pub use filter::{passes_shallow_filter, unique_tokens};
pub use node::{CHILDREN, Field, FieldPath, Node, TEXT_KEY};
pub use query::{Hint, HintToken, HintTokenKind, ParsedQuery, parse_query};
pub use results::{CodeFrame, Match, dedup_matches, extended_code_frame, prepare_code};
pub use search::{SearchOutcome, SourceFile, search};
pub use span::{LineCol, Span};
pub use traverse::{RawMatch, traverse};
pub use validate::validate;
pub use wildcard::{WildcardContext, WildcardKind, WildcardMeta, WildcardSyntax};

#[cfg(test)]
mod tests;
