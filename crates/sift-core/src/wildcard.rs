//! Wildcard syntax recognised inside query text.
//!
//! # Wildcard Syntax
//!
//! - `$$` matches zero or more characters of an identifier or string
//! - `$$$` matches one or more characters, or any subtree when it is the whole
//!   identifier
//! - `0x0` matches any numeric literal
//! - `$$_name` or `$$_name_` names the wildcard so every occurrence of `name`
//!   must bind to the same text
//!
//! Runs of four or more markers are rejected, except for exactly four markers
//! followed by `{`, which template literals produce (`$$$${expr}`).
//!
//! An alias must start right after the run with `_` followed by ASCII letters
//! or digits and an optional closing `_`. No alias is read when the run is
//! itself preceded by `_`, or when a marker follows the alias directly.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::SearchError;

/// How a wildcard-bearing value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum WildcardKind {
    /// Part of an identifier name.
    Identifier,
    /// Part of a string literal.
    String,
    /// A whole identifier standing for any subtree.
    NodeTree,
}

/// Which kind of literal a wildcard was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardContext {
    /// An identifier node.
    Identifier,
    /// A string-like node.
    String,
}

/// One wildcard occurrence inside a query value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WildcardMeta {
    /// How the wildcard is interpreted.
    pub kind: WildcardKind,
    /// The wildcard text including any alias, for example `$$_ref_`.
    pub with_alias: String,
    /// The bare marker run, for example `$$`.
    pub without_alias: String,
    /// The alias name, if any.
    pub alias: Option<String>,
}

/// The configurable wildcard markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WildcardSyntax {
    marker: char,
    numeric: String,
}

impl Default for WildcardSyntax {
    fn default() -> Self {
        Self {
            marker: '$',
            numeric: String::from("0x0"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Occurrence {
    start: usize,
    run_end: usize,
    end: usize,
    run: usize,
    alias: Option<(usize, usize)>,
}

impl WildcardSyntax {
    /// Creates a syntax with a custom marker character and numeric sentinel.
    #[must_use]
    pub fn new(marker: char, numeric: impl Into<String>) -> Self {
        Self {
            marker,
            numeric: numeric.into(),
        }
    }

    /// Returns the marker character.
    #[must_use]
    pub const fn marker(&self) -> char {
        self.marker
    }

    /// Returns the numeric wildcard sentinel.
    #[must_use]
    pub fn numeric(&self) -> &str {
        &self.numeric
    }

    /// Returns the optional wildcard (`$$`).
    #[must_use]
    pub fn optional(&self) -> String {
        self.marker.to_string().repeat(2)
    }

    /// Returns the required wildcard (`$$$`).
    #[must_use]
    pub fn required(&self) -> String {
        self.marker.to_string().repeat(3)
    }

    /// Returns `true` when `text` is exactly the numeric sentinel.
    #[must_use]
    pub fn is_numeric_wildcard(&self, text: &str) -> bool {
        text == self.numeric
    }

    /// Returns `true` when `text` contains at least one wildcard.
    #[must_use]
    pub fn has_wildcard(&self, text: &str) -> bool {
        !self.scan(text).is_empty()
    }

    /// Returns `true` when `text` is a node-tree wildcard: `$$$` with an
    /// optional alias and nothing else.
    #[must_use]
    pub fn is_node_tree(&self, text: &str) -> bool {
        self.strip_aliases(text) == self.required()
    }

    /// Finds the first run of four or more markers that is not a template
    /// literal opener. Returns its byte offset.
    #[must_use]
    pub fn find_invalid(&self, text: &str) -> Option<usize> {
        self.runs(text).into_iter().find_map(|(start, len)| {
            let next = text
                .get(start + len * self.marker.len_utf8()..)
                .and_then(|rest| rest.chars().next());
            (len >= 5 || (len == 4 && next != Some('{'))).then_some(start)
        })
    }

    /// Removes alias names, leaving the bare marker runs.
    #[must_use]
    pub fn strip_aliases(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for occurrence in self.scan(text) {
            out.push_str(text.get(cursor..occurrence.run_end).unwrap_or_default());
            cursor = occurrence.end;
        }
        out.push_str(text.get(cursor..).unwrap_or_default());
        out
    }

    /// Lists the wildcards found in `text`.
    #[must_use]
    pub fn classify(&self, text: &str, context: WildcardContext) -> Vec<WildcardMeta> {
        let node_tree = context == WildcardContext::Identifier && self.is_node_tree(text);
        self.scan(text)
            .into_iter()
            .map(|occurrence| {
                let kind = match context {
                    WildcardContext::String => WildcardKind::String,
                    WildcardContext::Identifier if node_tree => WildcardKind::NodeTree,
                    WildcardContext::Identifier => WildcardKind::Identifier,
                };
                WildcardMeta {
                    kind,
                    with_alias: slice(text, occurrence.start, occurrence.end),
                    without_alias: slice(text, occurrence.start, occurrence.run_end),
                    alias: occurrence.alias.map(|(from, to)| slice(text, from, to)),
                }
            })
            .collect()
    }

    /// Returns the literal text between wildcards, aliases removed.
    #[must_use]
    pub fn literal_fragments(&self, text: &str) -> Vec<String> {
        let mut fragments = Vec::new();
        let mut cursor = 0;
        for occurrence in self.scan(text) {
            fragments.push(slice(text, cursor, occurrence.start));
            cursor = occurrence.end;
        }
        fragments.push(slice(text, cursor, text.len()));
        fragments
    }

    /// Counts the literal characters of `text`, ignoring wildcards.
    #[must_use]
    pub fn literal_len(&self, text: &str) -> usize {
        self.literal_fragments(text)
            .iter()
            .map(|fragment| fragment.chars().count())
            .sum()
    }

    /// Compiles `text` into an anchored expression in which each wildcard is
    /// a lazy group.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidRegex`] if the expression fails to
    /// compile.
    pub fn to_regex(&self, text: &str, case_insensitive: bool) -> Result<Regex, SearchError> {
        Ok(self.compile(text, case_insensitive)?.regex)
    }

    /// Compiles `text` and records which capture group belongs to which
    /// alias.
    pub(crate) fn compile(
        &self,
        text: &str,
        case_insensitive: bool,
    ) -> Result<CompiledPattern, SearchError> {
        let flags = if case_insensitive { "(?si)" } else { "(?s)" };
        let mut source = format!("{flags}^");
        let mut aliases = Vec::new();
        let mut cursor = 0;
        for (index, occurrence) in self.scan(text).into_iter().enumerate() {
            source.push_str(&regex::escape(
                text.get(cursor..occurrence.start).unwrap_or_default(),
            ));
            let body = if occurrence.run == 3 { ".+?" } else { ".*?" };
            match occurrence.alias {
                Some((from, to)) => {
                    let group = format!("w{index}");
                    source.push_str(&format!("(?P<{group}>{body})"));
                    aliases.push((slice(text, from, to), group));
                }
                None => source.push_str(body),
            }
            cursor = occurrence.end;
        }
        source.push_str(&regex::escape(text.get(cursor..).unwrap_or_default()));
        source.push('$');
        let regex =
            Regex::new(&source).map_err(|err| SearchError::invalid_regex(text, err.to_string()))?;
        Ok(CompiledPattern { regex, aliases })
    }

    /// Returns `(byte offset, length in markers)` for every marker run.
    fn runs(&self, text: &str) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut current: Option<(usize, usize)> = None;
        for (offset, ch) in text.char_indices() {
            if ch == self.marker {
                current = Some(current.map_or((offset, 1), |(start, len)| (start, len + 1)));
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }
        runs.extend(current);
        runs
    }

    fn scan(&self, text: &str) -> Vec<Occurrence> {
        let marker_len = self.marker.len_utf8();
        self.runs(text)
            .into_iter()
            .filter(|(_, len)| (2..=3).contains(len))
            .map(|(start, run)| {
                let run_end = start + run * marker_len;
                let preceded_by_underscore = text
                    .get(..start)
                    .is_some_and(|before| before.ends_with('_'));
                let alias = if preceded_by_underscore {
                    None
                } else {
                    self.alias_after(text, run_end)
                };
                match alias {
                    Some((from, to, end)) => Occurrence {
                        start,
                        run_end,
                        end,
                        run,
                        alias: Some((from, to)),
                    },
                    None => Occurrence {
                        start,
                        run_end,
                        end: run_end,
                        run,
                        alias: None,
                    },
                }
            })
            .collect()
    }

    /// Reads `_name` or `_name_` at `at`. Returns the name bounds and the end
    /// of the alias.
    fn alias_after(&self, text: &str, at: usize) -> Option<(usize, usize, usize)> {
        let rest = text.get(at..)?.strip_prefix('_')?;
        let name_len = rest
            .char_indices()
            .find(|(_, ch)| !ch.is_ascii_alphanumeric())
            .map_or(rest.len(), |(offset, _)| offset);
        if name_len == 0 {
            return None;
        }
        let from = at + 1;
        let to = from + name_len;
        let after_name = text.get(to..).unwrap_or_default();
        let end = if after_name.starts_with('_') { to + 1 } else { to };
        let follows_marker = text
            .get(end..)
            .is_some_and(|tail| tail.starts_with(self.marker));
        (!follows_marker).then_some((from, to, end))
    }
}

fn slice(text: &str, from: usize, to: usize) -> String {
    text.get(from..to).unwrap_or_default().to_owned()
}

/// A compiled wildcard expression with its alias groups.
#[derive(Debug)]
pub(crate) struct CompiledPattern {
    pub(crate) regex: Regex,
    /// `(alias, group name)` for each aliased wildcard, in text order.
    pub(crate) aliases: Vec<(String, String)>,
}

/// Compiled expressions keyed by query text, for reuse across nodes.
#[derive(Debug, Default)]
pub(crate) struct PatternCache {
    patterns: RefCell<HashMap<String, Rc<CompiledPattern>>>,
}

impl PatternCache {
    pub(crate) fn get(
        &self,
        syntax: &WildcardSyntax,
        text: &str,
        case_insensitive: bool,
    ) -> Result<Rc<CompiledPattern>, SearchError> {
        if let Some(pattern) = self.patterns.borrow().get(text) {
            return Ok(Rc::clone(pattern));
        }
        let pattern = Rc::new(syntax.compile(text, case_insensitive)?);
        self.patterns
            .borrow_mut()
            .insert(text.to_owned(), Rc::clone(&pattern));
        Ok(pattern)
    }
}
