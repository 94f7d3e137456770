//! Search configuration, cancellation and metrics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::wildcard::WildcardSyntax;

/// How strictly a query must match.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Mode {
    /// Every key and every array element must match, in order.
    Exact,
    /// The query must be contained in the code; extra code is ignored.
    #[default]
    Include,
    /// Like [`Mode::Include`], but array elements must keep query order.
    IncludeWithOrder,
}

impl Mode {
    /// Returns `true` for the two include modes.
    #[must_use]
    pub const fn is_include(self) -> bool {
        matches!(self, Self::Include | Self::IncludeWithOrder)
    }
}

/// Options controlling a search.
///
/// # Example
///
/// ```
/// use sift_core::{Mode, SearchConfig};
///
/// let config = SearchConfig::default().with_mode(Mode::Exact);
/// assert_eq!(config.mode(), Mode::Exact);
/// assert!(!config.case_insensitive());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    mode: Mode,
    case_insensitive: bool,
    max_results: Option<usize>,
    wildcards: WildcardSyntax,
}

impl SearchConfig {
    /// Returns a copy with the given mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns a copy with case-insensitive matching switched on or off.
    #[must_use]
    pub const fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Returns a copy with a result budget.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Returns a copy with custom wildcard markers.
    #[must_use]
    pub fn with_wildcards(mut self, wildcards: WildcardSyntax) -> Self {
        self.wildcards = wildcards;
        self
    }

    /// Returns the match mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns whether identifiers and strings compare case-insensitively.
    #[must_use]
    pub const fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Returns the result budget, if any.
    #[must_use]
    pub const fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// Returns the wildcard markers.
    #[must_use]
    pub const fn wildcards(&self) -> &WildcardSyntax {
        &self.wildcards
    }
}

/// A cloneable flag a caller sets to stop a running search.
///
/// The search polls the flag between files.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the search stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`StopFlag::stop`] has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-search state shared with the caller.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    stop: StopFlag,
}

impl SearchContext {
    /// Creates a context with a fresh stop flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context observing an existing stop flag.
    #[must_use]
    pub const fn with_stop_flag(stop: StopFlag) -> Self {
        Self { stop }
    }

    /// Returns the stop flag.
    #[must_use]
    pub const fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }
}

/// Counters describing one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetrics {
    /// Files handed to the search.
    pub files_seen: usize,
    /// Files skipped by the token filter.
    pub files_filtered: usize,
    /// Files parsed and traversed.
    pub files_parsed: usize,
    /// Files that failed to parse or had no adapter.
    pub files_failed: usize,
    /// Matches found before deduplication.
    pub raw_matches: usize,
    /// Internal invariant violations observed by the matcher.
    pub invariant_violations: usize,
}
