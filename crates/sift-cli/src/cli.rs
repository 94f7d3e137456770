//! Command-line argument definitions for `sift`.

use camino::Utf8PathBuf;
use clap::Parser;
use sift_core::Mode;
use sift_syntax::SupportedLanguage;

use crate::logging::LogFormat;
use crate::output::OutputFormat;

/// Structural code search: find code that looks like the query.
#[derive(Parser, Debug)]
#[command(name = "sift", version)]
pub(crate) struct Cli {
    /// Query to search for. May be repeated; matches of any query are
    /// reported.
    #[arg(short = 'q', long = "query", value_name = "QUERY")]
    pub(crate) queries: Vec<String>,
    /// Reads an additional query from a file.
    #[arg(long, value_name = "FILE")]
    pub(crate) query_file: Vec<Utf8PathBuf>,
    /// How strictly code must match: exact, include or include-with-order.
    #[arg(long, default_value_t = Mode::Include)]
    pub(crate) mode: Mode,
    /// Compares identifiers and strings ignoring case.
    #[arg(short = 'i', long)]
    pub(crate) case_insensitive: bool,
    /// Stops after this many matches.
    #[arg(long, value_name = "N")]
    pub(crate) max_results: Option<usize>,
    /// Parses every file as this language instead of guessing from the
    /// extension.
    #[arg(long, value_name = "LANG")]
    pub(crate) lang: Option<SupportedLanguage>,
    /// Controls how matches are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// Tracing filter directive for diagnostics on stderr.
    #[arg(long, default_value = "warn", value_name = "FILTER")]
    pub(crate) log_filter: String,
    /// Format of diagnostics on stderr: json or compact.
    #[arg(long, default_value_t = LogFormat::Compact, value_name = "FORMAT")]
    pub(crate) log_format: LogFormat,
    /// Files or directories to search. Defaults to the current directory.
    #[arg(value_name = "PATH")]
    pub(crate) paths: Vec<Utf8PathBuf>,
}
