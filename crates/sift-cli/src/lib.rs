//! Command-line runtime for the `sift` structural search tool.
//!
//! The runtime parses arguments, installs telemetry, expands the requested
//! paths into source files and hands them to [`sift_core::search`] with the
//! Tree-sitter adapters from `sift-syntax`. Matches go to stdout; failures
//! and hints go to stderr, or to stdout as JSON lines when JSON output is
//! selected.
//!
//! The exit status is `0` when something matched, `1` when nothing did and
//! `2` when a query, path or file could not be used. Files that are not
//! UTF-8 text are skipped with a warning.

use std::ffi::OsString;
use std::fs;
use std::io::{ErrorKind, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use sift_core::{SearchConfig, SearchContext, SourceFile, search};
use sift_syntax::AdapterRegistry;
use tracing::{debug, warn};

mod cli;
mod discovery;
mod errors;
mod logging;
mod output;
mod telemetry;

use cli::Cli;
use discovery::discover;
use errors::AppError;
pub use logging::LogFormat;
pub use output::{OutputFormat, ResolvedOutputFormat};
use output::Renderer;
pub use telemetry::{TelemetryError, TelemetryHandle};

const EXIT_MATCHED: u8 = 0;
const EXIT_NO_MATCH: u8 = 1;
const EXIT_ERROR: u8 = 2;

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Matched,
    NoMatch,
    Failed,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        Self::from(match status {
            Status::Matched => EXIT_MATCHED,
            Status::NoMatch => EXIT_NO_MATCH,
            Status::Failed => EXIT_ERROR,
        })
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E, stdout_is_terminal: bool) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            // --help and --version
            return match write!(stdout, "{error}") {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::from(EXIT_ERROR),
            };
        }
        Err(error) => return report(stderr, &AppError::CliUsage(error)),
    };

    match execute(cli, stdout, stderr, stdout_is_terminal) {
        Ok(status) => status.into(),
        Err(error) => report(stderr, &error),
    }
}

fn report<E: Write>(stderr: &mut E, error: &AppError) -> ExitCode {
    if let Err(err) = writeln!(stderr, "{error}") {
        debug!(%err, "stderr unavailable");
    }
    ExitCode::from(EXIT_ERROR)
}

fn execute<W: Write, E: Write>(
    cli: Cli,
    stdout: &mut W,
    stderr: &mut E,
    stdout_is_terminal: bool,
) -> Result<Status, AppError> {
    telemetry::initialise(&cli.log_filter, cli.log_format)?;
    let queries = collect_queries(&cli)?;
    let config = SearchConfig::default()
        .with_mode(cli.mode)
        .with_case_insensitive(cli.case_insensitive)
        .with_max_results(cli.max_results);
    let registry = AdapterRegistry::new(config.wildcards().clone()).with_language(cli.lang);
    let format = cli.output.resolve(stdout_is_terminal);

    let roots = if cli.paths.is_empty() {
        vec![Utf8PathBuf::from(".")]
    } else {
        cli.paths
    };
    let discovery = discover(&roots, &registry);

    let mut unreadable = Vec::new();
    let files = discovery
        .files
        .iter()
        .filter_map(|path| match fs::read_to_string(path) {
            Ok(content) => Some(SourceFile::new(path.clone(), content)),
            Err(source) if source.kind() == ErrorKind::InvalidData => {
                warn!(%path, "skipping file that is not UTF-8 text");
                None
            }
            Err(source) => {
                unreadable.push(AppError::ReadFile {
                    path: path.clone(),
                    source,
                });
                None
            }
        });
    let outcome = search(&queries, &config, &registry, files, &SearchContext::new());
    if outcome.stopped_early {
        debug!(limit = ?config.max_results(), "result limit reached");
    }

    let mut renderer = Renderer::new(format, stdout, stderr);
    for found in &outcome.matches {
        renderer.found(found)?;
    }
    for failure in &outcome.errors {
        renderer.failure(failure)?;
    }
    for problem in discovery.failures.iter().chain(&unreadable) {
        renderer.problem(&problem.to_string())?;
    }
    for (index, hints) in outcome.hints.iter().enumerate() {
        for hint in hints {
            renderer.hint(index, hint)?;
        }
    }

    let failed = !discovery.failures.is_empty()
        || !unreadable.is_empty()
        || outcome
            .errors
            .iter()
            .any(|failure| failure.query_index.is_some());
    Ok(if failed {
        Status::Failed
    } else if outcome.matches.is_empty() {
        Status::NoMatch
    } else {
        Status::Matched
    })
}

fn collect_queries(cli: &Cli) -> Result<Vec<String>, AppError> {
    let mut queries = cli.queries.clone();
    for path in &cli.query_file {
        let text = fs::read_to_string(path).map_err(|source| AppError::ReadQueryFile {
            path: path.clone(),
            source,
        })?;
        queries.push(text.trim_end().to_owned());
    }
    if queries.is_empty() {
        return Err(AppError::MissingQuery);
    }
    Ok(queries)
}
