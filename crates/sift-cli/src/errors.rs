//! Error types for the CLI runtime.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("no query given; pass one with --query or --query-file")]
    MissingQuery,
    #[error("failed to read query file {path}: {source}")]
    ReadQueryFile { path: Utf8PathBuf, source: io::Error },
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to walk {path}: {source}")]
    Walk { path: String, source: ignore::Error },
    #[error("failed to read {path}: {source}")]
    ReadFile { path: Utf8PathBuf, source: io::Error },
    #[error("failed to serialise output: {0}")]
    Serialise(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}
