//! Expands command-line paths into the files to search.
//!
//! Directories are walked with the `ignore` crate, so `.gitignore` and
//! hidden-file rules apply. Files found while walking are kept only when a
//! grammar can parse them; files named explicitly are always searched and
//! an unsupported one is reported by the search itself.

use camino::Utf8PathBuf;
use ignore::WalkBuilder;
use sift_syntax::AdapterRegistry;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Files to search, plus the paths that could not be walked.
#[derive(Debug, Default)]
pub(crate) struct Discovery {
    pub(crate) files: Vec<Utf8PathBuf>,
    pub(crate) failures: Vec<AppError>,
}

pub(crate) fn discover(roots: &[Utf8PathBuf], registry: &AdapterRegistry) -> Discovery {
    let mut discovery = Discovery::default();
    let Some((first, rest)) = roots.split_first() else {
        return discovery;
    };

    let mut builder = WalkBuilder::new(first);
    for root in rest {
        builder.add(root);
    }
    builder.sort_by_file_name(|left, right| left.cmp(right));

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(source) => {
                discovery.failures.push(AppError::Walk {
                    path: failing_path(&source),
                    source,
                });
                continue;
            }
        };
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        let explicit = entry.depth() == 0;
        let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
            warn!("skipping non UTF-8 path");
            continue;
        };
        if explicit || registry.language_for(&path).is_some() {
            discovery.files.push(path);
        }
    }

    debug!(files = discovery.files.len(), "discovered files");
    discovery
}

fn failing_path(error: &ignore::Error) -> String {
    match error {
        ignore::Error::WithPath { path, .. } => path.display().to_string(),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            failing_path(err)
        }
        _ => ".".to_owned(),
    }
}
