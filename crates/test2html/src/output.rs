// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report file writing
//!
//! The report is written to a temporary file next to the destination and
//! renamed into place, so a failed write never leaves a partial report behind.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use atomicwrites::{AtomicFile, OverwriteBehavior};
use thiserror::Error;
use tracing::debug;

/// Errors writing the report
#[derive(Debug, Error)]
pub enum OutputError {
    /// The destination could not be created or written
    #[error("failed to write report to {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}

/// Atomically write `contents` to `path`, replacing any existing file
///
/// # Errors
///
/// Returns `OutputError::Write` if the temporary file cannot be created,
/// written, or renamed into place.
pub fn write_report(path: &Path, contents: &str) -> Result<(), OutputError> {
    // A bare file name has an empty parent; stage the temp file in `.`
    let staged = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new(".").join(path),
        _ => path.to_path_buf(),
    };
    let file = AtomicFile::new(&staged, OverwriteBehavior::AllowOverwrite);
    file.write(|f| f.write_all(contents.as_bytes()))
        .map_err(|err| OutputError::Write {
            path: path.to_path_buf(),
            source: match err {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
            },
        })?;

    debug!(path = %path.display(), bytes = contents.len(), "Wrote report");
    Ok(())
}
