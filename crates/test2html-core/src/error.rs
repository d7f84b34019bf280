// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for test2html-core

use thiserror::Error;

/// Errors that can occur while reading a test event stream
///
/// Aggregation itself is infallible; every variant here comes from the reader.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Error reading the event source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be decoded as a test event
    #[error("failed to parse JSON line {line}: {source}")]
    Decode {
        /// 1-based line number within the input
        line: usize,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    /// Line number of a decode failure, if this is one
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Decode { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
