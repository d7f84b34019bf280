// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the test2html command
//!
//! This module provides the command-line configuration: where events are read
//! from, where the report goes, how it is titled and formatted, and logging
//! options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Default report file name
pub const DEFAULT_OUTPUT: &str = "test-report.html";

/// Default report title
pub const DEFAULT_TITLE: &str = "Go Test Report";

/// Render `go test -json` output as a self-contained HTML report
///
/// Example:
///   go test -json ./... | test2html -o report.html -t "Nightly"
#[derive(Parser, Debug, Clone)]
#[command(name = "test2html")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// JSON input file
    ///
    /// Newline-delimited `go test -json` events. Defaults to stdin if not
    /// specified.
    #[arg(short, long, env = "TEST2HTML_INPUT")]
    pub input: Option<PathBuf>,

    /// Report output file
    #[arg(short, long, env = "TEST2HTML_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Report title
    #[arg(short, long, env = "TEST2HTML_TITLE", default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with piped output.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML page
    #[default]
    Html,
    /// The aggregated report tree as JSON
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_TITLE.to_string(),
            format: OutputFormat::default(),
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the input path is specified but doesn't exist or
    /// is not a regular file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.clone()));
            }
            if !input.is_file() {
                return Err(ConfigError::InputNotFile(input.clone()));
            }
        }

        if self.output.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is not a regular file
    #[error("Input path is not a file: {0}")]
    InputNotFile(PathBuf),

    /// Output path is empty
    #[error("Output path must not be empty")]
    EmptyOutputPath,
}
