// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Command pipeline: read events, aggregate, render, write

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use test2html_core::{Aggregator, Event, read_events};
use tracing::{debug, info};

use crate::config::Config;
use crate::output::write_report;
use crate::render::render;

/// Run the command for a parsed configuration
///
/// Returns the path the report was written to. Nothing is written unless
/// every input line decodes.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be read
/// or decoded, or the report cannot be rendered or written.
pub fn run(config: &Config) -> anyhow::Result<PathBuf> {
    config.validate()?;

    let events = load_events(config)?;
    debug!(events = events.len(), "Read test events");

    let report = Aggregator::new(config.title.clone()).aggregate(&events);
    let summary = report.summary();
    info!(
        packages = report.package_count(),
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "Aggregated test results"
    );

    let contents = render(&report, config.format).context("Failed to render report")?;
    write_report(&config.output, &contents)?;
    info!(path = %config.output.display(), "Wrote report");

    Ok(config.output.clone())
}

fn load_events(config: &Config) -> anyhow::Result<Vec<Event>> {
    match &config.input {
        Some(path) => {
            debug!(path = %path.display(), "Reading events from file");
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            read_events(BufReader::new(file))
                .with_context(|| format!("Failed to parse test events from {}", path.display()))
        }
        None => {
            debug!("Reading events from stdin");
            read_events(io::stdin().lock()).context("Failed to parse test events from stdin")
        }
    }
}
