// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Output format dispatch

use test2html_core::Report;

use crate::config::OutputFormat;
use crate::html::render_html;
use crate::json::render_json;

/// Errors from rendering a report
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing HTML into the buffer failed
    #[error("Failed to render HTML: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// JSON serialization failed
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render a report in the requested format
///
/// # Errors
///
/// Returns `RenderError` if the selected renderer fails.
pub fn render(report: &Report, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Html => Ok(render_html(report)?),
        OutputFormat::Json => Ok(render_json(report)?),
    }
}
