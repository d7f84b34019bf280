// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! HTML report rendering
//!
//! Produces one self-contained page: styles and script are embedded, and no
//! external resources are referenced. Packages are listed by name, root tests
//! and subtests by start time.

use std::fmt::Write;

use test2html_core::{PackageNode, Report, Summary, TestNode, format_duration};

const STYLES: &str = include_str!("../assets/report.css");
const SCRIPT: &str = include_str!("../assets/report.js");

/// Escape HTML special characters
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render a finished report as an HTML document
///
/// # Errors
///
/// Returns `std::fmt::Error` if writing to the buffer fails.
pub fn render_html(report: &Report) -> Result<String, std::fmt::Error> {
    let mut html = String::with_capacity(16 * 1024);
    let title = escape_html(report.title());

    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
{STYLES}</style>
</head>
<body>
<header class="report-header">
<h1>{title}</h1>
<div class="meta">Generated {date} &middot; Total duration {duration}</div>
</header>
"#,
        date = report.generated_at().format("%Y-%m-%d %H:%M:%S UTC"),
        duration = format_duration(report.duration()),
    )?;

    write_summary_cards(&mut html, report.summary())?;

    html.push_str(
        r#"<div class="toolbar">
<input id="searchField" type="search" placeholder="Search tests..." autocomplete="off">
<div id="filterStatus" class="filter-status"></div>
</div>
<main id="packages">
"#,
    );

    if report.package_count() == 0 {
        html.push_str("<p class=\"empty-report\">No test results found.</p>\n");
    }
    for package in report.packages() {
        write_package(&mut html, package)?;
    }

    write!(
        html,
        r#"</main>
<p id="noResults" class="no-results" hidden>No tests match the current filters.</p>
<footer>{packages} package(s) &middot; go-test2html</footer>
<script>
{SCRIPT}</script>
</body>
</html>
"#,
        packages = report.package_count(),
    )?;

    Ok(html)
}

fn write_summary_cards(html: &mut String, summary: &Summary) -> std::fmt::Result {
    html.push_str("<section class=\"summary\">\n");
    for (filter, label, value) in [
        ("all", "Total", summary.total),
        ("passed", "Passed", summary.passed),
        ("failed", "Failed", summary.failed),
        ("skipped", "Skipped", summary.skipped),
    ] {
        writeln!(
            html,
            r#"<div class="summary-card {filter}" data-filter="{filter}"><span class="value">{value}</span><span class="label">{label}</span></div>"#
        )?;
    }
    html.push_str("</section>\n");
    Ok(())
}

fn write_package(html: &mut String, package: &PackageNode) -> std::fmt::Result {
    let summary = package.summary();
    let name = escape_html(package.name());
    let state = if package.has_failures() {
        " has-failures"
    } else {
        ""
    };

    write!(
        html,
        r#"<section class="package{state}" data-package="{name}">
<div class="package-header">
<span class="toggle"></span>
<h2 class="package-name">{name}</h2>
<div class="package-summary">
<span class="summary-item total">{total} total</span>
<span class="summary-item passed">{passed} passed</span>
"#,
        total = summary.total,
        passed = summary.passed,
    )?;
    if summary.failed > 0 {
        writeln!(
            html,
            r#"<span class="summary-item failed">{} failed</span>"#,
            summary.failed
        )?;
    }
    if summary.skipped > 0 {
        writeln!(
            html,
            r#"<span class="summary-item skipped">{} skipped</span>"#,
            summary.skipped
        )?;
    }
    write!(
        html,
        r#"<span class="summary-item duration">{}</span>
</div>
</div>
<div class="package-content">
<ul class="test-list">
"#,
        format_duration(package.duration()),
    )?;

    write_tests(html, package, package.root_tests())?;

    html.push_str("</ul>\n</div>\n</section>\n");
    Ok(())
}

/// A pending step while walking a package's test tree
enum Frame<'a> {
    Open(&'a TestNode, bool),
    Close,
}

/// Write `roots` and all their subtests, depth first in display order
///
/// Uses an explicit stack so deeply nested names cannot exhaust the call stack.
fn write_tests<'a>(
    html: &mut String,
    package: &'a PackageNode,
    roots: Vec<&'a TestNode>,
) -> std::fmt::Result {
    let mut stack: Vec<Frame<'a>> = roots
        .into_iter()
        .rev()
        .map(|test| Frame::Open(test, false))
        .collect();

    while let Some(frame) = stack.pop() {
        let (test, nested) = match frame {
            Frame::Open(test, nested) => (test, nested),
            Frame::Close => {
                html.push_str("</ul>\n</div>\n</li>\n");
                continue;
            }
        };

        let children = package.children_of(test);
        write_test_item(html, test, nested, !children.is_empty())?;

        if children.is_empty() {
            html.push_str("</li>\n");
        } else {
            html.push_str("<div class=\"subtest-container\">\n<ul class=\"subtest-list\">\n");
            stack.push(Frame::Close);
            stack.extend(children.into_iter().rev().map(|child| Frame::Open(child, true)));
        }
    }
    Ok(())
}

/// Open a test's `<li>` and write its header and output
fn write_test_item(
    html: &mut String,
    test: &TestNode,
    nested: bool,
    has_children: bool,
) -> std::fmt::Result {
    let status = test.status().as_str();
    let item_class = if nested {
        "test-item subtest-item"
    } else {
        "test-item"
    };
    let expandable = if !has_children && test.output().is_empty() {
        ""
    } else {
        " expandable"
    };

    write!(
        html,
        r#"<li class="{item_class} status-{status}{expandable}" data-test-name="{name}" data-test-status="{status}">
<div class="test-header">
<span class="status-badge {status}">{status}</span>
<span class="test-name" title="{name}">{display}</span>
<span class="test-duration">{duration}</span>
</div>
"#,
        name = escape_html(test.name()),
        display = escape_html(test.display_name()),
        duration = test.duration_display(),
    )?;

    if !test.output().is_empty() {
        html.push_str("<pre class=\"test-output\">");
        for line in test.output() {
            html.push_str(&escape_html(line));
        }
        html.push_str("</pre>\n");
    }
    Ok(())
}
