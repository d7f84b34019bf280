// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test event types (from `go test -json`)
//!
//! Each line of `go test -json` output is one [`Event`]. Keys on the wire are
//! PascalCase (`Time`, `Action`, `Package`, `Test`, `Output`, `Elapsed`), and
//! every key may be absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle action carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Test started running
    Run,
    /// Test passed
    Pass,
    /// Test failed
    Fail,
    /// Test was skipped, or the package has no test files
    Skip,
    /// A line of captured output
    Output,
    /// Anything else the runner emits (`start`, `pause`, `cont`, `bench`, ...)
    #[default]
    #[serde(other)]
    Other,
}

/// A single record from the event stream
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    /// When the event happened; `None` if absent or unparsable
    #[serde(
        rename = "Time",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// What happened
    #[serde(default)]
    pub action: Action,
    /// Package import path
    #[serde(default)]
    pub package: String,
    /// Fully-qualified test name; absent for package-level events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    /// Output line, including its trailing newline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Elapsed seconds, reported on terminal events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<f64>,
}

/// Timestamps that fail to parse are dropped instead of rejecting the line.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }))
}

impl Event {
    /// Create an event with the given action for a package
    #[must_use]
    pub fn new(action: Action, package: impl Into<String>) -> Self {
        Self {
            action,
            package: package.into(),
            ..Self::default()
        }
    }

    /// Set the test name
    #[must_use]
    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.test = Some(test.into());
        self
    }

    /// Set the elapsed time in seconds
    #[must_use]
    pub fn with_elapsed(mut self, elapsed: f64) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Set the output line
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set the timestamp
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The test name, treating an empty string as absent
    #[must_use]
    pub fn test_name(&self) -> Option<&str> {
        self.test.as_deref().filter(|t| !t.is_empty())
    }

    /// Elapsed seconds, `0.0` when absent
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.unwrap_or(0.0)
    }

    /// The event timestamp, or `fallback` when it was absent or unparsable
    #[must_use]
    pub fn timestamp_or(&self, fallback: DateTime<Utc>) -> DateTime<Utc> {
        self.timestamp.unwrap_or(fallback)
    }

    /// Whether this is the `?  <pkg>  [no test files]` line the runner prints
    /// for packages without tests
    #[must_use]
    pub fn is_no_test_files_output(&self) -> bool {
        self.output.as_deref().is_some_and(|output| {
            output
                .strip_prefix("?\t")
                .and_then(|rest| rest.strip_prefix(self.package.as_str()))
                .is_some_and(|rest| rest == "\t[no test files]\n")
        })
    }

    /// Whether this event marks its package as having no test files:
    /// a test-less `skip` with zero elapsed time
    #[must_use]
    pub fn marks_empty_package(&self) -> bool {
        self.action == Action::Skip && self.test_name().is_none() && self.elapsed_secs() == 0.0
    }
}
