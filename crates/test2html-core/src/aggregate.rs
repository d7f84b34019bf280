// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Event aggregation
//!
//! Folds an ordered event stream into a [`Report`] in three steps:
//!
//! 1. find packages that reported no test files and drop all their events,
//! 2. fold the remaining events in input order, building the test tree and
//!    counting leaf outcomes as terminal events arrive,
//! 3. reconcile counters that the fold could not settle on its own
//!    (reordered or malformed input).
//!
//! # Example
//!
//! ```
//! use test2html_core::aggregate::Aggregator;
//! use test2html_core::reader::parse_events;
//!
//! let input = r#"{"Action":"run","Package":"pkg","Test":"TestA"}
//! {"Action":"pass","Package":"pkg","Test":"TestA","Elapsed":0.01}"#;
//! let events = parse_events(input).unwrap();
//! let report = Aggregator::new("Go Test Report").aggregate(&events);
//!
//! assert_eq!(report.summary().passed, 1);
//! assert_eq!(report.package("pkg").unwrap().test("TestA").unwrap().display_name(), "Test A");
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::event::{Action, Event};
use crate::report::{PackageNode, Report, Summary, TestId, TestStatus};

/// Builds a [`Report`] from events
#[derive(Debug, Clone)]
pub struct Aggregator {
    title: String,
    generated_at: Option<DateTime<Utc>>,
}

impl Aggregator {
    /// Create an aggregator producing a report with the given title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            generated_at: None,
        }
    }

    /// Fix the report's generation time instead of reading the clock
    ///
    /// The same instant stands in for event timestamps that are missing or
    /// unparsable.
    #[must_use]
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Aggregate an ordered event sequence
    #[must_use]
    pub fn aggregate(&self, events: &[Event]) -> Report {
        let now = self.generated_at.unwrap_or_else(Utc::now);
        let mut report = Report::new(self.title.clone(), now);

        let empty = empty_packages(events);
        if !empty.is_empty() {
            debug!(packages = ?empty, "Skipping packages with no test files");
        }

        for (sequence, event) in events.iter().enumerate() {
            if empty.contains(event.package.as_str()) {
                continue;
            }
            fold_event(&mut report, event, sequence, now);
        }

        let adjustments = reconcile(&mut report);
        if adjustments > 0 {
            warn!(adjustments, "Corrected summary counters after aggregation");
        }

        debug!(
            packages = report.package_count(),
            total = report.summary().total,
            passed = report.summary().passed,
            failed = report.summary().failed,
            skipped = report.summary().skipped,
            "Aggregated test events"
        );
        report
    }
}

/// Aggregate events into a report titled `title`, reading the clock once
#[must_use]
pub fn aggregate(events: &[Event], title: &str) -> Report {
    Aggregator::new(title).aggregate(events)
}

/// Packages that announced they have no test files
fn empty_packages(events: &[Event]) -> HashSet<&str> {
    events
        .iter()
        .filter(|e| e.marks_empty_package())
        .map(|e| e.package.as_str())
        .collect()
}

fn fold_event(report: &mut Report, event: &Event, sequence: usize, now: DateTime<Utc>) {
    let (packages, report_summary, report_duration) = report.parts_mut();

    let package = packages.entry(event.package.clone()).or_insert_with(|| {
        trace!(package = %event.package, "New package");
        PackageNode::new(&event.package)
    });

    let Some(test_name) = event.test_name() else {
        trace!(package = %event.package, action = ?event.action, "Package-level event");
        return;
    };

    let started_at = event.timestamp_or(now);
    let id = package.get_or_insert(test_name, started_at, sequence);

    match event.action {
        Action::Run => package.touch(id, started_at, sequence),
        Action::Output => {
            if let Some(line) = event.output.as_deref().filter(|l| !l.is_empty()) {
                package.push_output(id, line);
            }
        }
        action => {
            let Some(status) = TestStatus::from_action(action) else {
                trace!(test = test_name, ?action, "Ignoring event");
                return;
            };
            finish_test(package, report_summary, id, status, event.elapsed_secs());
            if status != TestStatus::Skipped {
                package.add_duration(event.elapsed_secs());
                *report_duration += event.elapsed_secs();
            }
        }
    }
}

/// Record a terminal event for `id`
fn finish_test(
    package: &mut PackageNode,
    report_summary: &mut Summary,
    id: TestId,
    status: TestStatus,
    elapsed: f64,
) {
    package.set_result(id, status, elapsed);

    // Containers are represented by their leaves
    if package.node(id).is_leaf() {
        package.credit(id, status, report_summary);
    }

    // One level only; grandparents keep their own status
    if status == TestStatus::Failed
        && let Some(parent) = package.parent_id(id)
    {
        package.mark_failed(parent);
    }
}

/// Settle counters the fold could not: count finished root leaves that were
/// never counted and withdraw counts from nodes that gained children later
///
/// Returns the number of adjustments; a second call always returns zero.
pub(crate) fn reconcile(report: &mut Report) -> usize {
    let (packages, report_summary, _) = report.parts_mut();
    let mut adjustments = 0;

    for package in packages.values_mut() {
        let pending: Vec<(TestId, Option<TestStatus>)> = package
            .entries()
            .filter_map(|(id, test)| {
                let counted = test.counted().total > 0;
                if !test.is_leaf() {
                    counted.then_some((id, None))
                } else if !test.is_subtest() && !counted && test.status().is_known()
                {
                    Some((id, Some(test.status())))
                } else {
                    None
                }
            })
            .collect();

        for (id, credit) in pending {
            let name = package.node(id).name().to_string();
            match credit {
                Some(status) => {
                    debug!(package = package.name(), test = %name, %status, "Backfilling uncounted test");
                    package.credit(id, status, report_summary);
                }
                None => {
                    debug!(package = package.name(), test = %name, "Withdrawing count from container test");
                    package.withdraw(id, report_summary);
                }
            }
            adjustments += 1;
        }
    }

    adjustments
}
