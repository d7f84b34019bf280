// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for test2html-core
//!
//! These tests use proptest to check the counting invariants of the
//! aggregator against arbitrary, frequently malformed, event orderings.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use test2html_core::{Action, Aggregator, Event, Report, Summary};

// ============================================================================
// Strategies
// ============================================================================

fn arbitrary_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Run),
        Just(Action::Pass),
        Just(Action::Fail),
        Just(Action::Skip),
        Just(Action::Output),
        Just(Action::Other),
    ]
}

/// Test names sharing prefixes, so parents and children collide often
fn arbitrary_test_name() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("TestA".to_string())),
        Just(Some("TestA/x".to_string())),
        Just(Some("TestA/x/deep".to_string())),
        Just(Some("TestA/y".to_string())),
        Just(Some("TestB".to_string())),
        Just(Some("TestB/z".to_string())),
        Just(Some("helper".to_string())),
        "Test[A-C](/[a-c]){0,2}".prop_map(Some),
    ]
}

fn arbitrary_event() -> impl Strategy<Value = Event> {
    (
        arbitrary_action(),
        prop_oneof![Just("pkg/a"), Just("pkg/b"), Just("pkg/c")],
        arbitrary_test_name(),
        prop_oneof![Just(None), (0u32..3000).prop_map(|ms| Some(f64::from(ms) / 1000.0))],
        prop_oneof![Just(None), (0u32..600).prop_map(Some)],
        prop_oneof![Just(None), Just(Some(String::new())), "[ -~]{0,20}".prop_map(Some)],
    )
        .prop_map(|(action, package, test, elapsed, offset, output)| Event {
            timestamp: offset.map(|secs| base_time() + chrono::Duration::seconds(i64::from(secs))),
            action,
            package: package.to_string(),
            test,
            output,
            elapsed,
        })
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 17, 2, 0, 0).unwrap()
}

fn aggregate(events: &[Event]) -> Report {
    Aggregator::new("prop")
        .generated_at(base_time())
        .aggregate(events)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_totals_are_consistent(events in prop::collection::vec(arbitrary_event(), 0..80)) {
        let report = aggregate(&events);
        prop_assert!(report.summary().is_consistent());
        for package in report.packages() {
            prop_assert!(package.summary().is_consistent(), "package {}", package.name());
        }
    }

    #[test]
    fn prop_report_summary_is_sum_of_packages(events in prop::collection::vec(arbitrary_event(), 0..80)) {
        let report = aggregate(&events);
        let mut sum = Summary::default();
        for package in report.packages() {
            sum.total += package.summary().total;
            sum.passed += package.summary().passed;
            sum.failed += package.summary().failed;
            sum.skipped += package.summary().skipped;
        }
        prop_assert_eq!(*report.summary(), sum);
    }

    #[test]
    fn prop_only_leaves_are_counted(events in prop::collection::vec(arbitrary_event(), 0..80)) {
        let report = aggregate(&events);
        for package in report.packages() {
            let mut sum = Summary::default();
            for test in package.tests() {
                let counted = test.counted();
                if !test.is_leaf() {
                    prop_assert_eq!(counted.total, 0, "container {} counted", test.name());
                }
                sum.total += counted.total;
                sum.passed += counted.passed;
                sum.failed += counted.failed;
                sum.skipped += counted.skipped;
            }
            prop_assert_eq!(*package.summary(), sum);
        }
    }

    #[test]
    fn prop_aggregation_is_repeatable(events in prop::collection::vec(arbitrary_event(), 0..80)) {
        let first = aggregate(&events);
        let second = aggregate(&events);
        prop_assert_eq!(first.summary(), second.summary());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_subtests_are_linked_to_parents(events in prop::collection::vec(arbitrary_event(), 0..80)) {
        let report = aggregate(&events);
        for package in report.packages() {
            for test in package.tests() {
                if let Some(parent_name) = test.parent() {
                    let parent = package.test(parent_name);
                    prop_assert!(parent.is_some(), "missing parent {}", parent_name);
                    let linked = package
                        .children_of(parent.unwrap())
                        .iter()
                        .any(|child| child.name() == test.name());
                    prop_assert!(linked, "{} not linked under {}", test.name(), parent_name);
                }
            }
            let reachable: usize = package
                .root_tests()
                .iter()
                .map(|root| count_subtree(package, root))
                .sum();
            prop_assert_eq!(reachable, package.len());
        }
    }

    #[test]
    fn prop_empty_packages_never_reported(events in prop::collection::vec(arbitrary_event(), 0..80)) {
        let report = aggregate(&events);
        for event in &events {
            if event.marks_empty_package() {
                prop_assert!(report.package(&event.package).is_none());
            }
        }
    }
}

fn count_subtree(package: &test2html_core::PackageNode, test: &test2html_core::TestNode) -> usize {
    1 + package
        .children_of(test)
        .iter()
        .map(|child| count_subtree(package, child))
        .sum::<usize>()
}
