// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! JSON report rendering
//!
//! Serializes the aggregated tree for tooling that wants the rollups without
//! scraping HTML. Subtests are nested under their parents in start order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use test2html_core::{PackageNode, Report, Summary, TestNode, TestStatus};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    title: &'a str,
    generated_at: DateTime<Utc>,
    duration: f64,
    summary: Summary,
    packages: Vec<JsonPackage<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonPackage<'a> {
    name: &'a str,
    duration: f64,
    summary: Summary,
    tests: Vec<JsonTest<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonTest<'a> {
    name: &'a str,
    display_name: &'a str,
    status: TestStatus,
    duration: f64,
    started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    output: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    subtests: Vec<JsonTest<'a>>,
}

impl<'a> JsonTest<'a> {
    fn build(package: &'a PackageNode, test: &'a TestNode) -> Self {
        Self {
            name: test.name(),
            display_name: test.display_name(),
            status: test.status(),
            duration: test.duration(),
            started_at: test.started_at(),
            output: test.output(),
            subtests: package
                .children_of(test)
                .into_iter()
                .map(|child| Self::build(package, child))
                .collect(),
        }
    }
}

impl<'a> From<&'a PackageNode> for JsonPackage<'a> {
    fn from(package: &'a PackageNode) -> Self {
        Self {
            name: package.name(),
            duration: package.duration(),
            summary: *package.summary(),
            tests: package
                .root_tests()
                .into_iter()
                .map(|test| JsonTest::build(package, test))
                .collect(),
        }
    }
}

/// Render a finished report as pretty-printed JSON
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    let view = JsonReport {
        title: report.title(),
        generated_at: report.generated_at(),
        duration: report.duration(),
        summary: *report.summary(),
        packages: report.packages().map(JsonPackage::from).collect(),
    };
    serde_json::to_string_pretty(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;
    use test2html_core::{Action, Aggregator, Event};

    fn render(events: &[Event]) -> Value {
        let report = Aggregator::new("JSON")
            .generated_at(Utc.with_ymd_and_hms(2026, 1, 17, 2, 33, 6).unwrap())
            .aggregate(events);
        let json = render_json(&report).expect("render");
        serde_json::from_str(&json).expect("valid json")
    }

    #[test]
    fn test_top_level_fields() {
        let value = render(&[
            Event::new(Action::Run, "pkg").with_test("TestA"),
            Event::new(Action::Pass, "pkg")
                .with_test("TestA")
                .with_elapsed(0.25),
        ]);

        assert_eq!(value["title"], "JSON");
        assert_eq!(value["generated_at"], "2026-01-17T02:33:06Z");
        assert_eq!(value["duration"], 0.25);
        assert_eq!(value["summary"]["total"], 1);
        assert_eq!(value["summary"]["passed"], 1);
        assert_eq!(value["packages"][0]["name"], "pkg");
        assert_eq!(value["packages"][0]["tests"][0]["display_name"], "Test A");
        assert_eq!(value["packages"][0]["tests"][0]["status"], "passed");
    }

    #[test]
    fn test_subtests_nested() {
        let value = render(&[
            Event::new(Action::Run, "pkg").with_test("TestA"),
            Event::new(Action::Run, "pkg").with_test("TestA/one"),
            Event::new(Action::Output, "pkg")
                .with_test("TestA/one")
                .with_output("boom\n"),
            Event::new(Action::Fail, "pkg")
                .with_test("TestA/one")
                .with_elapsed(0.1),
            Event::new(Action::Fail, "pkg")
                .with_test("TestA")
                .with_elapsed(0.1),
        ]);

        let parent = &value["packages"][0]["tests"][0];
        assert_eq!(parent["name"], "TestA");
        assert_eq!(parent["status"], "failed");
        assert!(parent.get("output").is_none());
        assert_eq!(parent["subtests"][0]["name"], "TestA/one");
        assert_eq!(parent["subtests"][0]["output"][0], "boom\n");
        assert!(parent["subtests"][0].get("subtests").is_none());
        assert_eq!(value["packages"][0]["tests"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_report() {
        let value = render(&[]);
        assert_eq!(value["packages"], Value::Array(vec![]));
        assert_eq!(value["summary"]["total"], 0);
    }
}
