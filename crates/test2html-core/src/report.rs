// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report tree types
//!
//! A [`Report`] owns its [`PackageNode`]s, and each package owns its
//! [`TestNode`]s in an arena. Parent and child links are [`TestId`]s into that
//! arena, so a node is reachable both by its fully-qualified name and from its
//! parent without shared ownership.
//!
//! Everything here is built by [`crate::aggregate::Aggregator`] and is
//! read-only afterwards.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Action;
use crate::naming;

// ============================================================================
// Status and counters
// ============================================================================

/// Outcome of a test node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed, or one of its direct subtests failed
    Failed,
    /// Test was skipped
    Skipped,
    /// No terminal event seen yet
    #[default]
    Unknown,
}

impl TestStatus {
    /// The status a terminal action sets, if any
    #[must_use]
    pub fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::Pass => Some(Self::Passed),
            Action::Fail => Some(Self::Failed),
            Action::Skip => Some(Self::Skipped),
            Action::Run | Action::Output | Action::Other => None,
        }
    }

    /// Lowercase name, as used in CSS classes and JSON
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }

    /// Whether a terminal event has set this status
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass/fail/skip counters for a package or a whole report
///
/// Only leaf tests are counted, so `total == passed + failed + skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Leaf tests counted
    pub total: usize,
    /// Leaf tests passed
    pub passed: usize,
    /// Leaf tests failed
    pub failed: usize,
    /// Leaf tests skipped
    pub skipped: usize,
}

impl Summary {
    /// Count one leaf with the given status; `Unknown` is not counted
    pub(crate) fn credit(&mut self, status: TestStatus) {
        let Some(counter) = self.counter_mut(status) else {
            return;
        };
        *counter += 1;
        self.total += 1;
    }

    /// Remove counts previously added with [`Summary::credit`]
    pub(crate) fn subtract(&mut self, other: &Summary) {
        self.total = self.total.saturating_sub(other.total);
        self.passed = self.passed.saturating_sub(other.passed);
        self.failed = self.failed.saturating_sub(other.failed);
        self.skipped = self.skipped.saturating_sub(other.skipped);
    }

    fn counter_mut(&mut self, status: TestStatus) -> Option<&mut usize> {
        match status {
            TestStatus::Passed => Some(&mut self.passed),
            TestStatus::Failed => Some(&mut self.failed),
            TestStatus::Skipped => Some(&mut self.skipped),
            TestStatus::Unknown => None,
        }
    }

    /// Check the counting invariant
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total == self.passed + self.failed + self.skipped
    }
}

/// Format a duration in seconds for display
///
/// Sub-second durations are shown in milliseconds, longer ones in seconds.
#[must_use]
pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{}ms", (secs * 1000.0).round() as u64)
    } else {
        format!("{secs:.2}s")
    }
}

// ============================================================================
// Test nodes
// ============================================================================

/// Index of a [`TestNode`] within its [`PackageNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestId(usize);

/// One test or subtest
#[derive(Debug, Clone, PartialEq)]
pub struct TestNode {
    name: String,
    display_name: String,
    package: String,
    status: TestStatus,
    duration: f64,
    output: Vec<String>,
    started_at: DateTime<Utc>,
    /// Input position of the event that set `started_at`; breaks timestamp ties
    sequence: usize,
    children: BTreeMap<String, TestId>,
    parent: Option<(String, TestId)>,
    /// What this node has contributed to the package and report counters
    counted: Summary,
    /// Set once a direct subtest fails; later terminal events cannot clear it
    failed_child: bool,
}

impl TestNode {
    fn new(
        name: &str,
        package: &str,
        parent: Option<(String, TestId)>,
        started_at: DateTime<Utc>,
        sequence: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            display_name: naming::display_name(name),
            package: package.to_string(),
            status: TestStatus::Unknown,
            duration: 0.0,
            output: Vec::new(),
            started_at,
            sequence,
            children: BTreeMap::new(),
            parent,
            counted: Summary::default(),
            failed_child: false,
        }
    }

    /// Fully-qualified test name (`TestParent/child`)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Readable name of the last segment, see [`naming::display_name`]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Package this test belongs to
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// Elapsed seconds from the last terminal event
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Human-readable duration
    #[must_use]
    pub fn duration_display(&self) -> String {
        format_duration(self.duration)
    }

    /// Captured output lines in arrival order
    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Start time, used for display ordering only
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether the name contains a `/`
    #[must_use]
    pub fn is_subtest(&self) -> bool {
        self.parent.is_some()
    }

    /// Name of the direct parent, if this is a subtest
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_ref().map(|(name, _)| name.as_str())
    }

    /// Child ids keyed by the child's last name segment
    #[must_use]
    pub fn children(&self) -> &BTreeMap<String, TestId> {
        &self.children
    }

    /// A node without subtests; only leaves are counted in summaries
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Counts this node contributes to its package and report
    ///
    /// One per terminal event received while it was a leaf; always zero for
    /// containers once aggregation has finished.
    #[must_use]
    pub fn counted(&self) -> &Summary {
        &self.counted
    }

    fn order_key(&self) -> (DateTime<Utc>, usize) {
        (self.started_at, self.sequence)
    }
}

// ============================================================================
// Packages
// ============================================================================

/// All tests of one package
#[derive(Debug, Clone, PartialEq)]
pub struct PackageNode {
    name: String,
    tests: Vec<TestNode>,
    index: HashMap<String, TestId>,
    duration: f64,
    summary: Summary,
}

impl PackageNode {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
            index: HashMap::new(),
            duration: 0.0,
            summary: Summary::default(),
        }
    }

    /// Package import path
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cumulative elapsed seconds of passed and failed tests
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Leaf test counters
    #[must_use]
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Number of test nodes, containers included
    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Whether the package has no test nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Look up a node by fully-qualified name
    #[must_use]
    pub fn test(&self, name: &str) -> Option<&TestNode> {
        self.index.get(name).map(|&id| self.node(id))
    }

    /// Resolve an id handed out by this package
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another package.
    #[must_use]
    pub fn node(&self, id: TestId) -> &TestNode {
        &self.tests[id.0]
    }

    /// All nodes in creation order
    pub fn tests(&self) -> impl Iterator<Item = &TestNode> {
        self.tests.iter()
    }

    /// All nodes with their ids, in creation order
    pub fn entries(&self) -> impl Iterator<Item = (TestId, &TestNode)> {
        self.tests.iter().enumerate().map(|(idx, t)| (TestId(idx), t))
    }

    /// Root (non-subtest) nodes sorted by start time, then input order
    #[must_use]
    pub fn root_tests(&self) -> Vec<&TestNode> {
        let mut roots: Vec<_> = self.tests.iter().filter(|t| !t.is_subtest()).collect();
        roots.sort_by_key(|t| t.order_key());
        roots
    }

    /// Direct children of `test` sorted by start time, then input order
    #[must_use]
    pub fn children_of(&self, test: &TestNode) -> Vec<&TestNode> {
        let mut children: Vec<_> = test.children.values().map(|&id| self.node(id)).collect();
        children.sort_by_key(|t| t.order_key());
        children
    }

    /// Whether any node in this package failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.tests.iter().any(|t| t.status == TestStatus::Failed)
    }

    // ------------------------------------------------------------------------
    // Mutation, used by the aggregator only
    // ------------------------------------------------------------------------

    pub(crate) fn node_mut(&mut self, id: TestId) -> &mut TestNode {
        &mut self.tests[id.0]
    }

    pub(crate) fn parent_id(&self, id: TestId) -> Option<TestId> {
        self.node(id).parent.as_ref().map(|&(_, parent)| parent)
    }

    /// Look up a node, creating it (and any missing ancestors) on first sight
    ///
    /// New ancestors are placeholders stamped with the creating event's time;
    /// their own `run` event corrects it later.
    pub(crate) fn get_or_insert(
        &mut self,
        name: &str,
        started_at: DateTime<Utc>,
        sequence: usize,
    ) -> TestId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }

        // Walk up to the nearest existing ancestor, then create top-down
        let mut missing = Vec::new();
        let mut current = name;
        while let Some((parent_name, _)) = naming::split_parent(current) {
            if self.index.contains_key(parent_name) {
                break;
            }
            missing.push(parent_name);
            current = parent_name;
        }
        for ancestor in missing.into_iter().rev() {
            self.insert_node(ancestor, started_at, sequence);
        }
        self.insert_node(name, started_at, sequence)
    }

    /// Append a node whose parent, if any, is already indexed
    fn insert_node(&mut self, name: &str, started_at: DateTime<Utc>, sequence: usize) -> TestId {
        let id = TestId(self.tests.len());
        let link = naming::split_parent(name).and_then(|(parent_name, child_name)| {
            let &parent_id = self.index.get(parent_name)?;
            self.node_mut(parent_id)
                .children
                .insert(child_name.to_string(), id);
            Some((parent_name.to_string(), parent_id))
        });
        self.tests
            .push(TestNode::new(name, &self.name, link, started_at, sequence));
        self.index.insert(name.to_string(), id);
        id
    }

    pub(crate) fn touch(&mut self, id: TestId, started_at: DateTime<Utc>, sequence: usize) {
        let node = self.node_mut(id);
        node.started_at = started_at;
        node.sequence = sequence;
    }

    pub(crate) fn set_result(&mut self, id: TestId, status: TestStatus, duration: f64) {
        let node = self.node_mut(id);
        node.status = if node.failed_child {
            TestStatus::Failed
        } else {
            status
        };
        node.duration = duration;
    }

    /// Force a parent to failed because one of its subtests failed
    pub(crate) fn mark_failed(&mut self, id: TestId) {
        let node = self.node_mut(id);
        node.status = TestStatus::Failed;
        node.failed_child = true;
    }

    pub(crate) fn push_output(&mut self, id: TestId, line: &str) {
        self.node_mut(id).output.push(line.to_string());
    }

    pub(crate) fn add_duration(&mut self, secs: f64) {
        self.duration += secs;
    }

    /// Count one `status` result for `id` in this package and in `report`
    pub(crate) fn credit(&mut self, id: TestId, status: TestStatus, report: &mut Summary) {
        if !status.is_known() {
            return;
        }
        self.tests[id.0].counted.credit(status);
        self.summary.credit(status);
        report.credit(status);
    }

    /// Remove everything `id` has contributed so far
    pub(crate) fn withdraw(&mut self, id: TestId, report: &mut Summary) {
        let counted = std::mem::take(&mut self.tests[id.0].counted);
        self.summary.subtract(&counted);
        report.subtract(&counted);
    }
}

// ============================================================================
// Report
// ============================================================================

/// The aggregated result of one event stream
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    title: String,
    generated_at: DateTime<Utc>,
    duration: f64,
    summary: Summary,
    packages: BTreeMap<String, PackageNode>,
}

impl Report {
    pub(crate) fn new(title: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            generated_at,
            duration: 0.0,
            summary: Summary::default(),
            packages: BTreeMap::new(),
        }
    }

    /// Report title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// When aggregation ran
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Cumulative elapsed seconds across all packages
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Leaf test counters across all packages
    #[must_use]
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Packages sorted by name
    pub fn packages(&self) -> impl Iterator<Item = &PackageNode> {
        self.packages.values()
    }

    /// Look up a package by name
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&PackageNode> {
        self.packages.get(name)
    }

    /// Number of packages
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Split borrow used by the aggregator to update both counter levels
    pub(crate) fn parts_mut(
        &mut self,
    ) -> (
        &mut BTreeMap<String, PackageNode>,
        &mut Summary,
        &mut f64,
    ) {
        (&mut self.packages, &mut self.summary, &mut self.duration)
    }
}
