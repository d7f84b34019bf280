// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test name handling
//!
//! Go encodes the subtest hierarchy in the test name itself: `TestAuth/valid_token`
//! is the subtest `valid_token` of `TestAuth`. These helpers are the only place
//! names are split; the aggregator calls them once per node, at creation.

const TEST_PREFIX: &str = "Test";

/// Split a test name into `(parent, child)` at its last `/`
///
/// Returns `None` for root tests.
#[must_use]
pub fn split_parent(name: &str) -> Option<(&str, &str)> {
    name.rfind('/').map(|idx| (&name[..idx], &name[idx + 1..]))
}

/// The last `/`-segment of a test name
#[must_use]
pub fn leaf_segment(name: &str) -> &str {
    split_parent(name).map_or(name, |(_, child)| child)
}

/// Convert a test name into a readable form
///
/// Each `/`-segment is formatted on its own:
///
/// ```
/// use test2html_core::naming::format_test_name;
///
/// assert_eq!(format_test_name("TestLoginSuperuser"), "Test Login Superuser");
/// assert_eq!(format_test_name("Test_foo_bar"), "Test foo bar");
/// assert_eq!(format_test_name("TestAuth/TestValidToken"), "Test Auth/Test Valid Token");
/// assert_eq!(format_test_name("helper_case"), "helper_case");
/// ```
#[must_use]
pub fn format_test_name(name: &str) -> String {
    name.split('/')
        .map(format_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// The name shown for a node in the tree: the formatted last segment
#[must_use]
pub fn display_name(name: &str) -> String {
    format_segment(leaf_segment(name))
}

fn format_segment(segment: &str) -> String {
    // Only Go-style test function names are rewritten
    let Some(rest) = segment.strip_prefix(TEST_PREFIX) else {
        return segment.to_string();
    };

    let mut spaced = String::with_capacity(segment.len() + 8);
    let mut prev: Option<char> = None;
    for c in segment.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            spaced.push(' ');
        }
        spaced.push(if c == '_' { ' ' } else { c });
        prev = Some(c);
    }

    if rest.is_empty() {
        return spaced;
    }

    // `spaced` still starts with the prefix; normalise the gap after it
    let tail = spaced[TEST_PREFIX.len()..].trim_start();
    if tail.is_empty() {
        return TEST_PREFIX.to_string();
    }
    format!("{TEST_PREFIX} {tail}")
}
