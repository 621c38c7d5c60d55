//! Dependency map ordering.
//!
//! Sorts requirement names the way the host package manager does when it
//! edits its own manifest: platform packages (`php`, `hhvm`, `ext-*`,
//! `lib-*`) first, then regular `vendor/name` packages, each group in
//! natural order. Keeping the same order means synchronized files diff
//! minimally against files the package manager writes itself.

use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::LazyLock;

static PLATFORM_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:php(?:-64bit)?|hhvm|(?:ext|lib)-[A-Za-z0-9_.]+(?:-[A-Za-z0-9_.]+)?)$")
        .expect("platform package pattern is valid")
});

/// Whether `name` is a platform (runtime/engine) pseudo-package.
pub fn is_platform_package(name: &str) -> bool {
    PLATFORM_PACKAGE.is_match(name)
}

/// Rank bucket for a requirement name, lowest sorts first.
pub fn rank(name: &str) -> u8 {
    if !is_platform_package(name) {
        return 5;
    }
    if name.starts_with("php") {
        0
    } else if name.starts_with("hhvm") {
        1
    } else if name.starts_with("ext") {
        2
    } else if name.starts_with("lib") {
        3
    } else {
        4
    }
}

/// Prefixed key used for comparison, e.g. `2-ext-curl`.
pub fn sort_key(name: &str) -> String {
    format!("{}-{name}", rank(name))
}

/// Compare two requirement names.
pub fn compare(left: &str, right: &str) -> Ordering {
    natural_cmp(&sort_key(left), &sort_key(right))
}

/// Reorder a dependency map. Keys and values are untouched; ties keep
/// their original relative order.
pub fn order(packages: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = packages.into_iter().collect();
    entries.sort_by(|(left, _), (right, _)| compare(left, right));
    entries.into_iter().collect()
}

/// Natural-order string comparison.
///
/// Runs of ASCII digits compare by numeric value, everything else byte by
/// byte. Strings that compare equal that way (`a01` vs `a1`) fall back to
/// plain byte order so the result is total.
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let a = left.as_bytes();
    let b = right.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let (end_a, end_b) = (digit_run_end(a, i), digit_run_end(b, j));
            let ordering = compare_digit_runs(&a[i..end_a], &b[j..end_b]);
            if ordering != Ordering::Equal {
                return ordering;
            }
            i = end_a;
            j = end_b;
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ordering => return ordering,
            }
        }
    }

    (a.len() - i)
        .cmp(&(b.len() - j))
        .then_with(|| left.cmp(right))
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset)
}

fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let trim = |run: &[u8]| -> usize { run.iter().take_while(|&&d| d == b'0').count() };
    let a = &a[trim(a)..];
    let b = &b[trim(b)..];
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
