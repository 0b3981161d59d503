//! N+1 query pattern detection.
//!
//! An N+1 pattern shows up in a query log as the same statement shape being
//! executed over and over with different literal values, typically once per
//! row returned by an earlier query. The detector groups a [`QueryLog`] by
//! [`Fingerprint`] and reports every shape that occurs more often than a
//! threshold.
//!
//! ```text
//! SELECT * FROM orders                       ─┐
//! SELECT * FROM products WHERE id = 1         │   group by      ┌────────────────┐
//! SELECT * FROM products WHERE id = 2         ├──fingerprint──▶ │ 1x  orders     │
//! ...                                         │                 │ 50x products ✗ │
//! SELECT * FROM products WHERE id = 50       ─┘                 └────────────────┘
//! ```
//!
//! Threshold semantics are strictly greater than: with the default threshold
//! of 2 a shape seen twice is fine and a shape seen three times is reported.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::{
    fingerprint::{Fingerprint, fingerprint},
    gate::QueryLog
};

/// Default number of repetitions tolerated per fingerprint.
pub const DEFAULT_THRESHOLD: usize = 2;

/// Occurrence count above which a violation is critical, whatever the
/// configured threshold.
pub const CRITICAL_COUNT: usize = 10;

/// Severity of a repeated query shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Repeated more often than the threshold
    Warning,
    /// Repeated more than [`CRITICAL_COUNT`] times
    Critical
}

impl Severity {
    /// Classify an occurrence count that is already known to exceed the
    /// threshold.
    pub fn for_count(count: usize) -> Self {
        if count > CRITICAL_COUNT {
            Self::Critical
        } else {
            Self::Warning
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical")
        }
    }
}

/// A fingerprint that was executed too many times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub fingerprint: Fingerprint,
    /// Number of log entries sharing the fingerprint
    pub count:       usize,
    /// First recorded statement with this fingerprint
    pub example:     String,
    pub severity:    Severity
}

/// Result of running the detector over a whole log.
#[derive(Debug, Clone, Serialize)]
pub struct Nplus1Report {
    pub violations:    Vec<Violation>,
    pub queries_count: usize,
    pub threshold:     usize
}

impl Nplus1Report {
    pub fn new(log: &QueryLog, threshold: usize) -> Self {
        Self {
            violations: detect_nplus1(log, threshold),
            queries_count: log.count(),
            threshold
        }
    }

    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn critical_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Critical)
            .count()
    }
}

struct Group<'a> {
    count:   usize,
    example: &'a str
}

/// Find fingerprints occurring more than `threshold` times.
///
/// Violations are ordered by count, highest first. Equal counts keep the
/// order in which their fingerprints first appeared in the log.
pub fn detect_nplus1(log: &QueryLog, threshold: usize) -> Vec<Violation> {
    let mut groups: IndexMap<Fingerprint, Group<'_>> = IndexMap::new();
    for sql in log.queries() {
        groups
            .entry(fingerprint(sql))
            .and_modify(|g| g.count += 1)
            .or_insert(Group {
                count:   1,
                example: sql
            });
    }
    let mut violations: Vec<Violation> = groups
        .into_iter()
        .filter(|(_, group)| group.count > threshold)
        .map(|(fingerprint, group)| Violation {
            fingerprint,
            count: group.count,
            example: group.example.to_string(),
            severity: Severity::for_count(group.count)
        })
        .collect();
    violations.sort_by(|a, b| b.count.cmp(&a.count));
    debug!(
        queries = log.count(),
        threshold,
        violations = violations.len(),
        "n+1 detection finished"
    );
    violations
}
