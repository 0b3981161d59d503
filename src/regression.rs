//! Query count regression checks against a [`Baseline`].
//!
//! Each test is classified by the first matching row:
//!
//! | Condition                          | Result     |
//! |------------------------------------|------------|
//! | test not in baseline               | `new`      |
//! | `current > expected + tolerance`   | `fail`     |
//! | `current < expected`               | `improved` |
//! | otherwise                          | `pass`     |
//!
//! Tolerance widens the accepted ceiling only. A count below the baseline is
//! `improved` no matter how much slack is configured, and the `delta` of a
//! failure is measured from `expected`, not from the widened ceiling.
//!
//! ```
//! use querygate::{
//!     baseline::Baseline,
//!     regression::{RegressionResult, check_regression}
//! };
//!
//! let baseline: Baseline = [("test_list", 3)].into_iter().collect();
//! assert_eq!(
//!     check_regression(&baseline, "test_list", 10, 0),
//!     RegressionResult::Fail {
//!         expected: 3,
//!         current:  10,
//!         delta:    7
//!     }
//! );
//! ```

use serde::Serialize;
use tracing::debug;

use crate::{baseline::Baseline, document::QueryCounts};

/// Outcome of comparing one test against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RegressionResult {
    /// No expectation recorded yet
    New { current: u64 },
    /// Within `[expected, expected + tolerance]`
    Pass { expected: u64, current: u64 },
    /// Above the tolerated ceiling
    Fail {
        expected: u64,
        current:  u64,
        delta:    u64
    },
    /// Below the expectation
    Improved { expected: u64, current: u64 }
}

impl RegressionResult {
    pub fn current(&self) -> u64 {
        match *self {
            Self::New {
                current
            }
            | Self::Pass {
                current, ..
            }
            | Self::Fail {
                current, ..
            }
            | Self::Improved {
                current, ..
            } => current
        }
    }

    pub fn expected(&self) -> Option<u64> {
        match *self {
            Self::New {
                ..
            } => None,
            Self::Pass {
                expected, ..
            }
            | Self::Fail {
                expected, ..
            }
            | Self::Improved {
                expected, ..
            } => Some(expected)
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// Lowercase status name
    pub fn status(&self) -> &'static str {
        match self {
            Self::New {
                ..
            } => "new",
            Self::Pass {
                ..
            } => "pass",
            Self::Fail {
                ..
            } => "fail",
            Self::Improved {
                ..
            } => "improved"
        }
    }
}

/// Classify `current` for `test_id` against `baseline`.
pub fn check_regression(
    baseline: &Baseline,
    test_id: &str,
    current: u64,
    tolerance: u64
) -> RegressionResult {
    let Some(expected) = baseline.get(test_id) else {
        return RegressionResult::New {
            current
        };
    };
    if current > expected.saturating_add(tolerance) {
        RegressionResult::Fail {
            expected,
            current,
            delta: current - expected
        }
    } else if current < expected {
        RegressionResult::Improved {
            expected,
            current
        }
    } else {
        RegressionResult::Pass {
            expected,
            current
        }
    }
}

/// One classified test in a [`RegressionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub test_id: String,
    #[serde(flatten)]
    pub result:  RegressionResult
}

/// Classification of a whole results document.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionReport {
    /// One entry per result, sorted by test identifier
    pub outcomes:  Vec<TestOutcome>,
    /// Baseline tests absent from the results; informational only
    pub missing:   Vec<String>,
    pub tolerance: u64
}

impl RegressionReport {
    /// Run [`check_regression`] for every entry of `results`.
    pub fn compare(baseline: &Baseline, results: &QueryCounts, tolerance: u64) -> Self {
        let outcomes: Vec<TestOutcome> = results
            .iter()
            .map(|(test_id, &current)| TestOutcome {
                test_id: test_id.clone(),
                result:  check_regression(baseline, test_id, current, tolerance)
            })
            .collect();
        let missing: Vec<String> = baseline
            .test_ids()
            .filter(|id| !results.contains_key(*id))
            .map(str::to_string)
            .collect();
        let report = Self {
            outcomes,
            missing,
            tolerance
        };
        debug!(
            tests = report.outcomes.len(),
            failures = report.failure_count(),
            missing = report.missing.len(),
            "regression check finished"
        );
        report
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Whether the gate should block the build
    pub fn is_blocked(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_failure())
    }

    pub fn count_status(&self, status: &str) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.result.status() == status)
            .count()
    }
}
