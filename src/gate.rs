//! Query log with an optional hard budget.
//!
//! A [`QueryLog`] collects every SQL statement executed during one logical
//! run, in order, without deduplication. It is owned by a single run; when a
//! log must be shared between threads the caller is responsible for wrapping
//! it in a lock.
//!
//! # Budgets
//!
//! A budget is a hard ceiling that is checked on demand with
//! [`QueryLog::assert_budget`]. It is never enforced while recording.
//!
//! ```
//! use querygate::gate::QueryLog;
//!
//! let mut log = QueryLog::with_budget(2);
//! log.record("SELECT 1");
//! log.record("SELECT 2");
//! assert!(log.assert_budget().is_ok());
//!
//! log.record("SELECT 3");
//! let err = log.assert_budget().unwrap_err();
//! assert_eq!((err.count, err.budget), (3, 2));
//! ```
//!
//! [`track`] wraps a closure so the budget check runs on every exit path.

use std::fmt;

use masterror::AppError;
use tracing::{debug, trace};

use crate::nplus1::{Violation, detect_nplus1};

/// Query count went over the configured budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetExceeded {
    /// Queries recorded when the check ran
    pub count:  usize,
    /// Configured ceiling
    pub budget: usize
}

impl fmt::Display for BudgetExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Query budget exceeded: {} > {}",
            self.count, self.budget
        )
    }
}

impl std::error::Error for BudgetExceeded {}

impl From<BudgetExceeded> for AppError {
    fn from(err: BudgetExceeded) -> Self {
        AppError::bad_request(err.to_string())
    }
}

/// Ordered, append-only record of executed SQL.
#[derive(Debug, Clone, Default)]
pub struct QueryLog {
    queries: Vec<String>,
    budget:  Option<usize>
}

impl QueryLog {
    /// Create an unbudgeted log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that fails [`assert_budget`](Self::assert_budget) above
    /// `budget` queries
    pub fn with_budget(budget: usize) -> Self {
        Self {
            queries: Vec::new(),
            budget:  Some(budget)
        }
    }

    pub fn record(&mut self, sql: impl Into<String>) {
        let sql = sql.into();
        trace!(index = self.queries.len(), sql = %sql, "recorded query");
        self.queries.push(sql);
    }

    pub fn count(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn budget(&self) -> Option<usize> {
        self.budget
    }

    /// Recorded statements in execution order
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// Drop every recorded statement. The budget is kept.
    pub fn reset(&mut self) {
        debug!(dropped = self.queries.len(), "query log reset");
        self.queries.clear();
    }

    /// Fail when more queries were recorded than the budget allows.
    ///
    /// A log without a budget always passes.
    pub fn assert_budget(&self) -> Result<(), BudgetExceeded> {
        match self.budget {
            Some(budget) if self.count() > budget => Err(BudgetExceeded {
                count: self.count(),
                budget
            }),
            _ => Ok(())
        }
    }

    /// Run the N+1 detector over this log
    pub fn detect_nplus1(&self, threshold: usize) -> Vec<Violation> {
        detect_nplus1(self, threshold)
    }
}

impl<S: Into<String>> Extend<S> for QueryLog {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for sql in iter {
            self.record(sql);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for QueryLog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut log = Self::new();
        log.extend(iter);
        log
    }
}

/// Run `body` against a fresh log and enforce `budget` afterwards.
///
/// The budget is checked whether or not `body` succeeds. An error returned by
/// `body` wins over the budget error; otherwise a budget overrun is returned
/// in place of the body's value.
///
/// ```
/// use querygate::gate::{BudgetExceeded, track};
///
/// let result: Result<(), BudgetExceeded> = track(Some(1), |log| {
///     log.record("SELECT 1");
///     log.record("SELECT 2");
///     Ok(())
/// });
/// assert_eq!(result, Err(BudgetExceeded { count: 2, budget: 1 }));
/// ```
pub fn track<T, E, F>(budget: Option<usize>, body: F) -> Result<T, E>
where
    F: FnOnce(&mut QueryLog) -> Result<T, E>,
    E: From<BudgetExceeded>
{
    let mut log = match budget {
        Some(budget) => QueryLog::with_budget(budget),
        None => QueryLog::new()
    };
    let outcome = body(&mut log);
    let check = log.assert_budget();
    if let Err(ref exceeded) = check {
        debug!(count = exceeded.count, budget = exceeded.budget, "budget exceeded");
    }
    let value = outcome?;
    check?;
    Ok(value)
}
