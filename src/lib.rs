//! # QueryGate Library
//!
//! Query count regression and N+1 detection for CI.
//!
//! - [`fingerprint`] - literal-insensitive SQL fingerprints
//! - [`gate`] - query log with an optional budget
//! - [`nplus1`] - N+1 pattern detection over a query log
//! - [`baseline`] - persisted per-test expectations
//! - [`regression`] - baseline comparison

pub mod app;
pub mod baseline;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod fingerprint;
pub mod gate;
pub mod nplus1;
pub mod output;
pub mod regression;
