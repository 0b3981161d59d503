//! Input documents consumed by the CLI.
//!
//! - **Results**: `{"test_id": query_count, ...}` produced by the test suite
//! - **Queries**: `["SELECT ...", ...]` captured SQL in execution order

use std::{collections::BTreeMap, fs, path::Path};

use serde::de::DeserializeOwned;

use crate::error::{AppResult, document_parse_error, file_read_error};

/// Observed query count per test identifier, iterated in key order.
pub type QueryCounts = BTreeMap<String, u64>;

/// Load a results document.
pub fn load_results(path: impl AsRef<Path>) -> AppResult<QueryCounts> {
    read_json(path.as_ref())
}

/// Load a queries document.
pub fn load_queries(path: impl AsRef<Path>) -> AppResult<Vec<String>> {
    read_json(path.as_ref())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let shown = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| file_read_error(&shown, e))?;
    serde_json::from_str(&content).map_err(|e| document_parse_error(&shown, e))
}
