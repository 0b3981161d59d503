//! Persisted per-test query count expectations.
//!
//! A baseline is a flat JSON object mapping test identifiers to the number of
//! queries each test is expected to issue:
//!
//! ```json
//! {
//!   "test_list": 3,
//!   "test_orders": 5
//! }
//! ```
//!
//! Keys are always written in sorted order with two-space indentation and a
//! trailing newline so the file diffs cleanly under version control. Saving
//! replaces the whole snapshot; entries are never merged.

use std::{
    collections::{BTreeMap, btree_map},
    fs,
    io::{ErrorKind, Write},
    path::Path
};

use serde::{Deserialize, Serialize};
use tempfile::Builder;
use tracing::debug;

use crate::error::{AppResult, baseline_write_error, document_parse_error, file_read_error};

/// Default location of the baseline snapshot.
pub const DEFAULT_BASELINE_PATH: &str = ".querygate.json";

/// Expected query count per test identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    entries: BTreeMap<String, u64>
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot, or an empty baseline when `path` does not exist.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or is not a JSON object
    /// of non-negative integers. Only a missing file counts as empty.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %shown, "no baseline snapshot, starting empty");
                return Ok(Self::new());
            }
            Err(e) => return Err(file_read_error(&shown, e))
        };
        let baseline: Self =
            serde_json::from_str(&content).map_err(|e| document_parse_error(&shown, e))?;
        debug!(path = %shown, tests = baseline.len(), "baseline loaded");
        Ok(baseline)
    }

    /// Overwrite the snapshot at `path` with exactly these entries.
    ///
    /// The document is written to a temporary file next to `path`, flushed to
    /// disk and renamed over the target, so a concurrent reader sees either
    /// the old snapshot or the new one. An existing snapshot keeps its
    /// permissions; a new one is created `0644` (subject to the umask).
    pub fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new(".")
        };
        fs::create_dir_all(dir).map_err(|e| baseline_write_error(&shown, e))?;

        let mut document = self.to_json();
        document.push('\n');

        #[cfg_attr(not(unix), allow(unused_mut))]
        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o644));
        }
        let mut tmp = builder
            .tempfile_in(dir)
            .map_err(|e| baseline_write_error(&shown, e))?;
        if let Ok(existing) = fs::metadata(path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| baseline_write_error(&shown, e))?;
        }
        tmp.write_all(document.as_bytes())
            .map_err(|e| baseline_write_error(&shown, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| baseline_write_error(&shown, e))?;
        tmp.persist(path)
            .map_err(|e| baseline_write_error(&shown, e.error))?;
        debug!(path = %shown, tests = self.len(), "baseline saved");
        Ok(())
    }

    /// Pretty JSON with sorted keys, without the trailing newline
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.entries).unwrap_or_default()
    }

    pub fn get(&self, test_id: &str) -> Option<u64> {
        self.entries.get(test_id).copied()
    }

    pub fn contains(&self, test_id: &str) -> bool {
        self.entries.contains_key(test_id)
    }

    pub fn insert(&mut self, test_id: impl Into<String>, count: u64) -> Option<u64> {
        self.entries.insert(test_id.into(), count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, u64> {
        self.entries.iter()
    }

    pub fn test_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, u64>> for Baseline {
    fn from(entries: BTreeMap<String, u64>) -> Self {
        Self {
            entries
        }
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Baseline {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect()
        }
    }
}

impl<'a> IntoIterator for &'a Baseline {
    type Item = (&'a String, &'a u64);
    type IntoIter = btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
