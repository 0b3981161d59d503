//! Literal-insensitive SQL fingerprints.
//!
//! A fingerprint identifies the *shape* of a statement. Two queries that only
//! differ in quoted string literals, standalone integer literals, whitespace
//! or letter case share a fingerprint:
//!
//! ```
//! use querygate::fingerprint::fingerprint;
//!
//! assert_eq!(
//!     fingerprint("SELECT * FROM users WHERE id = 1"),
//!     fingerprint("select *  from users where id = 9999")
//! );
//! assert_ne!(
//!     fingerprint("SELECT * FROM users"),
//!     fingerprint("SELECT * FROM orders")
//! );
//! ```
//!
//! # Normalization
//!
//! Steps run in a fixed order so that digits inside string literals never
//! leak into the integer pass:
//!
//! 1. `'...'` literals become `?`
//! 2. standalone integers become `?` (`users2` is left alone)
//! 3. whitespace runs collapse to one space, ends are trimmed
//! 4. the text is upper-cased
//! 5. the MD5 digest is hex encoded and cut to [`FINGERPRINT_LEN`] characters
//!
//! Escaped quotes (`'it''s'`) are not understood: the literal ends at the
//! first quote. Changing this would change fingerprints of existing
//! baselines, so it stays as is.

use std::{fmt, sync::LazyLock};

use compact_str::CompactString;
use regex::Regex;
use serde::Serialize;

/// Number of hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 12;

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'[^']*'").expect("valid regex"));

static INTEGER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]+\b").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Canonical identity of a statement shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(CompactString);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Normalize SQL text, stripping literal values.
///
/// This is the text that gets hashed by [`fingerprint`].
pub fn normalize(sql: &str) -> String {
    let stripped = STRING_LITERAL.replace_all(sql, "?");
    let stripped = INTEGER_LITERAL.replace_all(&stripped, "?");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_uppercase()
}

/// Compute the fingerprint of a raw SQL statement.
pub fn fingerprint(sql: &str) -> Fingerprint {
    let digest = md5::compute(normalize(sql).as_bytes());
    let hex = format!("{:x}", digest);
    Fingerprint(CompactString::from(&hex[..FINGERPRINT_LEN]))
}
