//! Case-folding and blank-detection helpers shared by the header, rows,
//! indexes, and sort criteria.
//!
//! All case-insensitive comparisons in the crate go through
//! [`cmp_ignore_case()`] so that header lookup, index key order, exact-match
//! filtering, and lexical sorting agree on what "equal" means.

use std::cmp::Ordering;

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Lowercased form used as the lookup key for column names.
pub fn fold(value: &str) -> String {
    value.to_lowercase()
}

pub fn cmp_ignore_case(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}

pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    if left.len() == right.len() && left == right {
        return true;
    }
    cmp_ignore_case(left, right) == Ordering::Equal
}

/// Interprets a cell as a boolean flag, falling back to `default` for blank
/// or unrecognised text.
pub fn parse_boolean(value: &str, default: bool) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return default;
    }
    if trimmed == "1" {
        return true;
    }
    if trimmed == "0" {
        return false;
    }
    const TRUTHY: &[&str] = &["t", "y", "true", "yes", "1.0"];
    const FALSY: &[&str] = &["f", "n", "false", "no", "null", "0.0"];
    if TRUTHY.iter().any(|t| trimmed.eq_ignore_ascii_case(t)) {
        true
    } else if FALSY.iter().any(|f| trimmed.eq_ignore_ascii_case(f)) {
        false
    } else {
        default
    }
}

/// Owned string ordered and compared without regard to case.
///
/// The original spelling is kept so the first value filed under a key is the
/// one reported back.
#[derive(Debug, Clone)]
pub struct CaseInsensitive(String);

impl CaseInsensitive {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for CaseInsensitive {
    fn eq(&self, other: &Self) -> bool {
        eq_ignore_case(&self.0, &other.0)
    }
}

impl Eq for CaseInsensitive {}

impl Ord for CaseInsensitive {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_ignore_case(&self.0, &other.0)
    }
}

impl PartialOrd for CaseInsensitive {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
