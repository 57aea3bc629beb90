use std::{
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
};

use crate::text;

/// Ordered, immutable column names with case-insensitive lookup.
///
/// Names are trimmed on construction. Empty names and repeats of an earlier
/// name keep their position but cannot be looked up by name.
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl Header {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect::<Vec<_>>();
        let mut lookup = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            lookup.entry(text::fold(name)).or_insert(idx);
        }
        Header { names, lookup }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.lookup.get(&text::fold(name.trim())).copied()
    }

    /// Positional name. Panics when `index` is out of range.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn contains_all<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().all(|name| self.contains(name.as_ref()))
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.names.len() == other.names.len()
            && self
                .names
                .iter()
                .zip(other.names.iter())
                .all(|(left, right)| text::eq_ignore_case(left, right))
    }
}

impl Eq for Header {}

impl Hash for Header {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.names.len().hash(state);
        for name in &self.names {
            text::fold(name).hash(state);
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, name) in self.names.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "\"{name}\"")?;
        }
        Ok(())
    }
}
