use std::collections::BTreeMap;

use crate::{
    row::{Row, RowId},
    text::CaseInsensitive,
};

/// Secondary index over one column: trimmed cell value to the rows holding
/// it, keyed case-insensitively.
///
/// Within a bucket rows are kept in the order they were filed. Buckets that
/// become empty are dropped so the first and last keys always name live
/// values.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    column: usize,
    buckets: BTreeMap<CaseInsensitive, Vec<RowId>>,
}

impl ColumnIndex {
    pub fn build<'a, I>(column: usize, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let mut index = ColumnIndex {
            column,
            buckets: BTreeMap::new(),
        };
        for row in rows {
            index.insert(row);
        }
        index
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of distinct keys, case-insensitively.
    pub fn distinct_values(&self) -> usize {
        self.buckets.len()
    }

    pub fn insert(&mut self, row: &Row) {
        let value = row.value(self.column).unwrap_or_default();
        self.file(row.id(), value);
    }

    pub(crate) fn file(&mut self, id: RowId, value: &str) {
        self.buckets
            .entry(CaseInsensitive::new(value))
            .or_default()
            .push(id);
    }

    /// Removes `id` from the bucket for `value`, which must be the trimmed
    /// value the row was filed under.
    pub(crate) fn unfile(&mut self, id: RowId, value: &str) -> bool {
        let key = CaseInsensitive::new(value);
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|candidate| *candidate == id) else {
            return false;
        };
        bucket.remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        true
    }

    pub fn remove(&mut self, row: &Row) -> bool {
        let value = row.value(self.column).unwrap_or_default();
        self.unfile(row.id(), value)
    }

    pub fn matches(&self, value: &str) -> &[RowId] {
        self.buckets
            .get(&CaseInsensitive::new(value))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Rows holding the smallest non-blank value.
    pub fn lowest(&self) -> &[RowId] {
        self.buckets
            .iter()
            .find(|(key, _)| !key.as_str().is_empty())
            .map(|(_, ids)| ids.as_slice())
            .unwrap_or_default()
    }

    /// Rows holding the largest non-blank value.
    pub fn highest(&self) -> &[RowId] {
        self.buckets
            .iter()
            .next_back()
            .filter(|(key, _)| !key.as_str().is_empty())
            .map(|(_, ids)| ids.as_slice())
            .unwrap_or_default()
    }
}
