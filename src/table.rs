//! In-memory table: a shared [`Header`], rows in insertion (or sorted) order,
//! and optional per-column [`ColumnIndex`]es.
//!
//! The table is the only way to change a cell. Every append, update, and
//! removal re-files the affected row in each live index before returning, so
//! an indexed lookup always sees the same rows a full scan would.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use log::debug;

use crate::{
    error::{TableError, TableResult},
    header::Header,
    index::ColumnIndex,
    pair::Pair,
    reader::CsvReader,
    row::{ColumnKey, Row, RowId},
    sort::SortCriteria,
    text,
    window::Window,
    writer::CsvWriter,
};

#[derive(Debug, Clone)]
pub struct Table {
    header: Arc<Header>,
    rows: HashMap<RowId, Row>,
    order: Vec<RowId>,
    indexes: Vec<Option<ColumnIndex>>,
    next_id: u64,
}

impl Table {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_header(Header::new(names))
    }

    pub fn with_header(header: Header) -> Self {
        let width = header.len();
        Table {
            header: Arc::new(header),
            rows: HashMap::new(),
            order: Vec::new(),
            indexes: vec![None; width],
            next_id: 0,
        }
    }

    /// New table over `header`, seeded with copies of `rows` (positional).
    pub fn from_rows<'a, I>(header: Header, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let mut table = Self::with_header(header);
        table.append_rows(rows);
        table
    }

    /// Parses CSV text (with a header line) in the default dialect.
    pub fn from_bytes(bytes: &[u8]) -> TableResult<Self> {
        CsvReader::new(bytes).read_table(true)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.order.iter().map(|id| &self.rows[id])
    }

    pub fn row_ids(&self) -> &[RowId] {
        &self.order
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    pub fn row_at(&self, position: usize) -> Option<&Row> {
        self.order.get(position).map(|id| &self.rows[id])
    }

    /// Appends a row from positional values, padded or truncated to the
    /// column count.
    pub fn append_row<I, S>(&mut self, values: I) -> RowId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = Row::new(self.allocate_id(), self.header.clone(), values);
        self.insert_row(row)
    }

    /// Appends a row from `(column name, value)` pairs. Columns not named stay
    /// empty and unknown names are ignored.
    pub fn append_record<I, K, V>(&mut self, values: I) -> RowId
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut cells = vec![String::new(); self.header.len()];
        for (name, value) in values {
            if let Some(idx) = self.header.position(name.as_ref()) {
                cells[idx] = value.into();
            }
        }
        self.append_row(cells)
    }

    pub fn append_empty_row(&mut self) -> RowId {
        self.append_row(std::iter::empty::<String>())
    }

    /// Appends positional copies of `rows`.
    pub fn append_rows<'a, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'a Row>,
    {
        for row in rows {
            self.append_row(row.raw_values().iter().cloned());
        }
    }

    /// Copies every row of `other`, matching columns by name. Columns this
    /// table has but `other` lacks are left empty.
    pub fn append_all_from(&mut self, other: &Table) {
        for row in other.rows() {
            let cells = self
                .header
                .names()
                .iter()
                .map(|name| row.value(name.as_str()).unwrap_or_default().to_string())
                .collect::<Vec<_>>();
            self.append_row(cells);
        }
    }

    /// Sets one cell and re-files the row in that column's index.
    ///
    /// Returns `false` when the row or column does not exist.
    pub fn set_value<K: ColumnKey>(&mut self, id: RowId, column: K, value: impl Into<String>) -> bool {
        let Some(idx) = column.resolve(&self.header) else {
            return false;
        };
        let Some(row) = self.rows.get_mut(&id) else {
            return false;
        };
        let value = value.into();
        match self.indexes[idx].as_mut() {
            Some(index) => {
                index.unfile(id, row.value(idx).unwrap_or_default());
                row.set_cell(idx, value);
                index.file(id, row.value(idx).unwrap_or_default());
            }
            None => row.set_cell(idx, value),
        }
        true
    }

    pub fn clear_value<K: ColumnKey>(&mut self, id: RowId, column: K) -> bool {
        self.set_value(id, column, String::new())
    }

    /// Removes the row with `id`, returning whether it was present.
    pub fn remove_row(&mut self, id: RowId) -> bool {
        let Some(pos) = self.order.iter().position(|candidate| *candidate == id) else {
            return false;
        };
        self.order.remove(pos);
        if let Some(row) = self.rows.remove(&id) {
            for index in self.indexes.iter_mut().flatten() {
                index.remove(&row);
            }
        }
        true
    }

    /// Builds an index for `column` from the current rows. Unknown or already
    /// indexed columns are left alone.
    pub fn add_index<K: ColumnKey>(&mut self, column: K) {
        let Some(idx) = column.resolve(&self.header) else {
            debug!("Skipping index for unknown column '{column}'");
            return;
        };
        if self.indexes[idx].is_some() {
            return;
        }
        let index = ColumnIndex::build(idx, self.rows());
        debug!(
            "Indexed column '{}' ({} row(s), {} distinct value(s))",
            self.header.name(idx),
            self.len(),
            index.distinct_values()
        );
        self.indexes[idx] = Some(index);
    }

    pub fn is_indexed<K: ColumnKey>(&self, column: K) -> bool {
        column
            .resolve(&self.header)
            .is_some_and(|idx| self.indexes[idx].is_some())
    }

    /// Rebuilds every existing index from the current rows.
    pub fn reindex(&mut self) {
        let rows = &self.rows;
        let order = &self.order;
        let mut rebuilt = 0usize;
        for index in self.indexes.iter_mut().flatten() {
            *index = ColumnIndex::build(index.column(), order.iter().map(|id| &rows[id]));
            rebuilt += 1;
        }
        debug!("Rebuilt {rebuilt} index(es) over {} row(s)", order.len());
    }

    /// Case-insensitive exact matches of `value` in `column`, clipped to
    /// `window`. Indexed columns are answered from the index; the rest are
    /// scanned in table order.
    pub fn find_matching_rows<K: ColumnKey>(&self, column: K, value: &str, window: Window) -> Vec<&Row> {
        let Some(idx) = column.resolve(&self.header) else {
            return Vec::new();
        };
        match &self.indexes[idx] {
            Some(index) => index
                .matches(value)
                .iter()
                .skip(window.offset())
                .take(window.limit().unwrap_or(usize::MAX))
                .map(|id| &self.rows[id])
                .collect(),
            None => {
                let bound = window.scan_bound().unwrap_or(usize::MAX);
                let matches = self
                    .rows()
                    .filter(|row| cell_matches(row, idx, value))
                    .take(bound)
                    .collect::<Vec<_>>();
                window.apply(matches)
            }
        }
    }

    pub fn find_first_match<K: ColumnKey>(&self, column: K, value: &str) -> Option<&Row> {
        self.find_matching_rows(column, value, Window::first())
            .into_iter()
            .next()
    }

    pub fn has_match<K: ColumnKey>(&self, column: K, value: &str) -> bool {
        self.find_first_match(column, value).is_some()
    }

    /// Rows matching every `(column, value)` criterion.
    ///
    /// Only the first criterion can be answered from an index; the others
    /// narrow its candidates by scanning them. A later criterion naming an
    /// unknown column is not skipped: it empties the result, exactly like an
    /// unknown first criterion.
    pub fn find_matching_rows_all<C, V>(&self, criteria: &[Pair<C, V>], window: Window) -> TableResult<Vec<&Row>>
    where
        C: AsRef<str>,
        V: AsRef<str>,
    {
        let Some((first, rest)) = criteria.split_first() else {
            return Err(TableError::InvalidArgument(
                "Filter criteria required".to_string(),
            ));
        };
        if rest.is_empty() {
            return Ok(self.find_matching_rows(first.first.as_ref(), first.second.as_ref(), window));
        }

        let mut rows = self.find_matching_rows(first.first.as_ref(), first.second.as_ref(), Window::all());
        for criterion in rest {
            if rows.is_empty() {
                break;
            }
            match self.header.position(criterion.first.as_ref()) {
                Some(idx) => rows.retain(|row| cell_matches(row, idx, criterion.second.as_ref())),
                None => rows.clear(),
            }
        }
        Ok(window.apply(rows))
    }

    pub fn find_first_match_all<C, V>(&self, criteria: &[Pair<C, V>]) -> TableResult<Option<&Row>>
    where
        C: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(self
            .find_matching_rows_all(criteria, Window::first())?
            .into_iter()
            .next())
    }

    pub fn has_match_all<C, V>(&self, criteria: &[Pair<C, V>]) -> TableResult<bool>
    where
        C: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(self.find_first_match_all(criteria)?.is_some())
    }

    pub fn count_matching_rows<C, V>(&self, criteria: &[Pair<C, V>]) -> TableResult<usize>
    where
        C: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(self.find_matching_rows_all(criteria, Window::all())?.len())
    }

    /// Removes every row matching all criteria, last match first, and returns
    /// how many rows were removed.
    pub fn remove_matching_rows<C, V>(&mut self, criteria: &[Pair<C, V>]) -> TableResult<usize>
    where
        C: AsRef<str>,
        V: AsRef<str>,
    {
        let ids = self
            .find_matching_rows_all(criteria, Window::all())?
            .into_iter()
            .map(Row::id)
            .collect::<Vec<_>>();
        let mut removed = 0usize;
        for id in ids.into_iter().rev() {
            if self.remove_row(id) {
                removed += 1;
            }
        }
        debug!("Removed {removed} matching row(s)");
        Ok(removed)
    }

    /// First match's value in `join_column`.
    pub fn lookup_value<K: ColumnKey, J: ColumnKey>(&self, column: K, value: &str, join_column: J) -> Option<&str> {
        self.find_first_match(column, value)
            .and_then(|row| row.value(join_column))
    }

    pub fn lookup_int_or<K: ColumnKey, J: ColumnKey>(
        &self,
        column: K,
        value: &str,
        join_column: J,
        default: i32,
    ) -> i32 {
        self.find_first_match(column, value)
            .map_or(default, |row| row.int_or(join_column, default))
    }

    /// Rows tied for the smallest non-blank value in `column`
    /// (case-insensitive). `None` when the column does not exist.
    pub fn find_lowest_rows<K: ColumnKey>(&self, column: K) -> Option<Vec<&Row>> {
        self.find_extreme_rows(column, Ordering::Less)
    }

    /// Rows tied for the largest non-blank value in `column`.
    pub fn find_highest_rows<K: ColumnKey>(&self, column: K) -> Option<Vec<&Row>> {
        self.find_extreme_rows(column, Ordering::Greater)
    }

    fn find_extreme_rows<K: ColumnKey>(&self, column: K, wanted: Ordering) -> Option<Vec<&Row>> {
        let idx = column.resolve(&self.header)?;
        if let Some(index) = &self.indexes[idx] {
            let ids = if wanted == Ordering::Less {
                index.lowest()
            } else {
                index.highest()
            };
            return Some(ids.iter().map(|id| &self.rows[id]).collect());
        }

        let mut best: Option<&str> = None;
        let mut ties = Vec::new();
        for row in self.rows() {
            let value = row.value(idx).unwrap_or_default();
            if value.is_empty() {
                continue;
            }
            let ordering = match best {
                Some(current) => text::cmp_ignore_case(value, current),
                None => wanted,
            };
            if ordering == wanted {
                best = Some(value);
                ties.clear();
                ties.push(row);
            } else if ordering == Ordering::Equal {
                ties.push(row);
            }
        }
        Some(ties)
    }

    /// Stable sort of the rows by `criteria`. Indexes are unaffected.
    pub fn sort(&mut self, criteria: &SortCriteria) {
        let rows = &self.rows;
        self.order
            .sort_by(|left, right| criteria.compare(&rows[left], &rows[right]));
    }

    /// Serializes the header and all rows in the default dialect.
    pub fn to_bytes(&self) -> TableResult<Vec<u8>> {
        let mut writer = CsvWriter::new(Vec::new());
        writer.write_table(self, true)?;
        writer.finish()
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert_row(&mut self, row: Row) -> RowId {
        debug_assert!(Arc::ptr_eq(row.shared_header(), &self.header));
        let id = row.id();
        for index in self.indexes.iter_mut().flatten() {
            index.insert(&row);
        }
        self.order.push(id);
        self.rows.insert(id, row);
        id
    }
}

fn cell_matches(row: &Row, idx: usize, value: &str) -> bool {
    row.value(idx)
        .is_some_and(|cell| text::eq_ignore_case(cell, value))
}
