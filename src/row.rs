use std::{fmt, str::FromStr, sync::Arc};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{
    error::{TableError, TableResult},
    header::Header,
    text,
};

/// Stable identity of a row within its table.
///
/// Ids are never reused by a table, so a stale id simply stops resolving
/// after the row is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub(crate) u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Addresses a column either by position or by (case-insensitive) name.
pub trait ColumnKey: fmt::Display {
    fn resolve(&self, header: &Header) -> Option<usize>;
}

impl ColumnKey for usize {
    fn resolve(&self, header: &Header) -> Option<usize> {
        (*self < header.len()).then_some(*self)
    }
}

impl ColumnKey for str {
    fn resolve(&self, header: &Header) -> Option<usize> {
        header.position(self)
    }
}

impl ColumnKey for String {
    fn resolve(&self, header: &Header) -> Option<usize> {
        header.position(self)
    }
}

impl<T: ColumnKey + ?Sized> ColumnKey for &T {
    fn resolve(&self, header: &Header) -> Option<usize> {
        (**self).resolve(header)
    }
}

/// One record: a cell per header column, bound to the owning table's header.
///
/// Rows are read-only outside the crate; cell updates go through
/// [`Table::set_value`](crate::table::Table::set_value) so indexes stay in
/// step with the data.
#[derive(Debug, Clone)]
pub struct Row {
    id: RowId,
    header: Arc<Header>,
    cells: Vec<String>,
}

impl Row {
    pub(crate) fn new<I, S>(id: RowId, header: Arc<Header>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let width = header.len();
        let mut cells = values
            .into_iter()
            .take(width)
            .map(Into::into)
            .collect::<Vec<String>>();
        cells.resize(width, String::new());
        Row { id, header, cells }
    }

    pub(crate) fn set_cell(&mut self, index: usize, value: String) {
        self.cells[index] = value;
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub(crate) fn shared_header(&self) -> &Arc<Header> {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn column_name(&self, index: usize) -> &str {
        self.header.name(index)
    }

    /// Untrimmed cell contents in column order.
    pub fn raw_values(&self) -> &[String] {
        &self.cells
    }

    /// Trimmed cell value, or `None` when the column does not exist.
    pub fn value<K: ColumnKey>(&self, key: K) -> Option<&str> {
        key.resolve(&self.header).map(|idx| self.cells[idx].trim())
    }

    /// Trimmed cell value, or `default` when the column is missing or blank.
    pub fn value_or<'a, K: ColumnKey>(&'a self, key: K, default: &'a str) -> &'a str {
        match self.value(key) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }

    pub fn int<K: ColumnKey>(&self, key: K) -> TableResult<i32> {
        self.parse_cell(key)
    }

    pub fn int_or<K: ColumnKey>(&self, key: K, default: i32) -> i32 {
        self.int(key).unwrap_or(default)
    }

    pub fn long<K: ColumnKey>(&self, key: K) -> TableResult<i64> {
        self.parse_cell(key)
    }

    pub fn long_or<K: ColumnKey>(&self, key: K, default: i64) -> i64 {
        self.long(key).unwrap_or(default)
    }

    pub fn float<K: ColumnKey>(&self, key: K) -> TableResult<f32> {
        self.parse_cell(key)
    }

    pub fn float_or<K: ColumnKey>(&self, key: K, default: f32) -> f32 {
        self.float(key).unwrap_or(default)
    }

    pub fn double<K: ColumnKey>(&self, key: K) -> TableResult<f64> {
        self.parse_cell(key)
    }

    pub fn double_or<K: ColumnKey>(&self, key: K, default: f64) -> f64 {
        self.double(key).unwrap_or(default)
    }

    /// Like [`Row::double_or`], but zero and NaN also yield `default`.
    pub fn double_non_zero_or<K: ColumnKey>(&self, key: K, default: f64) -> f64 {
        let value = self.double_or(key, default);
        if value.is_nan() || value == 0.0 {
            default
        } else {
            value
        }
    }

    pub fn bool_value<K: ColumnKey>(&self, key: K) -> bool {
        self.bool_or(key, false)
    }

    pub fn bool_or<K: ColumnKey>(&self, key: K, default: bool) -> bool {
        match self.value(key) {
            Some(value) => text::parse_boolean(value, default),
            None => default,
        }
    }

    /// True when every cell is blank.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| text::is_blank(cell))
    }

    /// `(column name, trimmed value)` pairs in column order.
    pub fn to_map(&self) -> Vec<(&str, &str)> {
        self.header
            .names()
            .iter()
            .zip(self.cells.iter())
            .map(|(name, cell)| (name.as_str(), cell.trim()))
            .collect()
    }

    fn parse_cell<K, T>(&self, key: K) -> TableResult<T>
    where
        K: ColumnKey,
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self
            .value(&key)
            .ok_or_else(|| TableError::format(&key, "unknown column"))?;
        value
            .parse::<T>()
            .map_err(|err| TableError::format(&key, format!("{err} (value '{value}')")))
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, cell) in self.cells.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}=\"{}\"", self.header.name(idx), cell)?;
        }
        Ok(())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.to_map();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, value) in entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Row {
        let header = Arc::new(Header::new(["id", "score", "flag"]));
        Row::new(RowId(0), header, values.iter().copied())
    }

    #[test]
    fn new_pads_and_truncates_to_header_width() {
        assert_eq!(row(&["1"]).raw_values(), &["1", "", ""]);
        assert_eq!(row(&["1", "2", "3", "4"]).raw_values(), &["1", "2", "3"]);
    }

    #[test]
    fn value_trims_and_resolves_by_name_or_position() {
        let r = row(&[" 7 ", "x", ""]);
        assert_eq!(r.value("ID"), Some("7"));
        assert_eq!(r.value(0), Some("7"));
        assert_eq!(r.value(9), None);
        assert_eq!(r.value("nope"), None);
        assert_eq!(r.value_or("flag", "n/a"), "n/a");
    }

    #[test]
    fn strict_accessor_reports_column_key() {
        let r = row(&["1", "abc", ""]);
        let err = r.double("score").unwrap_err();
        assert!(err.to_string().starts_with("Key='score' - "));
        assert_eq!(r.double_or("score", 0.0), 0.0);
        assert_eq!(r.int("id").unwrap(), 1);
        assert!(r.long("missing").is_err());
    }

    #[test]
    fn defaulted_getters_fall_back_on_blank_and_unknown_cells() {
        let r = row(&["12", " 2.5 ", "yes"]);
        assert!(r.bool_value("flag"));
        assert!(r.bool_or("missing", true));
        assert_eq!(r.float("score").unwrap(), 2.5);
        assert_eq!(r.float_or("score", 9.0), 2.5);
        assert_eq!(r.long_or("id", 0), 12);

        let blank = row(&["", "x", ""]);
        assert!(!blank.bool_value("flag"));
        assert!(blank.bool_or("flag", true));
        assert_eq!(blank.long_or("id", -1), -1);
        assert_eq!(blank.float_or("score", 1.5), 1.5);
        let err = blank.float("score").unwrap_err();
        assert!(err.to_string().starts_with("Key='score' - "), "{err}");
        assert!(err.to_string().contains("(value 'x')"), "{err}");
        let err = blank.float("nope").unwrap_err();
        assert_eq!(err.to_string(), "Key='nope' - unknown column");
    }

    #[test]
    fn double_non_zero_or_substitutes_zero() {
        let r = row(&["0", "0.0", ""]);
        assert_eq!(r.double_non_zero_or("id", 5.0), 5.0);
        assert_eq!(r.double_non_zero_or("score", 2.5), 2.5);
    }

    #[test]
    fn to_map_pairs_names_with_trimmed_values() {
        let r = row(&[" 1 ", "x", ""]);
        assert_eq!(r.to_map(), vec![("id", "1"), ("score", "x"), ("flag", "")]);
        assert_eq!(r.to_string(), "id=\" 1 \",score=\"x\",flag=\"\"");
    }

    #[test]
    fn is_empty_ignores_whitespace() {
        assert!(row(&[" ", "", "\t"]).is_empty());
        assert!(!row(&["", "x", ""]).is_empty());
    }
}
