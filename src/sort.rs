//! Chained, per-column row comparators.
//!
//! A [`SortCriteria`] compares two rows on one column and, when they tie,
//! defers to the next criteria in its chain. Blank cells never compete with
//! values: they sort after everything when ascending and before everything
//! when descending, whatever the comparison kind.

use std::{cell::OnceCell, cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::{header::Header, row::Row, text};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How cell text is compared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    /// Case-insensitive text order.
    #[default]
    Lexical,
    /// Floating point order; unparsable text counts as zero.
    Numeric,
}

#[derive(Debug, Clone)]
pub struct SortCriteria {
    column: String,
    kind: SortKind,
    direction: SortDirection,
    next: Option<Box<SortCriteria>>,
    position: OnceCell<Option<usize>>,
}

impl SortCriteria {
    pub fn new(column: impl Into<String>, kind: SortKind, direction: SortDirection) -> Self {
        SortCriteria {
            column: column.into(),
            kind,
            direction,
            next: None,
            position: OnceCell::new(),
        }
    }

    pub fn lexical(column: impl Into<String>, direction: SortDirection) -> Self {
        Self::new(column, SortKind::Lexical, direction)
    }

    pub fn numeric(column: impl Into<String>, direction: SortDirection) -> Self {
        Self::new(column, SortKind::Numeric, direction)
    }

    /// Criteria for the column at `index` of `header`.
    pub fn for_position(
        header: &Header,
        index: usize,
        kind: SortKind,
        direction: SortDirection,
    ) -> Self {
        Self::new(header.name(index), kind, direction)
    }

    /// Builder form of [`SortCriteria::append`].
    pub fn then(self, next: SortCriteria) -> Self {
        self.append(next)
    }

    /// Returns a new chain with `last` attached after the current tail.
    ///
    /// The receiver is left untouched, so a shared prefix can be reused for
    /// several full orderings.
    pub fn append(&self, last: SortCriteria) -> SortCriteria {
        let next = match &self.next {
            Some(next) => next.append(last),
            None => last,
        };
        SortCriteria {
            column: self.column.clone(),
            kind: self.kind,
            direction: self.direction,
            next: Some(Box::new(next)),
            position: OnceCell::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn kind(&self) -> SortKind {
        self.kind
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn next(&self) -> Option<&SortCriteria> {
        self.next.as_deref()
    }

    /// Number of criteria in the chain, including this one.
    pub fn depth(&self) -> usize {
        1 + self.next.as_ref().map_or(0, |next| next.depth())
    }

    pub fn compare(&self, left: &Row, right: &Row) -> Ordering {
        let position = *self
            .position
            .get_or_init(|| left.header().position(&self.column));
        let ordering = match position {
            Some(idx) => self.compare_cells(
                left.value(idx).unwrap_or_default(),
                right.value(idx).unwrap_or_default(),
            ),
            None => Ordering::Equal,
        };
        match (ordering, &self.next) {
            (Ordering::Equal, Some(next)) => next.compare(left, right),
            (ordering, _) => ordering,
        }
    }

    fn compare_cells(&self, left: &str, right: &str) -> Ordering {
        let ascending = self.direction.is_ascending();
        match (left.is_empty(), right.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => {
                if ascending {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, true) => {
                if ascending {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, false) => {
                let ordering = match self.kind {
                    SortKind::Lexical => text::cmp_ignore_case(left, right),
                    SortKind::Numeric => parse_number(left)
                        .partial_cmp(&parse_number(right))
                        .unwrap_or(Ordering::Equal),
                };
                self.direction.apply(ordering)
            }
        }
    }
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.column, self.direction)?;
        if self.kind == SortKind::Numeric {
            f.write_str(":num")?;
        }
        if let Some(next) = &self.next {
            write!(f, ", {next}")?;
        }
        Ok(())
    }
}

fn parse_number(value: &str) -> f64 {
    value.parse::<f64>().unwrap_or(0.0)
}
