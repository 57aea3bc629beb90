use std::{cmp::Ordering, fmt};

use crate::{sort::SortDirection, text};

/// An ordered two-element tuple.
///
/// Used as a `(column, value)` filter criterion by the table's matching
/// functions, and as a general sortable tuple with comparators built per
/// call site through [`Pair::by_first`] and friends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Pair<A, B> {
    pub first: A,
    pub second: B,
}

/// `(column, expected value)` equality test.
pub type Criterion = Pair<String, String>;

impl<A, B> Pair<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Pair { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn into_tuple(self) -> (A, B) {
        (self.first, self.second)
    }

    /// Comparator on the first element using `cmp`, in `direction`.
    pub fn by_first<F>(direction: SortDirection, cmp: F) -> impl Fn(&Self, &Self) -> Ordering
    where
        F: Fn(&A, &A) -> Ordering,
    {
        move |left, right| direction.apply(cmp(&left.first, &right.first))
    }

    /// Comparator on the second element using `cmp`, in `direction`.
    pub fn by_second<F>(direction: SortDirection, cmp: F) -> impl Fn(&Self, &Self) -> Ordering
    where
        F: Fn(&B, &B) -> Ordering,
    {
        move |left, right| direction.apply(cmp(&left.second, &right.second))
    }
}

impl Criterion {
    pub fn criterion(column: impl Into<String>, value: impl Into<String>) -> Self {
        Pair::new(column.into(), value.into())
    }
}

impl<A, B> From<(A, B)> for Pair<A, B> {
    fn from((first, second): (A, B)) -> Self {
        Pair::new(first, second)
    }
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for Pair<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.first, self.second)
    }
}

/// Case-insensitive text comparison for use with [`Pair::by_first`] /
/// [`Pair::by_second`].
pub fn text_order<S: AsRef<str>>(left: &S, right: &S) -> Ordering {
    text::cmp_ignore_case(left.as_ref(), right.as_ref())
}

/// Total order over floats (NaN after every number).
pub fn float_order(left: &f64, right: &f64) -> Ordering {
    left.total_cmp(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparators_are_built_per_call_site() {
        let mut pairs = vec![
            Pair::new("beta".to_string(), 2.0),
            Pair::new("Alpha".to_string(), 3.0),
            Pair::new("gamma".to_string(), 1.0),
        ];
        pairs.sort_by(Pair::by_first(SortDirection::Asc, text_order));
        assert_eq!(pairs[0].first, "Alpha");

        pairs.sort_by(Pair::by_second(SortDirection::Desc, float_order));
        let order: Vec<f64> = pairs.iter().map(|p| p.second).collect();
        assert_eq!(order, vec![3.0, 2.0, 1.0]);

        pairs.sort_by(Pair::by_second(SortDirection::Asc, partial_order));
        assert_eq!(pairs[0].second, 1.0);
    }

    fn partial_order(left: &f64, right: &f64) -> Ordering {
        left.partial_cmp(right).unwrap_or(Ordering::Equal)
    }

    #[test]
    fn display_matches_bracketed_form() {
        assert_eq!(Pair::new("id", 3).to_string(), "[id,3]");
        let criterion = Criterion::criterion("score", "10");
        assert_eq!(criterion.first(), "score");
    }
}
