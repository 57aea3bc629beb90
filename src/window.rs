/// Offset/limit applied to the result of a matching query.
///
/// A negative offset is treated as zero and a limit of zero or less means
/// "no limit", so callers passing signed paging values get the same clipping
/// whether or not the column is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    offset: usize,
    limit: Option<usize>,
}

impl Window {
    pub fn new(offset: i64, limit: i64) -> Self {
        Window {
            offset: usize::try_from(offset).unwrap_or(0),
            limit: usize::try_from(limit).ok().filter(|limit| *limit > 0),
        }
    }

    /// Every match.
    pub fn all() -> Self {
        Window::default()
    }

    /// Only the first match.
    pub fn first() -> Self {
        Window {
            offset: 0,
            limit: Some(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of leading matches a scan must collect before it can stop.
    pub(crate) fn scan_bound(&self) -> Option<usize> {
        self.limit.map(|limit| self.offset.saturating_add(limit))
    }

    /// Clips `items` to `[offset, offset + limit)`.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let take = self.limit.unwrap_or(usize::MAX);
        items.into_iter().skip(self.offset).take(take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_offset_and_non_positive_limit_normalize() {
        let window = Window::new(-3, 0);
        assert_eq!(window.offset(), 0);
        assert_eq!(window.limit(), None);
        assert_eq!(Window::new(1, -2).limit(), None);
    }

    #[test]
    fn apply_clips_to_available_items() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(Window::new(1, 2).apply(items.clone()), vec![2, 3]);
        assert_eq!(Window::new(3, 10).apply(items.clone()), vec![4, 5]);
        assert!(Window::new(9, 1).apply(items.clone()).is_empty());
        assert_eq!(Window::all().apply(items), vec![1, 2, 3, 4, 5]);
    }
}
