//! The tie-break ordering that makes a two-way merge alternate sources.

use std::cmp::Ordering;

use ordseq_merge::{Head, MergeOrder};

/// Orders heads by value; among equal values the source that contributed
/// least recently surfaces first, and the lower source index after that.
///
/// Every emission stamps its source with a fresh counter value, so while both
/// sources hold occurrences of the same value the merge alternates between
/// them.
#[derive(Clone, Debug)]
pub struct LeastRecentlyEmitted<F> {
    compare: F,
    emitted: u64,
    last: Vec<u64>,
}

impl<F> LeastRecentlyEmitted<F> {
    pub fn new(compare: F) -> Self {
        Self {
            compare,
            emitted: 0,
            last: Vec::new(),
        }
    }

    /// Number of emissions seen so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Counter value of the last emission from `source`, 0 if none.
    pub fn last_emission(&self, source: usize) -> u64 {
        self.last.get(source).copied().unwrap_or(0)
    }

    /// The primary value comparison, without any tie-break.
    pub fn compare_values<T>(&self, a: &T, b: &T) -> Ordering
    where
        F: Fn(&T, &T) -> Ordering,
    {
        (self.compare)(a, b)
    }
}

impl<T, F> MergeOrder<T> for LeastRecentlyEmitted<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: Head<'_, T>, b: Head<'_, T>) -> Ordering {
        (self.compare)(a.value, b.value)
            .then_with(|| self.last_emission(a.source).cmp(&self.last_emission(b.source)))
            .then_with(|| a.source.cmp(&b.source))
    }

    fn on_emit(&mut self, source: usize) {
        self.emitted += 1;
        if self.last.len() <= source {
            self.last.resize(source + 1, 0);
        }
        self.last[source] = self.emitted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> LeastRecentlyEmitted<fn(&char, &char) -> Ordering> {
        LeastRecentlyEmitted::new(Ord::cmp)
    }

    #[test]
    fn values_decide_first() {
        let order = order();
        let a = Head { source: 1, value: &'a' };
        let b = Head { source: 0, value: &'b' };
        assert_eq!(order.compare(a, b), Ordering::Less);
    }

    #[test]
    fn unemitted_ties_go_to_lower_index() {
        let order = order();
        let first = Head { source: 0, value: &'a' };
        let second = Head { source: 1, value: &'a' };
        assert_eq!(order.compare(first, second), Ordering::Less);
    }

    #[test]
    fn ties_go_to_least_recent_source() {
        let mut order = order();
        order.on_emit(0);
        let first = Head { source: 0, value: &'a' };
        let second = Head { source: 1, value: &'a' };
        assert_eq!(order.compare(first, second), Ordering::Greater);

        order.on_emit(1);
        assert_eq!(order.compare(first, second), Ordering::Less);
        assert_eq!(order.emitted(), 2);
        assert_eq!(order.last_emission(0), 1);
        assert_eq!(order.last_emission(1), 2);
    }
}
