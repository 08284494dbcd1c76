//! Orderings over the heads of merge sources.
//!
//! A merge compares `(source index, current value)` pairs rather than bare
//! values, so that an ordering can break ties between equal values using the
//! identity of the sources that produced them. Orderings may also keep state
//! that evolves with every emission (see [`MergeOrder::on_emit`]).

use std::cmp::Ordering;

use crate::config::TieBreak;

/// The current value of one merge source.
#[derive(Debug)]
pub struct Head<'a, T> {
    /// Position of the source in the list passed to the merge.
    pub source: usize,
    /// The value the source currently holds.
    pub value: &'a T,
}

impl<T> Clone for Head<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Head<'_, T> {}

/// A total order over source heads.
///
/// Implementations must be consistent: two distinct sources never compare
/// `Equal`, otherwise the surfacing order of ties is unspecified.
pub trait MergeOrder<T> {
    /// Compare two source heads. `Less` surfaces first.
    fn compare(&self, a: Head<'_, T>, b: Head<'_, T>) -> Ordering;

    /// Called each time the merge emits the head of `source`, before that
    /// source is advanced and reinserted.
    fn on_emit(&mut self, _source: usize) {}
}

/// Orders heads by a value comparison, breaking ties by source position.
#[derive(Clone, Debug)]
pub struct ByValue<F> {
    compare: F,
    tie_break: TieBreak,
}

impl<F> ByValue<F> {
    pub fn new(compare: F) -> Self {
        Self {
            compare,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

impl<T> ByValue<fn(&T, &T) -> Ordering>
where
    T: Ord,
{
    /// Order by `T`'s own [`Ord`] implementation.
    pub fn natural() -> Self {
        Self::new(T::cmp)
    }
}

impl<T, F> MergeOrder<T> for ByValue<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: Head<'_, T>, b: Head<'_, T>) -> Ordering {
        (self.compare)(a.value, b.value).then_with(|| self.tie_break.order(a.source, b.source))
    }
}
