//! The cursor contract.

use std::cmp::Ordering;
use std::ops::Bound;

use crate::filter::FilterCursor;
use crate::iter::CursorIter;
use crate::range::{RangeCursor, ValueRangeCursor};

/// A single-pass, stateful, pull producer of values.
///
/// All implementations must satisfy these invariants:
/// - `load_next` returns `Ok(true)` when a value is available through
///   `current`, and `Ok(false)` once the sequence is exhausted. Exhaustion is
///   sticky: later calls keep returning `Ok(false)` without error.
/// - `current` returns the value made available by the last successful
///   `load_next`, and `None` before the first one or after exhaustion.
/// - `close` releases resources, is idempotent, and is safe to call even if
///   `load_next` was never invoked or returned an error.
///
/// Cursors fed into ordered merges or diffs must yield non-decreasing values
/// under the ordering supplied with them. This is a precondition; cursors do
/// not verify it (see [`SortedCheck`](crate::SortedCheck) for an opt-in check).
pub trait Cursor {
    /// The type of values produced.
    type Item;
    /// The error kind raised by `load_next` and `close`.
    type Error;

    /// Advance to the next value.
    fn load_next(&mut self) -> Result<bool, Self::Error>;

    /// The value loaded by the last successful [`load_next`](Cursor::load_next).
    fn current(&self) -> Option<&Self::Item>;

    /// Release every resource held by this cursor.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// A heap-allocated cursor, for merging cursors of different concrete types.
pub type BoxCursor<'a, T, E> = Box<dyn Cursor<Item = T, Error = E> + 'a>;

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, Self::Error> {
        (**self).load_next()
    }

    fn current(&self) -> Option<&Self::Item> {
        (**self).current()
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, Self::Error> {
        (**self).load_next()
    }

    fn current(&self) -> Option<&Self::Item> {
        (**self).current()
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}

/// Combinators available on every sized cursor.
pub trait CursorExt: Cursor + Sized {
    /// Keep only the values accepted by `predicate`.
    fn filter_values<P>(self, predicate: P) -> FilterCursor<Self, P>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        FilterCursor::new(self, predicate)
    }

    /// Skip `start` values, then yield at most `count` values.
    fn window(self, start: usize, count: usize) -> RangeCursor<Self> {
        RangeCursor::new(self, start, count)
    }

    /// Yield only the values falling between `lower` and `upper` under
    /// `compare`. The input must be ordered by the same comparison.
    fn value_range<F>(
        self,
        lower: Bound<Self::Item>,
        upper: Bound<Self::Item>,
        compare: F,
    ) -> ValueRangeCursor<Self, F>
    where
        F: Fn(&Self::Item, &Self::Item) -> Ordering,
    {
        ValueRangeCursor::new(self, lower, upper, compare)
    }

    /// Expose this cursor as an [`Iterator`] of results.
    fn into_results(self) -> CursorIter<Self> {
        CursorIter::new(self)
    }

    /// Box this cursor behind a trait object.
    fn boxed<'a>(self) -> BoxCursor<'a, Self::Item, Self::Error>
    where
        Self: 'a,
    {
        Box::new(self)
    }
}

impl<C: Cursor> CursorExt for C {}
