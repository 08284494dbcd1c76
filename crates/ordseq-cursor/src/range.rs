//! Windowing cursors: a positional window and a value window.

use std::cmp::Ordering;
use std::ops::Bound;

use crate::cursor::Cursor;

/// Skips `start` values of the wrapped cursor, then yields at most `count`.
///
/// Once the window is full the wrapped cursor is not pulled again.
pub struct RangeCursor<C> {
    cursor: C,
    start: usize,
    count: usize,
    /// Number of values pulled from the wrapped cursor.
    pulled: usize,
    loaded: bool,
    finished: bool,
}

impl<C: Cursor> RangeCursor<C> {
    pub fn new(cursor: C, start: usize, count: usize) -> Self {
        Self {
            cursor,
            start,
            count,
            pulled: 0,
            loaded: false,
            finished: false,
        }
    }

    /// Position (in the wrapped cursor) of the first value in the window.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Position just past the last value in the window.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.count)
    }
}

impl<C: Cursor> Cursor for RangeCursor<C> {
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, C::Error> {
        self.loaded = false;
        if self.finished {
            return Ok(false);
        }
        while self.pulled < self.end() {
            if !self.cursor.load_next()? {
                break;
            }
            self.pulled += 1;
            if self.pulled > self.start {
                self.loaded = true;
                return Ok(true);
            }
        }
        self.finished = true;
        Ok(false)
    }

    fn current(&self) -> Option<&C::Item> {
        if self.loaded {
            self.cursor.current()
        } else {
            None
        }
    }

    fn close(&mut self) -> Result<(), C::Error> {
        self.loaded = false;
        self.finished = true;
        self.cursor.close()
    }
}

/// Yields the values of an ordered cursor that fall within a pair of bounds.
///
/// Values below the lower bound are skipped; the first value above the upper
/// bound ends the cursor without pulling further.
pub struct ValueRangeCursor<C: Cursor, F> {
    cursor: C,
    lower: Bound<C::Item>,
    upper: Bound<C::Item>,
    compare: F,
    started: bool,
    loaded: bool,
    finished: bool,
}

impl<C, F> ValueRangeCursor<C, F>
where
    C: Cursor,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    pub fn new(cursor: C, lower: Bound<C::Item>, upper: Bound<C::Item>, compare: F) -> Self {
        Self {
            cursor,
            lower,
            upper,
            compare,
            started: false,
            loaded: false,
            finished: false,
        }
    }

    fn below(&self, value: &C::Item) -> bool {
        match &self.lower {
            Bound::Included(low) => (self.compare)(value, low) == Ordering::Less,
            Bound::Excluded(low) => (self.compare)(value, low) != Ordering::Greater,
            Bound::Unbounded => false,
        }
    }

    fn above(&self, value: &C::Item) -> bool {
        match &self.upper {
            Bound::Included(high) => (self.compare)(value, high) == Ordering::Greater,
            Bound::Excluded(high) => (self.compare)(value, high) != Ordering::Less,
            Bound::Unbounded => false,
        }
    }
}

impl<C, F> Cursor for ValueRangeCursor<C, F>
where
    C: Cursor,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, C::Error> {
        self.loaded = false;
        if self.finished {
            return Ok(false);
        }
        while self.cursor.load_next()? {
            let Some(value) = self.cursor.current() else {
                break;
            };
            if !self.started {
                if self.below(value) {
                    continue;
                }
                self.started = true;
            }
            if self.above(value) {
                break;
            }
            self.loaded = true;
            return Ok(true);
        }
        self.finished = true;
        Ok(false)
    }

    fn current(&self) -> Option<&C::Item> {
        if self.loaded {
            self.cursor.current()
        } else {
            None
        }
    }

    fn close(&mut self) -> Result<(), C::Error> {
        self.loaded = false;
        self.finished = true;
        self.cursor.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorExt;
    use crate::iter::IterCursor;
    use std::convert::Infallible;

    fn letters(items: &[&'static str]) -> IterCursor<std::vec::IntoIter<&'static str>, Infallible> {
        IterCursor::new(items.to_vec())
    }

    fn drain<C: Cursor<Error = Infallible>>(mut cursor: C) -> Vec<C::Item>
    where
        C::Item: Clone,
    {
        let mut out = Vec::new();
        while cursor.load_next().unwrap() {
            out.extend(cursor.current().cloned());
        }
        cursor.close().unwrap();
        out
    }

    const ALPHABET: [&str; 5] = ["a", "b", "c", "d", "e"];

    #[test]
    fn positional_windows() {
        assert!(drain(letters(&[]).window(10, 10)).is_empty());
        assert_eq!(drain(letters(&ALPHABET).window(0, 3)), vec!["a", "b", "c"]);
        assert_eq!(drain(letters(&ALPHABET).window(1, 3)), vec!["b", "c", "d"]);
        assert!(drain(letters(&ALPHABET).window(3, 0)).is_empty());
        assert_eq!(drain(letters(&ALPHABET).window(3, 1)), vec!["d"]);
        assert_eq!(drain(letters(&ALPHABET).window(3, 5)), vec!["d", "e"]);
        assert!(drain(letters(&ALPHABET).window(5, 1)).is_empty());
    }

    #[test]
    fn positional_window_reports_bounds() {
        let cursor = letters(&ALPHABET).window(2, 2);
        assert_eq!(cursor.start(), 2);
        assert_eq!(cursor.end(), 4);
    }

    #[test]
    fn inclusive_value_range() {
        let items = ["a", "b", "c", "d", "e", "f"];
        let cursor = letters(&items).value_range(
            Bound::Included("b"),
            Bound::Included("d"),
            |a: &&str, b: &&str| a.cmp(b),
        );
        assert_eq!(drain(cursor), vec!["b", "c", "d"]);
    }

    #[test]
    fn exclusive_value_range() {
        let items = ["a", "b", "c", "d", "e", "f"];
        let cursor = letters(&items).value_range(
            Bound::Excluded("b"),
            Bound::Excluded("e"),
            |a: &&str, b: &&str| a.cmp(b),
        );
        assert_eq!(drain(cursor), vec!["c", "d"]);
    }

    #[test]
    fn value_range_over_empty_input() {
        let cursor = letters(&[]).value_range(
            Bound::Included("b"),
            Bound::Included("e"),
            |a: &&str, b: &&str| a.cmp(b),
        );
        assert!(drain(cursor).is_empty());
    }

    #[test]
    fn unbounded_value_range_passes_everything() {
        let cursor = letters(&ALPHABET).value_range(Bound::Unbounded, Bound::Unbounded, |a: &&str, b: &&str| a.cmp(b));
        assert_eq!(drain(cursor), ALPHABET.to_vec());
    }
}
