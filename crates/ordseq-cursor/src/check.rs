//! Opt-in verification of the ordering precondition.

use std::cmp::Ordering;

use crate::cursor::Cursor;
use crate::error::CursorError;

/// Passes values through unchanged, failing with
/// [`CursorError::OutOfOrder`] when a value compares lower than the one
/// before it.
///
/// Merges and diffs never check ordering themselves; wrap inputs of unknown
/// provenance in this cursor to turn a silent precondition violation into an
/// error.
pub struct SortedCheck<C: Cursor, F> {
    cursor: C,
    compare: F,
    previous: Option<C::Item>,
    position: u64,
}

impl<C, F> SortedCheck<C, F>
where
    C: Cursor,
    C::Item: Clone,
    C::Error: From<CursorError>,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    pub fn new(cursor: C, compare: F) -> Self {
        Self {
            cursor,
            compare,
            previous: None,
            position: 0,
        }
    }
}

impl<C, F> Cursor for SortedCheck<C, F>
where
    C: Cursor,
    C::Item: Clone,
    C::Error: From<CursorError>,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, C::Error> {
        if !self.cursor.load_next()? {
            return Ok(false);
        }
        let Some(value) = self.cursor.current() else {
            return Ok(false);
        };
        self.position += 1;
        if let Some(previous) = &self.previous {
            if (self.compare)(previous, value) == Ordering::Greater {
                return Err(CursorError::OutOfOrder {
                    position: self.position,
                }
                .into());
            }
        }
        self.previous = Some(value.clone());
        Ok(true)
    }

    fn current(&self) -> Option<&C::Item> {
        self.cursor.current()
    }

    fn close(&mut self) -> Result<(), C::Error> {
        self.previous = None;
        self.cursor.close()
    }
}
