//! Bridges between cursors and native iterators.
//!
//! [`IterCursor`] and [`TryIterCursor`] turn any iterator into a cursor;
//! [`CursorIter`] goes the other way and guarantees the wrapped cursor is
//! closed exactly once, whether iteration runs to the end, fails, or is
//! abandoned early.

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use tracing::warn;

use crate::cursor::Cursor;

/// A cursor over an infallible iterator.
///
/// The error type is free so that the cursor can be merged with fallible
/// cursors sharing an error kind; it defaults to [`Infallible`].
pub struct IterCursor<I: Iterator, E = Infallible> {
    iter: Option<I>,
    current: Option<I::Item>,
    _error: PhantomData<fn() -> E>,
}

impl<I: Iterator, E> IterCursor<I, E> {
    /// Create a cursor over anything iterable.
    pub fn new<S>(items: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: Some(items.into_iter()),
            current: None,
            _error: PhantomData,
        }
    }
}

impl<I: Iterator, E> Cursor for IterCursor<I, E> {
    type Item = I::Item;
    type Error = E;

    fn load_next(&mut self) -> Result<bool, E> {
        let Some(iter) = self.iter.as_mut() else {
            self.current = None;
            return Ok(false);
        };
        self.current = iter.next();
        if self.current.is_none() {
            // Iterators are not required to be fused.
            self.iter = None;
        }
        Ok(self.current.is_some())
    }

    fn current(&self) -> Option<&I::Item> {
        self.current.as_ref()
    }

    fn close(&mut self) -> Result<(), E> {
        self.iter = None;
        self.current = None;
        Ok(())
    }
}

impl<I: Iterator, E> fmt::Debug for IterCursor<I, E>
where
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterCursor")
            .field("current", &self.current)
            .field("open", &self.iter.is_some())
            .finish()
    }
}

/// A cursor over an iterator of results. The first `Err` item is surfaced
/// from `load_next`.
pub struct TryIterCursor<I, T> {
    iter: Option<I>,
    current: Option<T>,
}

impl<I, T> TryIterCursor<I, T> {
    /// Create a cursor over anything iterable yielding results.
    pub fn new<S>(items: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: Some(items.into_iter()),
            current: None,
        }
    }
}

impl<I, T, E> Cursor for TryIterCursor<I, T>
where
    I: Iterator<Item = Result<T, E>>,
{
    type Item = T;
    type Error = E;

    fn load_next(&mut self) -> Result<bool, E> {
        self.current = None;
        let Some(iter) = self.iter.as_mut() else {
            return Ok(false);
        };
        match iter.next() {
            Some(item) => {
                self.current = Some(item?);
                Ok(true)
            }
            None => {
                self.iter = None;
                Ok(false)
            }
        }
    }

    fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    fn close(&mut self) -> Result<(), E> {
        self.iter = None;
        self.current = None;
        Ok(())
    }
}

/// An [`Iterator`] over the values of a cursor.
///
/// Errors from `load_next` are yielded as `Some(Err(e))`, after which the
/// iterator is finished. The cursor is closed exactly once: on exhaustion,
/// through [`CursorIter::close`], or when the iterator is dropped.
pub struct CursorIter<C: Cursor> {
    cursor: C,
    done: bool,
    closed: bool,
}

impl<C: Cursor> CursorIter<C> {
    pub fn new(cursor: C) -> Self {
        Self {
            cursor,
            done: false,
            closed: false,
        }
    }

    /// Close the wrapped cursor now and surface any close error.
    pub fn close(mut self) -> Result<(), C::Error> {
        self.done = true;
        self.close_once()
    }

    fn close_once(&mut self) -> Result<(), C::Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.cursor.close()
    }
}

impl<C> Iterator for CursorIter<C>
where
    C: Cursor,
    C::Item: Clone,
{
    type Item = Result<C::Item, C::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.load_next() {
            Ok(true) => match self.cursor.current() {
                Some(value) => Some(Ok(value.clone())),
                None => {
                    self.done = true;
                    self.close_once().err().map(Err)
                }
            },
            Ok(false) => {
                self.done = true;
                self.close_once().err().map(Err)
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<C: Cursor> Drop for CursorIter<C> {
    fn drop(&mut self) {
        if self.close_once().is_err() {
            warn!("cursor failed to close when its iterator was dropped");
        }
    }
}
