use crate::cursor::Cursor;

/// Yields only the values of the wrapped cursor accepted by a predicate.
pub struct FilterCursor<C, P> {
    cursor: C,
    predicate: P,
    loaded: bool,
}

impl<C, P> FilterCursor<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    pub fn new(cursor: C, predicate: P) -> Self {
        Self {
            cursor,
            predicate,
            loaded: false,
        }
    }

    /// Unwrap the filtered cursor.
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C, P> Cursor for FilterCursor<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, C::Error> {
        self.loaded = false;
        while self.cursor.load_next()? {
            if let Some(value) = self.cursor.current() {
                if (self.predicate)(value) {
                    self.loaded = true;
                    break;
                }
            }
        }
        Ok(self.loaded)
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
        self.cursor.close()
    }
}
