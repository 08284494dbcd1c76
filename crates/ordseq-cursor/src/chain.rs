use crate::cursor::Cursor;

/// Iterates over a sequence of cursors, one after another.
///
/// The next cursor is requested from the provider only when the previous one
/// is exhausted and closed. The provider receives the finished cursor (or
/// `None` on the first request) and returns `Ok(None)` when no cursors remain.
pub struct ChainCursor<C, P> {
    active: Option<C>,
    provider: P,
    done: bool,
}

impl<C, P> ChainCursor<C, P>
where
    C: Cursor,
    P: FnMut(Option<&C>) -> Result<Option<C>, C::Error>,
{
    pub fn new(provider: P) -> Self {
        Self {
            active: None,
            provider,
            done: false,
        }
    }
}

/// Chain a fixed list of cursors.
pub fn chain_cursors<C, I>(
    cursors: I,
) -> ChainCursor<C, impl FnMut(Option<&C>) -> Result<Option<C>, C::Error>>
where
    C: Cursor,
    I: IntoIterator<Item = C>,
{
    let mut remaining = cursors.into_iter();
    ChainCursor::new(move |_: Option<&C>| Ok(remaining.next()))
}

impl<C, P> Cursor for ChainCursor<C, P>
where
    C: Cursor,
    P: FnMut(Option<&C>) -> Result<Option<C>, C::Error>,
{
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, C::Error> {
        if self.done {
            return Ok(false);
        }
        loop {
            if let Some(cursor) = self.active.as_mut() {
                if cursor.load_next()? {
                    return Ok(true);
                }
                cursor.close()?;
            }
            let finished = self.active.take();
            match (self.provider)(finished.as_ref())? {
                Some(next) => self.active = Some(next),
                None => {
                    self.done = true;
                    return Ok(false);
                }
            }
        }
    }

    fn current(&self) -> Option<&C::Item> {
        self.active.as_ref().and_then(|cursor| cursor.current())
    }

    fn close(&mut self) -> Result<(), C::Error> {
        self.done = true;
        match self.active.take() {
            Some(mut cursor) => cursor.close(),
            None => Ok(()),
        }
    }
}
