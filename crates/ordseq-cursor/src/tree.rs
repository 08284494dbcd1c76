//! Depth-first traversal over trees of cursors.

use tracing::warn;

use crate::cursor::Cursor;

/// Walks a tree in depth-first pre-order.
///
/// Every value pulled is passed to the `children` function, which returns a
/// cursor over that node's children or `None` for a leaf. Child cursors are
/// stacked and closed as soon as they are exhausted.
pub struct TreeCursor<C: Cursor, F> {
    stack: Vec<C>,
    children: F,
    current: Option<C::Item>,
}

impl<C, F> TreeCursor<C, F>
where
    C: Cursor,
    C::Item: Clone,
    F: FnMut(&C::Item) -> Result<Option<C>, C::Error>,
{
    /// Start a traversal from the nodes of `roots`.
    pub fn new(roots: C, children: F) -> Self {
        Self {
            stack: vec![roots],
            children,
            current: None,
        }
    }

    /// Number of cursors currently open, the root cursor included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<C, F> Cursor for TreeCursor<C, F>
where
    C: Cursor,
    C::Item: Clone,
    F: FnMut(&C::Item) -> Result<Option<C>, C::Error>,
{
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, C::Error> {
        self.current = None;
        while let Some(top) = self.stack.last_mut() {
            if top.load_next()? {
                let Some(node) = top.current().cloned() else {
                    continue;
                };
                if let Some(children) = (self.children)(&node)? {
                    self.stack.push(children);
                }
                self.current = Some(node);
                return Ok(true);
            }
            if let Some(mut finished) = self.stack.pop() {
                finished.close()?;
            }
        }
        Ok(false)
    }

    fn current(&self) -> Option<&C::Item> {
        self.current.as_ref()
    }

    /// Closes every stacked cursor, innermost first. All cursors are closed
    /// even when some fail; the first failure is returned.
    fn close(&mut self) -> Result<(), C::Error> {
        self.current = None;
        let mut first_error = None;
        while let Some(mut cursor) = self.stack.pop() {
            if let Err(e) = cursor.close() {
                if first_error.is_some() {
                    warn!("additional tree cursor failed to close");
                } else {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
