//! Pull-based sequence cursors.
//!
//! A [`Cursor`] is a single-pass, stateful producer of values. Callers pull
//! with [`Cursor::load_next`], read the loaded value with [`Cursor::current`],
//! and release resources with [`Cursor::close`]. Everything else in the
//! `ordseq` workspace (ordered merging, run grouping, streaming diff) is
//! built by composing cursors.
//!
//! # Key Types
//!
//! - [`Cursor`] / [`CursorExt`] -- the contract and its combinators
//! - [`IterCursor`] / [`TryIterCursor`] -- cursors over native iterators
//! - [`CursorIter`] -- a cursor exposed as a native iterator
//! - [`FilterCursor`], [`RangeCursor`], [`ValueRangeCursor`], [`ChainCursor`],
//!   [`TreeCursor`] -- single-pass wrappers
//! - [`LineCursor`] / [`SortedCheck`] -- line streams and order verification
//!
//! # Design Rules
//!
//! 1. `load_next` returning `Ok(false)` is sticky: exhausted cursors stay exhausted.
//! 2. `close` is idempotent and safe before the first `load_next`.
//! 3. After any error from `load_next`, `close` can still be called to release resources.
//! 4. Composite cursors own their children and close them on `close`.

pub mod chain;
pub mod check;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod iter;
pub mod line;
pub mod range;
pub mod tree;

pub use chain::{chain_cursors, ChainCursor};
pub use check::SortedCheck;
pub use cursor::{BoxCursor, Cursor, CursorExt};
pub use error::{CursorError, CursorResult};
pub use filter::FilterCursor;
pub use iter::{CursorIter, IterCursor, TryIterCursor};
pub use line::LineCursor;
pub use range::{RangeCursor, ValueRangeCursor};
pub use tree::TreeCursor;
