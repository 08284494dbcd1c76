//! Run grouping and streaming diff over ordered cursors.
//!
//! # Key Types
//!
//! - [`RunGrouper`] / [`RunListener`] / [`RunLog`] -- run boundaries over any cursor
//! - [`StreamDiff`] / [`DiffEvent`] -- added/removed/updated classification of two ordered inputs
//! - [`DiffEvents`] / [`DiffSummary`] -- event iteration and counting
//! - [`LeastRecentlyEmitted`] -- the merge ordering that alternates equal values between sources
//!
//! Both inputs of a diff must be non-decreasing under the comparison given
//! to it. The result is a multiset diff: a value occurring `a` times in the
//! first input and `b` times in the second produces `min(a, b)` updates and
//! `|a - b|` removals or additions, in one pass and with no buffering of runs.

pub mod diff;
pub mod group;
pub mod order;

pub use diff::{diff_cursors, DiffEvent, DiffEvents, DiffSummary, Side, StreamDiff};
pub use group::{Equal, Run, RunGrouper, RunListener, RunLog, SameRun};
pub use order::LeastRecentlyEmitted;
