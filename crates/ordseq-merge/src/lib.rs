//! K-way ordered merge for the `ordseq` cursor family.
//!
//! [`OrderedMerge`] combines any number of cursors, each individually
//! non-decreasing under a caller-supplied ordering, into a single cursor
//! yielding the global non-decreasing order.
//!
//! # Key Types
//!
//! - [`OrderedMerge`] -- the merge cursor
//! - [`MergeOrder`] / [`ByValue`] / [`Head`] -- ordering with a tie-break over (source, value) pairs
//! - [`MergeConfig`] / [`TieBreak`] -- serializable configuration
//! - [`MergeError`] / [`CloseErrors`] -- child failures and aggregated close failures
//!
//! # Design Rules
//!
//! 1. The merge exclusively owns its sources; closing it closes all of them.
//! 2. Exhausted sources are closed immediately and never revisited.
//! 3. Ties are broken by the ordering's secondary criterion, never by chance.
//! 4. Close failures are collected from every source, never only the first.

pub mod config;
pub mod error;
pub mod merge;
pub mod order;

pub use config::{MergeConfig, TieBreak};
pub use error::{CloseErrors, MergeError, MergeResult};
pub use merge::OrderedMerge;
pub use order::{ByValue, Head, MergeOrder};
