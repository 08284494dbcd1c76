//! The k-way merge cursor.
//!
//! Sources are kept in an *active list* sorted by the merge order. Each
//! advance pops the head of the list, exposes its value, advances that same
//! source, and reinserts it by binary search. Sources are activated lazily on
//! the first `load_next`.
//!
//! # Invariants
//!
//! - Every source in the active list holds a loaded value (its head).
//! - A source leaves the active list only to be emitted or closed.
//! - A closed source is never advanced again.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

use ordseq_cursor::Cursor;
use tracing::{debug, trace, warn};

use crate::config::MergeConfig;
use crate::error::{CloseErrors, MergeError};
use crate::order::{ByValue, Head, MergeOrder};

/// A source in the active list together with its cached head value.
struct Source<C: Cursor> {
    index: usize,
    head: C::Item,
    cursor: C,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    NotStarted,
    Running,
    Finished,
    Closed,
}

/// Merges individually ordered cursors into one ordered cursor.
///
/// Every source must yield values in non-decreasing order under the merge
/// order; the merge does not check this. Values that compare equal surface
/// in the order chosen by the ordering's tie-break.
pub struct OrderedMerge<C: Cursor, O> {
    /// Sources not yet activated, or left behind by a failed advance.
    idle: Vec<(usize, C)>,
    active: VecDeque<Source<C>>,
    order: O,
    current: Option<C::Item>,
    current_source: Option<usize>,
    status: Status,
    label: String,
}

impl<C, O> OrderedMerge<C, O>
where
    C: Cursor,
    C::Item: Clone,
    O: MergeOrder<C::Item>,
{
    /// Merge `sources` under `order`. Source indices follow iteration order.
    pub fn new<I>(sources: I, order: O) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        let idle: Vec<(usize, C)> = sources.into_iter().enumerate().collect();
        Self {
            active: VecDeque::with_capacity(idle.len()),
            idle,
            order,
            current: None,
            current_source: None,
            status: Status::NotStarted,
            label: MergeConfig::default().label,
        }
    }

    /// Name this merge in tracing events.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Index of the source that produced the current value.
    pub fn current_source(&self) -> Option<usize> {
        self.current_source
    }

    /// Number of sources not yet exhausted or closed.
    pub fn active_sources(&self) -> usize {
        self.active.len() + self.idle.len()
    }

    /// The ordering driving this merge.
    pub fn order(&self) -> &O {
        &self.order
    }

    fn activate(&mut self) -> Result<(), MergeError<C::Error>> {
        self.status = Status::Running;
        let total = self.idle.len();
        let mut pending = std::mem::take(&mut self.idle).into_iter();
        while let Some((index, cursor)) = pending.next() {
            if let Err(e) = self.advance(index, cursor) {
                self.idle.extend(pending);
                return Err(e);
            }
        }
        debug!(
            label = %self.label,
            sources = total,
            live = self.active.len(),
            "merge activated"
        );
        Ok(())
    }

    /// Pull the next value of a source and reinsert it, or retire the source
    /// when it is exhausted.
    fn advance(&mut self, index: usize, mut cursor: C) -> Result<(), MergeError<C::Error>> {
        match cursor.load_next() {
            Ok(true) => match cursor.current().cloned() {
                Some(head) => {
                    self.insert(Source {
                        index,
                        head,
                        cursor,
                    });
                    Ok(())
                }
                None => {
                    warn!(label = %self.label, source = index, "source loaded no value; retiring it");
                    self.retire(index, cursor)
                }
            },
            Ok(false) => self.retire(index, cursor),
            Err(e) => {
                self.idle.push((index, cursor));
                Err(MergeError::Source(e))
            }
        }
    }

    fn retire(&mut self, index: usize, mut cursor: C) -> Result<(), MergeError<C::Error>> {
        trace!(label = %self.label, source = index, "merge source exhausted");
        cursor.close().map_err(MergeError::Source)
    }

    /// Binary-search insertion into the active list, after any entries that
    /// do not order after it.
    fn insert(&mut self, source: Source<C>) {
        let order = &self.order;
        let new_head = Head {
            source: source.index,
            value: &source.head,
        };
        let at = self.active.partition_point(|probe| {
            let probe_head = Head {
                source: probe.index,
                value: &probe.head,
            };
            order.compare(probe_head, new_head) != Ordering::Greater
        });
        self.active.insert(at, source);
    }
}

impl<C, F> OrderedMerge<C, ByValue<F>>
where
    C: Cursor,
    C::Item: Clone,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    /// Merge `sources` by a value comparison; ties go to the earlier source.
    pub fn by<I>(sources: I, compare: F) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        Self::new(sources, ByValue::new(compare))
    }

    /// Merge `sources` by a value comparison with an explicit configuration.
    pub fn with_config<I>(sources: I, compare: F, config: &MergeConfig) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        Self::new(sources, ByValue::new(compare).with_tie_break(config.tie_break))
            .with_label(config.label.clone())
    }
}

impl<C> OrderedMerge<C, ByValue<fn(&C::Item, &C::Item) -> Ordering>>
where
    C: Cursor,
    C::Item: Clone + Ord,
{
    /// Merge `sources` by the items' own [`Ord`]; ties go to the earlier source.
    pub fn natural<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = C>,
    {
        Self::new(sources, ByValue::natural())
    }
}

impl<C, O> Cursor for OrderedMerge<C, O>
where
    C: Cursor,
    C::Item: Clone,
    O: MergeOrder<C::Item>,
{
    type Item = C::Item;
    type Error = MergeError<C::Error>;

    fn load_next(&mut self) -> Result<bool, Self::Error> {
        self.current = None;
        self.current_source = None;
        match self.status {
            Status::NotStarted => self.activate()?,
            Status::Running => {}
            Status::Finished | Status::Closed => return Ok(false),
        }
        let Some(Source {
            index,
            head,
            cursor,
        }) = self.active.pop_front()
        else {
            self.status = Status::Finished;
            debug!(label = %self.label, "merge exhausted");
            return Ok(false);
        };
        self.order.on_emit(index);
        self.current = Some(head);
        self.current_source = Some(index);
        self.advance(index, cursor)?;
        Ok(true)
    }

    fn current(&self) -> Option<&C::Item> {
        self.current.as_ref()
    }

    /// Closes every source still held, collecting all failures. One failure
    /// is returned as [`MergeError::Source`]; several as [`MergeError::Close`].
    fn close(&mut self) -> Result<(), Self::Error> {
        self.status = Status::Closed;
        self.current = None;
        self.current_source = None;
        let mut errors = Vec::new();
        let held = self
            .idle
            .drain(..)
            .chain(self.active.drain(..).map(|s| (s.index, s.cursor)));
        for (index, mut cursor) in held {
            if let Err(e) = cursor.close() {
                warn!(label = %self.label, source = index, "merge source failed to close");
                errors.push((index, e));
            }
        }
        errors.sort_by_key(|(index, _)| *index);
        CloseErrors::into_result(errors)
    }
}

impl<C, O> fmt::Debug for OrderedMerge<C, O>
where
    C: Cursor,
    C::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedMerge")
            .field("label", &self.label)
            .field("status", &self.status)
            .field("current", &self.current)
            .field("current_source", &self.current_source)
            .field("active", &self.active.len())
            .field("idle", &self.idle.len())
            .finish()
    }
}
