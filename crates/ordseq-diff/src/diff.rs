//! Streaming multiset diff between two ordered cursors.
//!
//! Both inputs are merged with [`LeastRecentlyEmitted`], so that within a run
//! of equal values the merge alternates between the sources for as long as
//! both still hold occurrences. Consecutive emissions of a run are paired:
//!
//! - a pair from different sources is an update,
//! - a pair from the first source is two removals,
//! - a pair from the second source is two additions.
//!
//! An unpaired emission left when the run ends is a removal if it came from
//! the first source and an addition if it came from the second. For a value
//! occurring `a` times in the first input and `b` times in the second this
//! yields `min(a, b)` updates and `|a - b|` removals or additions.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

use ordseq_cursor::Cursor;
use ordseq_merge::{MergeError, MergeResult, OrderedMerge};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::order::LeastRecentlyEmitted;

/// Which input of a diff produced a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    fn of_source(index: usize) -> Self {
        if index == 0 {
            Side::First
        } else {
            Side::Second
        }
    }
}

/// One classified occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffEvent<T> {
    /// Present only in the second input.
    Added { value: T },
    /// Present only in the first input.
    Removed { value: T },
    /// Present in both; the values compare equal but may differ otherwise.
    Updated { first: T, second: T },
}

impl<T> DiffEvent<T> {
    /// A one-character marker: `+`, `-` or `~`.
    pub fn symbol(&self) -> char {
        match self {
            DiffEvent::Added { .. } => '+',
            DiffEvent::Removed { .. } => '-',
            DiffEvent::Updated { .. } => '~',
        }
    }

    /// The value carried by this event; the second input's for updates.
    pub fn value(&self) -> &T {
        match self {
            DiffEvent::Added { value } | DiffEvent::Removed { value } => value,
            DiffEvent::Updated { second, .. } => second,
        }
    }

    fn leftover(side: Side, value: T) -> Self {
        match side {
            Side::First => DiffEvent::Removed { value },
            Side::Second => DiffEvent::Added { value },
        }
    }
}

/// Counts of each event kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<T>(&mut self, event: &DiffEvent<T>) {
        match event {
            DiffEvent::Added { .. } => self.added += 1,
            DiffEvent::Removed { .. } => self.removed += 1,
            DiffEvent::Updated { .. } => self.updated += 1,
        }
    }

    pub fn from_events<'a, T: 'a>(events: impl IntoIterator<Item = &'a DiffEvent<T>>) -> Self {
        let mut summary = Self::new();
        for event in events {
            summary.record(event);
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.added + self.removed + self.updated
    }

    /// `true` when nothing was added or removed.
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} updated",
            self.added, self.removed, self.updated
        )
    }
}

/// A cursor over the merged values of two ordered inputs that classifies
/// every value as added, removed or updated.
///
/// The cursor yields every value of both inputs in order. After each
/// [`load_next`](Cursor::load_next), [`events`](StreamDiff::events) holds the
/// events that advance completed: none, one, or two. The call that reports
/// exhaustion may still complete the final run's leftover.
pub struct StreamDiff<C: Cursor, F> {
    merge: OrderedMerge<C, LeastRecentlyEmitted<F>>,
    /// Value of the previous emission; `None` before the first.
    previous: Option<C::Item>,
    /// Emission of the open run still waiting for its pair.
    unpaired: Option<(Side, C::Item)>,
    run_len: usize,
    side: Option<Side>,
    events: Vec<DiffEvent<C::Item>>,
    finished: bool,
}

impl<C, F> StreamDiff<C, F>
where
    C: Cursor,
    C::Item: Clone,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    /// Diff `first` against `second`, both ordered by `compare`.
    pub fn new(first: C, second: C, compare: F) -> Self {
        Self {
            merge: OrderedMerge::new([first, second], LeastRecentlyEmitted::new(compare))
                .with_label("diff"),
            previous: None,
            unpaired: None,
            run_len: 0,
            side: None,
            events: Vec::new(),
            finished: false,
        }
    }

    /// Name the underlying merge in tracing events.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.merge = self.merge.with_label(label);
        self
    }

    /// Events completed by the last advance.
    pub fn events(&self) -> &[DiffEvent<C::Item>] {
        &self.events
    }

    /// Move the events completed by the last advance out of the cursor.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, DiffEvent<C::Item>> {
        self.events.drain(..)
    }

    /// Which input produced the current value.
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    /// Whether the current value came from the first input.
    pub fn is_from_first(&self) -> bool {
        self.side == Some(Side::First)
    }

    /// Pull events one at a time instead of values.
    pub fn into_events(self) -> DiffEvents<C, F> {
        DiffEvents {
            diff: self,
            queue: VecDeque::new(),
            done: false,
            closed: false,
        }
    }

    fn end_run(&mut self) {
        if self.run_len > 0 {
            trace!(len = self.run_len, leftover = self.unpaired.is_some(), "diff run ended");
        }
        if let Some((side, value)) = self.unpaired.take() {
            self.events.push(DiffEvent::leftover(side, value));
        }
        self.run_len = 0;
    }

    fn pair(&mut self, earlier: (Side, C::Item), later: (Side, C::Item)) {
        match (earlier, later) {
            ((Side::First, first), (Side::Second, second))
            | ((Side::Second, second), (Side::First, first)) => {
                self.events.push(DiffEvent::Updated { first, second });
            }
            ((Side::First, a), (Side::First, b)) => {
                self.events.push(DiffEvent::Removed { value: a });
                self.events.push(DiffEvent::Removed { value: b });
            }
            ((Side::Second, a), (Side::Second, b)) => {
                self.events.push(DiffEvent::Added { value: a });
                self.events.push(DiffEvent::Added { value: b });
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.end_run();
        self.previous = None;
    }
}

impl<C, F> Cursor for StreamDiff<C, F>
where
    C: Cursor,
    C::Item: Clone,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    type Item = C::Item;
    type Error = MergeError<C::Error>;

    fn load_next(&mut self) -> Result<bool, Self::Error> {
        self.events.clear();
        self.side = None;
        if self.finished {
            return Ok(false);
        }
        if !self.merge.load_next()? {
            self.finish();
            return Ok(false);
        }
        let (Some(value), Some(source)) = (self.merge.current().cloned(), self.merge.current_source())
        else {
            self.finish();
            return Ok(false);
        };
        let side = Side::of_source(source);

        let boundary = match &self.previous {
            Some(previous) => {
                self.merge.order().compare_values(previous, &value) != Ordering::Equal
            }
            None => false,
        };
        if boundary {
            self.end_run();
        }
        match self.unpaired.take() {
            Some(earlier) => self.pair(earlier, (side, value.clone())),
            None => self.unpaired = Some((side, value.clone())),
        }
        self.run_len += 1;
        self.previous = Some(value);
        self.side = Some(side);
        Ok(true)
    }

    fn current(&self) -> Option<&C::Item> {
        if self.side.is_some() {
            self.merge.current()
        } else {
            None
        }
    }

    /// Closes both inputs. An open run is discarded without events.
    fn close(&mut self) -> Result<(), Self::Error> {
        self.finished = true;
        self.side = None;
        self.previous = None;
        self.unpaired = None;
        self.merge.close()
    }
}

/// Iterator over the events of a [`StreamDiff`].
///
/// Closes the diff exactly once: on exhaustion, after an error, or when
/// dropped early.
pub struct DiffEvents<C, F>
where
    C: Cursor,
    C::Item: Clone,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    diff: StreamDiff<C, F>,
    queue: VecDeque<DiffEvent<C::Item>>,
    done: bool,
    closed: bool,
}

impl<C, F> DiffEvents<C, F>
where
    C: Cursor,
    C::Item: Clone,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    fn close_once(&mut self) -> MergeResult<(), C::Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.diff.close()
    }
}

impl<C, F> Iterator for DiffEvents<C, F>
where
    C: Cursor,
    C::Item: Clone,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    type Item = MergeResult<DiffEvent<C::Item>, C::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            match self.diff.load_next() {
                Ok(more) => {
                    self.queue.extend(self.diff.drain_events());
                    if !more {
                        self.done = true;
                        if let Err(e) = self.close_once() {
                            return Some(Err(e));
                        }
                    }
                }
                Err(e) => {
                    self.done = true;
                    if self.close_once().is_err() {
                        warn!("diff inputs failed to close after an error");
                    }
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<C, F> Drop for DiffEvents<C, F>
where
    C: Cursor,
    C::Item: Clone,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    fn drop(&mut self) {
        if self.close_once().is_err() {
            warn!("diff inputs failed to close on drop");
        }
    }
}

/// Diff two ordered cursors and collect every event.
pub fn diff_cursors<C, F>(first: C, second: C, compare: F) -> MergeResult<Vec<DiffEvent<C::Item>>, C::Error>
where
    C: Cursor,
    C::Item: Clone,
    F: Fn(&C::Item, &C::Item) -> Ordering,
{
    StreamDiff::new(first, second, compare).into_events().collect()
}
