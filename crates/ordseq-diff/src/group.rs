//! Run grouping: partition a cursor's output into maximal runs of equal
//! values while passing every value through unchanged.

use ordseq_cursor::Cursor;

/// Receives run notifications from a [`RunGrouper`].
///
/// For every run the grouper calls `begin_run` once, `on_member` for each
/// value (first and last included), then `end_run` once.
pub trait RunListener<T> {
    fn begin_run(&mut self, _first: &T) {}
    fn on_member(&mut self, _value: &T) {}
    fn end_run(&mut self, _last: &T) {}
}

impl<T, L: RunListener<T> + ?Sized> RunListener<T> for &mut L {
    fn begin_run(&mut self, first: &T) {
        (**self).begin_run(first)
    }

    fn on_member(&mut self, value: &T) {
        (**self).on_member(value)
    }

    fn end_run(&mut self, last: &T) {
        (**self).end_run(last)
    }
}

/// Decides whether a value continues the run ended by `previous`.
pub trait SameRun<T> {
    fn same_run(&self, previous: &T, current: &T) -> bool;
}

impl<T, F> SameRun<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn same_run(&self, previous: &T, current: &T) -> bool {
        self(previous, current)
    }
}

/// The default run predicate: [`PartialEq`].
///
/// For `Option` items two `None`s belong to the same run, and `None` next to
/// `Some` always starts a new one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Equal;

impl<T: PartialEq> SameRun<T> for Equal {
    fn same_run(&self, previous: &T, current: &T) -> bool {
        previous == current
    }
}

/// Wraps a cursor and reports the boundaries of its runs to a listener.
///
/// The open run is ended exactly once: when the wrapped cursor is exhausted,
/// or on `close` if that comes first.
pub struct RunGrouper<C: Cursor, L, S = Equal> {
    cursor: C,
    listener: L,
    same: S,
    /// Last value of the open run; `None` while no run is open.
    previous: Option<C::Item>,
    finished: bool,
}

impl<C, L> RunGrouper<C, L, Equal>
where
    C: Cursor,
    C::Item: Clone + PartialEq,
    L: RunListener<C::Item>,
{
    pub fn new(cursor: C, listener: L) -> Self {
        Self::with_predicate(cursor, listener, Equal)
    }
}

impl<C, L, S> RunGrouper<C, L, S>
where
    C: Cursor,
    C::Item: Clone,
    L: RunListener<C::Item>,
    S: SameRun<C::Item>,
{
    pub fn with_predicate(cursor: C, listener: L, same: S) -> Self {
        Self {
            cursor,
            listener,
            same,
            previous: None,
            finished: false,
        }
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Whether a run is currently open.
    pub fn in_run(&self) -> bool {
        self.previous.is_some()
    }

    pub fn into_parts(self) -> (C, L) {
        (self.cursor, self.listener)
    }

    fn end_open_run(&mut self) {
        if let Some(last) = self.previous.take() {
            self.listener.end_run(&last);
        }
    }
}

impl<C, L, S> Cursor for RunGrouper<C, L, S>
where
    C: Cursor,
    C::Item: Clone,
    L: RunListener<C::Item>,
    S: SameRun<C::Item>,
{
    type Item = C::Item;
    type Error = C::Error;

    fn load_next(&mut self) -> Result<bool, C::Error> {
        if self.finished {
            return Ok(false);
        }
        let value = match self.cursor.load_next()? {
            true => self.cursor.current(),
            false => None,
        };
        let Some(value) = value else {
            self.finished = true;
            self.end_open_run();
            return Ok(false);
        };
        match self.previous.take() {
            Some(previous) if self.same.same_run(&previous, value) => {}
            Some(previous) => {
                self.listener.end_run(&previous);
                self.listener.begin_run(value);
            }
            None => self.listener.begin_run(value),
        }
        self.listener.on_member(value);
        self.previous = Some(value.clone());
        Ok(true)
    }

    fn current(&self) -> Option<&C::Item> {
        if self.finished {
            None
        } else {
            self.cursor.current()
        }
    }

    fn close(&mut self) -> Result<(), C::Error> {
        self.finished = true;
        self.end_open_run();
        self.cursor.close()
    }
}

/// A finished run as recorded by [`RunLog`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run<T> {
    pub first: T,
    pub last: T,
    pub len: usize,
}

/// A listener that records every finished run.
#[derive(Clone, Debug)]
pub struct RunLog<T> {
    runs: Vec<Run<T>>,
    open: Option<Run<T>>,
}

impl<T> Default for RunLog<T> {
    fn default() -> Self {
        Self {
            runs: Vec::new(),
            open: None,
        }
    }
}

impl<T> RunLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs finished so far.
    pub fn runs(&self) -> &[Run<T>] {
        &self.runs
    }

    /// Take the runs finished since the last call.
    pub fn take_runs(&mut self) -> Vec<Run<T>> {
        std::mem::take(&mut self.runs)
    }
}

impl<T: Clone> RunListener<T> for RunLog<T> {
    fn begin_run(&mut self, first: &T) {
        self.open = Some(Run {
            first: first.clone(),
            last: first.clone(),
            len: 0,
        });
    }

    fn on_member(&mut self, value: &T) {
        if let Some(run) = self.open.as_mut() {
            run.last = value.clone();
            run.len += 1;
        }
    }

    fn end_run(&mut self, _last: &T) {
        if let Some(run) = self.open.take() {
            self.runs.push(run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordseq_cursor::IterCursor;
    use ordseq_merge::OrderedMerge;
    use proptest::prelude::*;
    use std::convert::Infallible;

    /// Records notifications as a trace like `<A|A|A>`.
    #[derive(Default)]
    struct Trace {
        out: String,
        members: Vec<char>,
    }

    impl RunListener<char> for Trace {
        fn begin_run(&mut self, _first: &char) {
            self.out.push('<');
        }

        fn on_member(&mut self, value: &char) {
            self.out.push(*value);
            self.members.push(*value);
        }

        fn end_run(&mut self, _last: &char) {
            self.out.push('>');
        }
    }

    fn chars(s: &str) -> IterCursor<std::vec::IntoIter<char>, Infallible> {
        IterCursor::new(s.chars().collect::<Vec<_>>())
    }

    fn drain<C: Cursor<Error = Infallible>>(cursor: &mut C) -> Vec<C::Item>
    where
        C::Item: Clone,
    {
        let mut out = Vec::new();
        while cursor.load_next().unwrap() {
            out.extend(cursor.current().cloned());
        }
        out
    }

    /// Merges the inputs and reports each run as `[value:len]`.
    fn grouped_merge(inputs: &[&str]) -> String {
        let merge = OrderedMerge::natural(inputs.iter().map(|s| chars(s)));
        let mut grouper = RunGrouper::new(merge, RunLog::new());
        while grouper.load_next().unwrap() {}
        grouper.close().unwrap();
        grouper
            .listener()
            .runs()
            .iter()
            .map(|run| format!("[{}:{}]", run.first, run.len))
            .collect()
    }

    #[test]
    fn passes_values_through() {
        let mut grouper = RunGrouper::new(chars("aabccc"), Trace::default());
        assert_eq!(drain(&mut grouper), vec!['a', 'a', 'b', 'c', 'c', 'c']);
        assert_eq!(grouper.listener().out, "<aa><b><ccc>");
    }

    #[test]
    fn empty_input_has_no_runs() {
        let mut grouper = RunGrouper::new(chars(""), Trace::default());
        assert!(drain(&mut grouper).is_empty());
        grouper.close().unwrap();
        assert_eq!(grouper.listener().out, "");
    }

    #[test]
    fn exhaustion_ends_run_once() {
        let mut grouper = RunGrouper::new(chars("aa"), Trace::default());
        drain(&mut grouper);
        assert_eq!(grouper.listener().out, "<aa>");
        assert!(!grouper.load_next().unwrap());
        grouper.close().unwrap();
        assert_eq!(grouper.listener().out, "<aa>");
    }

    #[test]
    fn close_ends_open_run() {
        let mut grouper = RunGrouper::new(chars("aab"), Trace::default());
        assert!(grouper.load_next().unwrap());
        assert!(grouper.in_run());
        grouper.close().unwrap();
        grouper.close().unwrap();
        assert_eq!(grouper.listener().out, "<a>");
        assert!(!grouper.load_next().unwrap());
    }

    #[test]
    fn custom_predicate() {
        let letters = IterCursor::<_, Infallible>::new(vec!['a', 'A', 'b', 'B', 'b']);
        let mut grouper = RunGrouper::with_predicate(letters, RunLog::new(), |a: &char, b: &char| {
            a.eq_ignore_ascii_case(b)
        });
        drain(&mut grouper);
        let runs = grouper.listener().runs();
        assert_eq!(
            runs,
            &[
                Run { first: 'a', last: 'A', len: 2 },
                Run { first: 'b', last: 'b', len: 3 },
            ]
        );
    }

    #[test]
    fn absent_values_form_their_own_runs() {
        let items = vec![None, None, Some(1), Some(1), None];
        let mut grouper = RunGrouper::new(IterCursor::<_, Infallible>::new(items), RunLog::new());
        drain(&mut grouper);
        let lens: Vec<_> = grouper.listener().runs().iter().map(|r| (r.first, r.len)).collect();
        assert_eq!(lens, vec![(None, 2), (Some(1), 2), (None, 1)]);
    }

    #[test]
    fn groups_over_a_merge() {
        assert_eq!(grouped_merge(&["AAB", "AAAC"]), "[A:5][B:1][C:1]");
        assert_eq!(grouped_merge(&["AC", "ABC", "B", "G"]), "[A:2][B:2][C:2][G:1]");
        assert_eq!(grouped_merge(&["AAB", "ABC"]), "[A:3][B:2][C:1]");
    }

    #[test]
    fn take_runs_drains_the_log() {
        let mut grouper = RunGrouper::new(chars("aab"), RunLog::new());
        assert!(grouper.load_next().unwrap());
        assert!(grouper.load_next().unwrap());
        assert!(grouper.listener_mut().take_runs().is_empty());
        assert!(grouper.load_next().unwrap());
        assert_eq!(grouper.listener_mut().take_runs().len(), 1);
        assert!(!grouper.load_next().unwrap());
        let (_, mut log) = grouper.into_parts();
        assert_eq!(log.take_runs(), vec![Run { first: 'b', last: 'b', len: 1 }]);
    }

    proptest! {
        #[test]
        fn members_cover_input_and_runs_are_maximal(input in "[abc]{0,40}") {
            let mut grouper = RunGrouper::new(chars(&input), Trace::default());
            let passed = drain(&mut grouper);
            grouper.close().unwrap();
            let trace = grouper.listener();
            prop_assert_eq!(&passed, &input.chars().collect::<Vec<_>>());
            prop_assert_eq!(&trace.members, &passed);

            let mut expected = String::new();
            let mut previous = None;
            for c in input.chars() {
                if previous != Some(c) {
                    if previous.is_some() {
                        expected.push('>');
                    }
                    expected.push('<');
                }
                expected.push(c);
                previous = Some(c);
            }
            if previous.is_some() {
                expected.push('>');
            }
            prop_assert_eq!(&trace.out, &expected);
        }
    }
}
