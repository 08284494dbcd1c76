//! Error types for the merge crate.

/// Errors surfaced by [`OrderedMerge`](crate::OrderedMerge).
#[derive(Debug, thiserror::Error)]
pub enum MergeError<E> {
    /// A source cursor failed; the error is passed through unchanged.
    #[error("source cursor failed: {0}")]
    Source(E),

    /// More than one source failed to close.
    #[error("{0}")]
    Close(CloseErrors<E>),
}

impl<E> MergeError<E> {
    /// The underlying source error, if this is not an aggregate.
    pub fn into_source(self) -> Option<E> {
        match self {
            MergeError::Source(e) => Some(e),
            MergeError::Close(_) => None,
        }
    }

    /// Every underlying source error.
    pub fn into_errors(self) -> Vec<E> {
        match self {
            MergeError::Source(e) => vec![e],
            MergeError::Close(all) => all.errors.into_iter().map(|(_, e)| e).collect(),
        }
    }
}

/// Close failures collected from several sources of one merge.
#[derive(Debug, thiserror::Error)]
#[error("{} source cursors failed to close", .errors.len())]
pub struct CloseErrors<E> {
    /// `(source index, error)` for every source that failed to close.
    pub errors: Vec<(usize, E)>,
}

impl<E> CloseErrors<E> {
    /// Fold collected close failures into a result: none is success, one is
    /// passed through as [`MergeError::Source`], several are aggregated.
    pub(crate) fn into_result(mut errors: Vec<(usize, E)>) -> Result<(), MergeError<E>> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(MergeError::Source(errors.remove(0).1)),
            _ => Err(MergeError::Close(CloseErrors { errors })),
        }
    }

    /// Indices of the sources that failed to close.
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        self.errors.iter().map(|(source, _)| *source)
    }
}

/// Result alias for merge operations.
pub type MergeResult<T, E> = Result<T, MergeError<E>>;
