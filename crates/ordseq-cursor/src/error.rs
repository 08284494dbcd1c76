//! Error types for the built-in cursors that can fail on their own.

/// Errors raised by [`LineCursor`](crate::LineCursor) and
/// [`SortedCheck`](crate::SortedCheck).
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    /// Reading from the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value compared lower than its predecessor in a stream that must be
    /// non-decreasing.
    #[error("value at position {position} is out of order")]
    OutOfOrder { position: u64 },
}

/// Result alias for cursor operations using [`CursorError`].
pub type CursorResult<T> = Result<T, CursorError>;
