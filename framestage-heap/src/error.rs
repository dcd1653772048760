//! Error types for queue operations.

/// A record could not produce an order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("record has no usable timestamp: {reason}")]
pub struct TimestampError {
    reason: &'static str,
}

impl TimestampError {
    /// Creates an error with a static reason.
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Returns why extraction failed.
    pub const fn reason(&self) -> &'static str {
        self.reason
    }
}

/// Errors returned by [`PriorityQueue`](crate::PriorityQueue).
///
/// Each variant is a contract violation by the caller or by the record
/// producer. None of them is transient, so none is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// Extraction attempted on an empty queue.
    #[error("priority queue is empty")]
    Empty,
    /// The handle refers to an entry that is no longer resident.
    #[error("handle does not refer to a resident entry")]
    StaleHandle,
    /// The record's order key could not be extracted.
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}
