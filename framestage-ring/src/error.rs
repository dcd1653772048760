//! Error types for ring operations.

/// Errors returned by [`RingBuffer`](crate::RingBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// A non-empty read found nothing readable.
    #[error("ring buffer exhausted")]
    Exhausted,
    /// A non-empty write found no free slot. Nothing was written.
    #[error("ring buffer full")]
    Full,
    /// Only a prefix of the input fit. That prefix was written.
    #[error("short write: {written} of {requested} records stored")]
    ShortWrite {
        /// Records actually stored.
        written: usize,
        /// Records offered.
        requested: usize,
    },
    /// Contents offered for copy-adoption exceed the backing store.
    #[error("cannot adopt {len} records into capacity {capacity}")]
    AdoptTooLarge {
        /// Records offered.
        len: usize,
        /// Current capacity.
        capacity: usize,
    },
}

impl RingError {
    /// Returns how many records the failed call still stored.
    ///
    /// Non-zero only for [`RingError::ShortWrite`].
    pub const fn written(&self) -> usize {
        match self {
            Self::ShortWrite { written, .. } => *written,
            _ => 0,
        }
    }
}
