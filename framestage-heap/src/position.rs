//! Sentinel-based heap position.
//!
//! Every resident entry records its current index in the heap's backing
//! sequence. A reserved sentinel (`usize::MAX`) marks an entry that has
//! been detached, which saves the extra word an `Option<usize>` would cost
//! in every arena slot.

use core::fmt;

/// An entry's live index in the queue's backing sequence.
///
/// Only the queue writes positions. Callers may read them through
/// [`PriorityQueue::position`](crate::PriorityQueue::position), but a
/// position is only meaningful until the next mutation of the queue.
///
/// # Example
///
/// ```
/// use framestage_heap::Position;
///
/// let pos = Position::new(3);
/// assert_eq!(pos.index(), Some(3));
///
/// assert!(Position::DETACHED.is_detached());
/// assert_eq!(Position::DETACHED.index(), None);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(usize);

impl Position {
    /// Sentinel for an entry that is no longer in the queue.
    pub const DETACHED: Self = Self(usize::MAX);

    /// Creates a position at `index`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `index` collides with the sentinel.
    #[inline]
    pub const fn new(index: usize) -> Self {
        debug_assert!(index != usize::MAX, "index collides with sentinel");
        Self(index)
    }

    /// Returns `true` if this is the detached sentinel.
    #[inline]
    pub const fn is_detached(self) -> bool {
        self.0 == usize::MAX
    }

    /// Returns the index, or `None` if detached.
    #[inline]
    pub const fn index(self) -> Option<usize> {
        if self.is_detached() {
            None
        } else {
            Some(self.0)
        }
    }

    #[inline]
    pub(crate) const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(idx) => write!(f, "Position({idx})"),
            None => f.write_str("Position(DETACHED)"),
        }
    }
}
