//! Fixed-capacity circular buffer of record references.
//!
//! The readable region is the circular range `[begin, begin + readable)`
//! modulo capacity. Everything outside it is stale and never handed out.
//!
//! # Invariants
//! - `readable <= capacity`
//! - `begin < capacity` whenever `capacity > 0`
//!
//! # Layout
//! The region is contiguous in logical order but may wrap past the end of
//! the backing slice; [`RingBuffer::as_slices`] exposes it as at most two
//! slices that, concatenated, give the readable slots in order.

use core::fmt;
use core::mem;

use crate::RingError;

/// A fixed-capacity ring of record references.
///
/// Slots hold cheap handles to records (`Arc<Frame>`, `&Frame`,
/// `Option<Box<Frame>>`...). Reads clone handles out; records themselves
/// are never copied.
///
/// # Example
///
/// ```
/// use framestage_ring::{RingBuffer, RingError};
///
/// let mut ring: RingBuffer<u64> = RingBuffer::with_capacity(4);
///
/// assert_eq!(ring.write(&[1, 2, 3]), Ok(3));
///
/// // Peek without consuming, then commit
/// let mut out = [0; 2];
/// assert_eq!(ring.read_without_advance(&mut out), Ok(2));
/// assert_eq!(out, [1, 2]);
/// ring.advance(2);
///
/// // Wraps past the end of the backing slice
/// assert_eq!(ring.write(&[4, 5, 6, 7]), Err(RingError::ShortWrite { written: 3, requested: 4 }));
/// let (first, second) = ring.as_slices();
/// assert_eq!([first, second].concat(), vec![3, 4, 5, 6]);
/// ```
pub struct RingBuffer<T> {
    slots: Box<[T]>,
    /// Index of the oldest unread slot.
    begin: usize,
    /// Number of valid slots starting at `begin`.
    readable: usize,
}

/// The array a [`RingBuffer::adopt`] call did not keep.
#[derive(Debug)]
pub enum Adopted<T> {
    /// The offered array became the backing store; this is the old one.
    Transferred(Box<[T]>),
    /// The offered array was copied in and is handed back for reuse.
    Copied(Vec<T>),
}

impl<T: Default> RingBuffer<T> {
    /// Creates an empty ring with `capacity` slots.
    ///
    /// A zero capacity is allowed: every write reports
    /// [`RingError::Full`] and every read reports [`RingError::Exhausted`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::default()).collect(),
            begin: 0,
            readable: 0,
        }
    }
}

impl<T> RingBuffer<T> {
    /// Creates a ring whose backing store is `backing`, all of it readable.
    pub fn from_backing(backing: Vec<T>) -> Self {
        let readable = backing.len();
        Self {
            slots: backing.into_boxed_slice(),
            begin: 0,
            readable,
        }
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of readable slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.readable
    }

    /// Returns the number of slots a write can fill.
    #[inline]
    pub fn free(&self) -> usize {
        self.slots.len() - self.readable
    }

    /// Returns `true` if nothing is readable.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.readable == 0
    }

    /// Returns `true` if a write would store nothing.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.readable == self.slots.len()
    }

    /// Returns the backing index of the oldest readable slot.
    #[inline]
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Returns the readable region as two slices, without copying.
    ///
    /// The second slice is empty unless the region wraps past the end of
    /// the backing store. Either may be empty.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let extent = self.begin + self.readable;
        let cap = self.slots.len();
        if extent <= cap {
            (&self.slots[self.begin..extent], &[])
        } else {
            (&self.slots[self.begin..], &self.slots[..extent - cap])
        }
    }

    /// Iterates the readable slots in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (first, second) = self.as_slices();
        first.iter().chain(second)
    }

    /// Consumes up to `n` readable slots without copying them.
    ///
    /// Returns how many slots were consumed, which is `n` clamped to
    /// [`len`](Self::len).
    pub fn advance(&mut self, n: usize) -> usize {
        let n = n.min(self.readable);
        if n == 0 {
            return 0;
        }
        self.readable -= n;
        self.begin = (self.begin + n) % self.slots.len();
        n
    }

    /// Forgets all readable data.
    ///
    /// Slots are not cleared; stale handles stay in the backing store until
    /// later writes overwrite them.
    pub fn reset(&mut self) {
        log::trace!("ring reset discarding {} readable slots", self.readable);
        self.begin = 0;
        self.readable = 0;
    }

    /// Replaces the backing store with `backing`, all of it readable.
    ///
    /// Capacity becomes `backing.len()`. Returns the previous backing store.
    pub fn adopt_by_transfer(&mut self, backing: Vec<T>) -> Box<[T]> {
        log::debug!(
            "ring adopting {} slots by transfer (was {})",
            backing.len(),
            self.slots.len()
        );
        self.readable = backing.len();
        self.begin = 0;
        mem::replace(&mut self.slots, backing.into_boxed_slice())
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Returns an owned copy of the readable region, in order.
    pub fn to_vec(&self) -> Vec<T> {
        let (first, second) = self.as_slices();
        let mut out = Vec::with_capacity(self.readable);
        out.extend_from_slice(first);
        out.extend_from_slice(second);
        out
    }

    /// Copies up to `out.len()` readable slots into `out` and consumes them.
    ///
    /// Returns the number of slots copied, which is smaller than `out.len()`
    /// only when the ring ran out.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::Exhausted`] if nothing is readable and `out` is
    /// non-empty. An empty `out` always succeeds with `Ok(0)`.
    pub fn read(&mut self, out: &mut [T]) -> Result<usize, RingError> {
        let n = self.copy_out(out)?;
        self.advance(n);
        Ok(n)
    }

    /// Like [`read`](Self::read), but leaves the slots readable.
    ///
    /// Follow with [`advance`](Self::advance) to commit.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::Exhausted`] if nothing is readable and `out` is
    /// non-empty.
    pub fn read_without_advance(&self, out: &mut [T]) -> Result<usize, RingError> {
        self.copy_out(out)
    }

    /// Appends as much of `input` as free capacity allows.
    ///
    /// A zero-length `input` succeeds with `Ok(0)`, even on a full ring.
    ///
    /// # Errors
    ///
    /// - [`RingError::Full`] if there was no free slot; nothing was written.
    /// - [`RingError::ShortWrite`] if only part of `input` fit. The written
    ///   prefix IS stored; its length is in the error.
    pub fn write(&mut self, input: &[T]) -> Result<usize, RingError> {
        if input.is_empty() {
            return Ok(0);
        }

        let cap = self.slots.len();
        let free = cap - self.readable;
        if free == 0 {
            return Err(RingError::Full);
        }

        let n = input.len().min(free);
        let start = (self.begin + self.readable) % cap;
        let first = n.min(cap - start);

        self.slots[start..start + first].clone_from_slice(&input[..first]);
        self.slots[..n - first].clone_from_slice(&input[first..n]);
        self.readable += n;

        if n < input.len() {
            Err(RingError::ShortWrite {
                written: n,
                requested: input.len(),
            })
        } else {
            Ok(n)
        }
    }

    /// Copies `contents` into the existing backing store from offset 0 and
    /// makes exactly those slots readable.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::AdoptTooLarge`] if `contents` does not fit. The
    /// ring is left untouched in that case.
    pub fn adopt_by_copy(&mut self, contents: &[T]) -> Result<(), RingError> {
        if contents.len() > self.slots.len() {
            return Err(RingError::AdoptTooLarge {
                len: contents.len(),
                capacity: self.slots.len(),
            });
        }
        self.copy_in(contents);
        Ok(())
    }

    /// Takes over `backing` if it is strictly larger than the current
    /// capacity, otherwise copies it into the existing store.
    ///
    /// Either way `begin` becomes 0 and all of `backing` is readable. The
    /// array the ring did not keep is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use framestage_ring::{Adopted, RingBuffer};
    ///
    /// let mut ring: RingBuffer<u8> = RingBuffer::with_capacity(4);
    ///
    /// // Fits: copied, capacity unchanged
    /// assert!(matches!(ring.adopt(vec![1, 2]), Adopted::Copied(_)));
    /// assert_eq!(ring.capacity(), 4);
    ///
    /// // Larger: transferred, capacity grows
    /// assert!(matches!(ring.adopt(vec![0; 8]), Adopted::Transferred(_)));
    /// assert_eq!(ring.capacity(), 8);
    /// ```
    pub fn adopt(&mut self, backing: Vec<T>) -> Adopted<T> {
        if backing.len() > self.slots.len() {
            Adopted::Transferred(self.adopt_by_transfer(backing))
        } else {
            self.copy_in(&backing);
            Adopted::Copied(backing)
        }
    }

    fn copy_in(&mut self, contents: &[T]) {
        log::debug!(
            "ring adopting {} slots by copy into capacity {}",
            contents.len(),
            self.slots.len()
        );
        self.slots[..contents.len()].clone_from_slice(contents);
        self.begin = 0;
        self.readable = contents.len();
    }

    fn copy_out(&self, out: &mut [T]) -> Result<usize, RingError> {
        if out.is_empty() {
            return Ok(0);
        }
        if self.readable == 0 {
            return Err(RingError::Exhausted);
        }

        let (first, second) = self.as_slices();
        let n1 = first.len().min(out.len());
        out[..n1].clone_from_slice(&first[..n1]);
        let n2 = second.len().min(out.len() - n1);
        out[n1..n1 + n2].clone_from_slice(&second[..n2]);
        Ok(n1 + n2)
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("begin", &self.begin)
            .field("readable", &self.readable)
            .finish_non_exhaustive()
    }
}
