//! Time-ordered min-heap with in-place reprioritization.
//!
//! Entries live in a slab arena and embed their own heap position, so a
//! caller holding a [`Handle`] can reprioritize or remove an entry in
//! O(log n) without searching for it.

use core::fmt;
use core::mem;

use slab::Slab;

use crate::{HeapError, OrderKey, Position, Timestamped};

/// Caller-retained reference to a queued entry.
///
/// Returned by [`PriorityQueue::add`]. A handle stays valid until its entry
/// is popped or removed. After that every operation taking the handle
/// reports [`HeapError::StaleHandle`], even if the arena slot has since been
/// reused by a newer entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: usize,
    generation: u64,
}

struct Entry<R> {
    value: R,
    key: OrderKey,
    position: Position,
    generation: u64,
}

/// A min-heap of records ordered by timestamp.
///
/// Records are moved in on [`add`](Self::add) and moved back out on
/// [`pop`](Self::pop), [`remove`](Self::remove), or as the displaced value of
/// [`update`](Self::update). Ties between equal keys are broken arbitrarily.
///
/// # Example
///
/// ```
/// use framestage_heap::{OrderKey, PriorityQueue};
///
/// let mut pq: PriorityQueue<OrderKey> = PriorityQueue::new();
///
/// let late = pq.add(OrderKey::from_nanos(30)).unwrap();
/// pq.add(OrderKey::from_nanos(20)).unwrap();
///
/// // Reschedule the late record ahead of everything else
/// pq.update(late, OrderKey::from_nanos(10)).unwrap();
///
/// assert_eq!(pq.pop().unwrap().as_nanos(), 10);
/// assert_eq!(pq.pop().unwrap().as_nanos(), 20);
/// assert!(pq.pop().is_err());
/// ```
pub struct PriorityQueue<R> {
    /// Arena owning every resident entry.
    entries: Slab<Entry<R>>,
    /// Arena slots in heap order.
    heap: Vec<usize>,
    next_generation: u64,
}

impl<R> Default for PriorityQueue<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PriorityQueue<R> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            entries: Slab::new(),
            heap: Vec::new(),
            next_generation: 0,
        }
    }

    /// Creates an empty queue with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Slab::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
            next_generation: 0,
        }
    }

    /// Returns the number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the queue holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns how many entries fit before the arena reallocates.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the record with the smallest order key without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Empty`] if the queue is empty.
    pub fn peek(&self) -> Result<&R, HeapError> {
        let slot = *self.heap.first().ok_or(HeapError::Empty)?;
        Ok(&self.entries[slot].value)
    }

    /// Returns the smallest order key without removing its entry.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Empty`] if the queue is empty.
    pub fn peek_key(&self) -> Result<OrderKey, HeapError> {
        let slot = *self.heap.first().ok_or(HeapError::Empty)?;
        Ok(self.entries[slot].key)
    }

    /// Returns the record behind `handle`, if still resident.
    pub fn get(&self, handle: Handle) -> Option<&R> {
        self.entry(handle).map(|e| &e.value)
    }

    /// Returns the order key the queue currently holds for `handle`.
    pub fn order_key(&self, handle: Handle) -> Option<OrderKey> {
        self.entry(handle).map(|e| e.key)
    }

    /// Returns the current heap position of `handle`.
    ///
    /// Popped or removed entries report [`Position::DETACHED`]. The value is
    /// advisory: any mutation of the queue may move the entry.
    pub fn position(&self, handle: Handle) -> Position {
        self.entry(handle).map_or(Position::DETACHED, |e| e.position)
    }

    /// Returns `true` if `handle` still refers to a resident entry.
    pub fn contains(&self, handle: Handle) -> bool {
        self.entry(handle).is_some()
    }

    // ========================================================================
    // Remove operations
    // ========================================================================

    /// Removes and returns the record with the smallest order key.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Empty`] if the queue is empty.
    pub fn pop(&mut self) -> Result<R, HeapError> {
        if self.heap.is_empty() {
            return Err(HeapError::Empty);
        }
        Ok(self.detach_at(0))
    }

    /// Removes the entry behind `handle` from anywhere in the queue.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::StaleHandle`] if the entry was already popped
    /// or removed.
    pub fn remove(&mut self, handle: Handle) -> Result<R, HeapError> {
        let pos = self.entry(handle).ok_or(HeapError::StaleHandle)?.position;
        Ok(self.detach_at(pos.as_usize()))
    }

    /// Pops records in order while `pred` holds for the current minimum.
    ///
    /// Stops at the first record that fails the predicate and leaves it
    /// queued.
    ///
    /// # Example
    ///
    /// ```
    /// use framestage_heap::{OrderKey, PriorityQueue};
    ///
    /// let mut pq: PriorityQueue<i64> = PriorityQueue::new();
    /// for ts in [5, 1, 7, 3] {
    ///     pq.add(ts).unwrap();
    /// }
    ///
    /// // Release everything at or before the watermark
    /// let released: Vec<_> = pq.drain_while(|&ts| ts <= 4).collect();
    /// assert_eq!(released, vec![1, 3]);
    /// assert_eq!(pq.len(), 2);
    /// ```
    pub fn drain_while<F>(&mut self, pred: F) -> DrainWhile<'_, R, F>
    where
        F: FnMut(&R) -> bool,
    {
        DrainWhile { queue: self, pred }
    }

    /// Drops every entry. All outstanding handles become stale.
    pub fn clear(&mut self) {
        log::debug!("clearing priority queue of {} entries", self.heap.len());
        self.heap.clear();
        self.entries.clear();
    }

    // ========================================================================
    // Heap maintenance
    // ========================================================================

    /// Rebuilds the heap property over the whole backing sequence.
    ///
    /// Needed after bulk loading with [`push_unordered`](Self::push_unordered).
    /// Runs in O(n).
    pub fn reinit(&mut self) {
        let len = self.heap.len();
        for pos in (0..len / 2).rev() {
            self.sift_down(pos);
        }
        for (pos, &slot) in self.heap.iter().enumerate() {
            self.entries[slot].position = Position::new(pos);
        }
        log::trace!("rebuilt heap over {len} entries");
    }

    /// Returns `true` if the heap property holds and every entry's position
    /// matches its index.
    pub fn is_heap_consistent(&self) -> bool {
        self.heap.iter().enumerate().all(|(pos, &slot)| {
            let entry = &self.entries[slot];
            let parent_ok = pos == 0 || self.key_at((pos - 1) / 2) <= entry.key;
            parent_ok && entry.position == Position::new(pos)
        }) && self.entries.len() == self.heap.len()
    }

    fn entry(&self, handle: Handle) -> Option<&Entry<R>> {
        self.entries
            .get(handle.slot)
            .filter(|e| e.generation == handle.generation && !e.position.is_detached())
    }

    fn insert(&mut self, value: R, key: OrderKey) -> (Handle, usize) {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);

        let pos = self.heap.len();
        let slot = self.entries.insert(Entry {
            value,
            key,
            position: Position::new(pos),
            generation,
        });
        self.heap.push(slot);

        (Handle { slot, generation }, pos)
    }

    /// Unlinks the entry at `pos` by swapping in the last entry, then
    /// repairs around the hole.
    fn detach_at(&mut self, pos: usize) -> R {
        let slot = self.heap.swap_remove(pos);
        if pos < self.heap.len() {
            let moved = self.heap[pos];
            self.entries[moved].position = Position::new(pos);
            self.repair(pos);
        }
        self.entries.remove(slot).value
    }

    #[inline]
    fn key_at(&self, pos: usize) -> OrderKey {
        self.entries[self.heap[pos]].key
    }

    /// Restores order around `pos` when the key there moved either way.
    #[inline]
    fn repair(&mut self, pos: usize) {
        if self.sift_up(pos) == pos {
            self.sift_down(pos);
        }
    }

    fn sift_up(&mut self, pos: usize) -> usize {
        let slot = self.heap[pos];
        let key = self.entries[slot].key;
        let mut hole = pos;

        while hole > 0 {
            let parent = (hole - 1) / 2;
            let parent_slot = self.heap[parent];
            if key < self.entries[parent_slot].key {
                self.heap[hole] = parent_slot;
                self.entries[parent_slot].position = Position::new(hole);
                hole = parent;
            } else {
                break;
            }
        }

        if hole != pos {
            self.heap[hole] = slot;
            self.entries[slot].position = Position::new(hole);
        }
        hole
    }

    fn sift_down(&mut self, pos: usize) -> usize {
        let len = self.heap.len();
        let slot = self.heap[pos];
        let key = self.entries[slot].key;
        let mut hole = pos;

        // Phase 1: descend to a leaf, always following the smaller child
        loop {
            let left = 2 * hole + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smaller = if right < len && self.key_at(right) < self.key_at(left) {
                right
            } else {
                left
            };

            let child_slot = self.heap[smaller];
            self.heap[hole] = child_slot;
            self.entries[child_slot].position = Position::new(hole);
            hole = smaller;
        }

        // Phase 2: climb back while the displaced entry beats its parent
        while hole > pos {
            let parent = (hole - 1) / 2;
            let parent_slot = self.heap[parent];
            if key < self.entries[parent_slot].key {
                self.heap[hole] = parent_slot;
                self.entries[parent_slot].position = Position::new(hole);
                hole = parent;
            } else {
                break;
            }
        }

        self.heap[hole] = slot;
        self.entries[slot].position = Position::new(hole);
        hole
    }
}

impl<R: Timestamped> PriorityQueue<R> {
    // ========================================================================
    // Insert operations
    // ========================================================================

    /// Queues `record`, ordered by its timestamp.
    ///
    /// Keep the returned handle to [`update`](Self::update) the entry later.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Timestamp`] if the record's order key cannot be
    /// extracted. Nothing is inserted in that case.
    pub fn add(&mut self, record: R) -> Result<Handle, HeapError> {
        let key = record.order_key()?;
        let (handle, pos) = self.insert(record, key);
        self.repair(pos);
        Ok(handle)
    }

    /// Replaces the record behind `handle` and moves it to its new rank.
    ///
    /// Returns the record that was replaced.
    ///
    /// # Errors
    ///
    /// - [`HeapError::StaleHandle`] if the entry was already popped or removed.
    /// - [`HeapError::Timestamp`] if `record` has no usable timestamp.
    ///
    /// The queue is left untouched on error.
    pub fn update(&mut self, handle: Handle, record: R) -> Result<R, HeapError> {
        if !self.contains(handle) {
            return Err(HeapError::StaleHandle);
        }
        let key = record.order_key()?;

        let entry = &mut self.entries[handle.slot];
        let old = mem::replace(&mut entry.value, record);
        entry.key = key;
        let pos = entry.position.as_usize();

        self.repair(pos);
        Ok(old)
    }

    /// Appends `record` without restoring heap order.
    ///
    /// For bulk loads: push everything, then call [`reinit`](Self::reinit)
    /// once. Until then the order of [`pop`](Self::pop) is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::Timestamp`] if the record's order key cannot be
    /// extracted.
    pub fn push_unordered(&mut self, record: R) -> Result<Handle, HeapError> {
        let key = record.order_key()?;
        Ok(self.insert(record, key).0)
    }

    /// Bulk loads `records` and rebuilds the heap once at the end.
    ///
    /// On error the records consumed so far stay queued, and the heap is
    /// still rebuilt before returning.
    ///
    /// # Errors
    ///
    /// Returns the first [`HeapError::Timestamp`] encountered.
    pub fn extend_unordered<I>(&mut self, records: I) -> Result<Vec<Handle>, HeapError>
    where
        I: IntoIterator<Item = R>,
    {
        let records = records.into_iter();
        let mut handles = Vec::with_capacity(records.size_hint().0);
        let mut outcome = Ok(());

        for record in records {
            match self.push_unordered(record) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }

        log::debug!("bulk loaded {} records", handles.len());
        self.reinit();
        outcome.map(|()| handles)
    }
}

impl<R> fmt::Debug for PriorityQueue<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.len())
            .field("min", &self.peek_key().ok())
            .finish_non_exhaustive()
    }
}

/// Iterator that pops records while a predicate holds.
///
/// Created by [`PriorityQueue::drain_while`].
pub struct DrainWhile<'a, R, F>
where
    F: FnMut(&R) -> bool,
{
    queue: &'a mut PriorityQueue<R>,
    pred: F,
}

impl<R, F> Iterator for DrainWhile<'_, R, F>
where
    F: FnMut(&R) -> bool,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let min = self.queue.peek().ok()?;
        if (self.pred)(min) {
            self.queue.pop().ok()
        } else {
            None
        }
    }
}
