//! Time-ordered priority queue for staging timestamped records.
//!
//! Records arrive out of order and need to leave in timestamp order, with
//! the occasional record rescheduled while it waits. This crate provides a
//! min-heap keyed by a single scalar timestamp that supports exactly that.
//!
//! # Design
//!
//! ```text
//! Slab<Entry>     - owns records, stable slots, each entry knows its position
//! Vec<slot>       - heap order over the slab
//! Handle          - (slot, generation) held by the caller
//! ```
//!
//! Every sift rewrites the positions of the entries it moves, so an entry
//! can always be found from its handle in O(1) and repaired in O(log n).
//! The generation in each handle turns use-after-pop into a reported
//! [`HeapError::StaleHandle`] instead of silently touching whichever record
//! reused the slot.
//!
//! # Quick Start
//!
//! ```
//! use framestage_heap::{OrderKey, PriorityQueue, Timestamped, TimestampError};
//!
//! #[derive(Debug)]
//! struct Frame {
//!     tm: i64,
//!     payload: &'static str,
//! }
//!
//! impl Timestamped for Frame {
//!     fn order_key(&self) -> Result<OrderKey, TimestampError> {
//!         Ok(OrderKey::from_nanos(self.tm))
//!     }
//! }
//!
//! let mut pq: PriorityQueue<Box<Frame>> = PriorityQueue::new();
//!
//! pq.add(Box::new(Frame { tm: 300, payload: "c" })).unwrap();
//! let b = pq.add(Box::new(Frame { tm: 200, payload: "b" })).unwrap();
//! pq.add(Box::new(Frame { tm: 100, payload: "a" })).unwrap();
//!
//! // Push "b" behind everything else
//! pq.update(b, Box::new(Frame { tm: 400, payload: "b" })).unwrap();
//!
//! let order: Vec<_> = std::iter::from_fn(|| pq.pop().ok())
//!     .map(|f| f.payload)
//!     .collect();
//! assert_eq!(order, vec!["a", "c", "b"]);
//! ```
//!
//! # Ordering
//!
//! Successive pops return non-decreasing keys. Equal keys come out in no
//! particular order.
//!
//! # Threading
//!
//! The queue does no locking. Wrap it in a mutex if several threads need it.

#![warn(missing_docs)]

pub mod error;
pub mod position;
pub mod queue;
pub mod record;

pub use error::{HeapError, TimestampError};
pub use position::Position;
pub use queue::{DrainWhile, Handle, PriorityQueue};
pub use record::{OrderKey, Timestamped};
