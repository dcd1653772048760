//! # framestage-ring
//!
//! Fixed-capacity circular buffer of record references, for staging
//! frames between a producer and a consumer on the same thread.
//!
//! ## Features
//!
//! - **Batch I/O**: `write` and `read` move slices of handles at a time
//! - **Peek and commit**: `read_without_advance` followed by `advance`
//! - **Zero-copy view**: `as_slices` exposes the readable region as at most
//!   two contiguous slices
//! - **Adopt**: swap in a new backing store, or copy contents into the
//!   existing one
//!
//! ## Design Goals
//!
//! - No allocations after construction, except on adopt-by-transfer
//! - Records are never copied, only their handles
//! - Partial writes are reported, never silently dropped
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use framestage_ring::{RingBuffer, RingError};
//!
//! let mut ring: RingBuffer<Option<Arc<str>>> = RingBuffer::with_capacity(2);
//!
//! let frames = [Some(Arc::from("a")), Some(Arc::from("b")), Some(Arc::from("c"))];
//! let err = ring.write(&frames).unwrap_err();
//! assert_eq!(err.written(), 2);
//!
//! let mut out = vec![None; 2];
//! assert_eq!(ring.read(&mut out), Ok(2));
//! assert_eq!(out[0].as_deref(), Some("a"));
//! assert_eq!(ring.read(&mut out), Err(RingError::Exhausted));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod ring;

pub use error::RingError;
pub use ring::{Adopted, RingBuffer};
