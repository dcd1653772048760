//! The record contract.
//!
//! The queue never looks inside a record. It asks for exactly one thing:
//! a scalar timestamp to order by. [`Timestamped`] is that request, and
//! [`OrderKey`] is the answer.

use core::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TimestampError;

/// Nanoseconds since the UNIX epoch, used as the sole sort key.
///
/// Smaller keys are popped first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OrderKey(i64);

impl OrderKey {
    /// The earliest representable key.
    pub const MIN: Self = Self(i64::MIN);

    /// The latest representable key.
    pub const MAX: Self = Self(i64::MAX);

    /// Creates a key from nanoseconds since the UNIX epoch.
    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Returns the key as nanoseconds since the UNIX epoch.
    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }
}

impl From<i64> for OrderKey {
    #[inline]
    fn from(nanos: i64) -> Self {
        Self(nanos)
    }
}

impl fmt::Debug for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderKey({}ns)", self.0)
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// Types that expose a timestamp the queue can order by.
///
/// Implemented for smart pointers to timestamped records, so a queue can
/// hold `Box<Frame>`, `Arc<Frame>` or `&Frame` without copying frames.
///
/// # Example
///
/// ```
/// use framestage_heap::{OrderKey, Timestamped, TimestampError};
///
/// struct Frame {
///     tm: i64,
///     payload: Vec<u8>,
/// }
///
/// impl Timestamped for Frame {
///     fn order_key(&self) -> Result<OrderKey, TimestampError> {
///         Ok(OrderKey::from_nanos(self.tm))
///     }
/// }
///
/// let frame = Frame { tm: 42, payload: vec![] };
/// assert_eq!(frame.order_key().unwrap().as_nanos(), 42);
/// ```
pub trait Timestamped {
    /// Extracts the order key.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] if the record carries no usable timestamp.
    fn order_key(&self) -> Result<OrderKey, TimestampError>;
}

impl Timestamped for OrderKey {
    #[inline]
    fn order_key(&self) -> Result<OrderKey, TimestampError> {
        Ok(*self)
    }
}

impl Timestamped for i64 {
    #[inline]
    fn order_key(&self) -> Result<OrderKey, TimestampError> {
        Ok(OrderKey(*self))
    }
}

impl Timestamped for SystemTime {
    fn order_key(&self) -> Result<OrderKey, TimestampError> {
        let nanos = match self.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_nanos()),
            Err(before) => i64::try_from(before.duration().as_nanos()).map(|n| -n),
        };
        nanos
            .map(OrderKey)
            .map_err(|_| TimestampError::new("system time outside 64-bit nanosecond range"))
    }
}

macro_rules! forward_timestamped {
    ($($ptr:ty),*) => {
        $(
            impl<T: Timestamped + ?Sized> Timestamped for $ptr {
                #[inline]
                fn order_key(&self) -> Result<OrderKey, TimestampError> {
                    (**self).order_key()
                }
            }
        )*
    };
}

forward_timestamped!(&T, &mut T, Box<T>, Rc<T>, Arc<T>);
