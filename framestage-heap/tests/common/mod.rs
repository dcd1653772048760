//! Sample records shared by the integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use framestage_heap::{OrderKey, TimestampError, Timestamped};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 2016-02-16T00:00:00Z in nanoseconds.
pub const EPOCH_NANOS: i64 = 1_455_580_800 * 1_000_000_000;

const NANOS_PER_SEC: i64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Payload,
    Zero,
    TwoInt64,
}

/// A timestamped record with an opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub tm: i64,
    pub kind: EventKind,
    pub value: i64,
    pub data: Vec<u8>,
}

impl Timestamped for Frame {
    fn order_key(&self) -> Result<OrderKey, TimestampError> {
        Ok(OrderKey::from_nanos(self.tm))
    }
}

/// Generates `n` frames one second apart starting at [`EPOCH_NANOS`],
/// cycling through event kinds with payloads of varying length.
pub fn gen_test_frames(n: usize, seed: u64) -> Vec<Arc<Frame>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let tm = EPOCH_NANOS + i as i64 * NANOS_PER_SEC;
            let frame = match i % 3 {
                0 => {
                    let len = rng.gen_range(0..254);
                    Frame {
                        tm,
                        kind: EventKind::Payload,
                        value: 0,
                        data: (0..len).map(|j| j as u8).collect(),
                    }
                }
                1 => Frame {
                    tm,
                    kind: EventKind::Zero,
                    value: 0,
                    data: Vec::new(),
                },
                _ => Frame {
                    tm,
                    kind: EventKind::TwoInt64,
                    value: i as i64,
                    data: Vec::new(),
                },
            };
            Arc::new(frame)
        })
        .collect()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
