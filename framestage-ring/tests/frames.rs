//! Ring buffer behavior over shared frame handles.

use std::collections::VecDeque;
use std::sync::Arc;

use framestage_ring::{Adopted, RingBuffer, RingError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[allow(dead_code)]
#[derive(Debug, PartialEq)]
struct Frame {
    tm: i64,
    data: Vec<u8>,
}

type Slot = Option<Arc<Frame>>;

fn frames(n: usize) -> Vec<Slot> {
    (0..n)
        .map(|i| {
            Some(Arc::new(Frame {
                tm: i as i64,
                data: vec![i as u8; i % 7],
            }))
        })
        .collect()
}

fn times(slots: &[Slot]) -> Vec<i64> {
    slots.iter().map(|s| s.as_ref().map_or(-1, |f| f.tm)).collect()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn handles_are_shared_not_copied() {
    let input = frames(3);
    let mut ring = RingBuffer::with_capacity(4);
    ring.write(&input).unwrap();

    let mut out: Vec<Slot> = vec![None; 3];
    ring.read(&mut out).unwrap();

    for (a, b) in input.iter().zip(&out) {
        assert!(Arc::ptr_eq(a.as_ref().unwrap(), b.as_ref().unwrap()));
    }
}

#[test]
fn wraparound_round_trip() {
    init_logging();
    let input = frames(10);
    let mut ring = RingBuffer::with_capacity(5);

    ring.write(&input[..4]).unwrap();
    assert_eq!(ring.advance(3), 3);
    ring.write(&input[4..7]).unwrap();

    // begin 3, readable 4, capacity 5
    let (first, second) = ring.as_slices();
    assert_eq!(times(first), vec![3, 4]);
    assert_eq!(times(second), vec![5, 6]);

    let mut out: Vec<Slot> = vec![None; 4];
    assert_eq!(ring.read(&mut out), Ok(4));
    assert_eq!(times(&out), vec![3, 4, 5, 6]);
    assert_eq!(ring.read(&mut out), Err(RingError::Exhausted));
}

#[test]
fn short_write_keeps_prefix() {
    let input = frames(8);
    let mut ring = RingBuffer::with_capacity(5);
    ring.write(&input[..2]).unwrap();

    let err = ring.write(&input[2..]).unwrap_err();
    assert_eq!(
        err,
        RingError::ShortWrite {
            written: 3,
            requested: 6
        }
    );
    assert_eq!(times(&ring.to_vec()), vec![0, 1, 2, 3, 4]);

    // Resume from where the short write stopped
    ring.advance(2);
    let rest = &input[2 + err.written()..];
    assert_eq!(ring.write(&rest[..2]), Ok(2));
    assert_eq!(times(&ring.to_vec()), vec![2, 3, 4, 5, 6]);
}

#[test]
fn peek_twice_then_commit() {
    let input = frames(4);
    let mut ring = RingBuffer::with_capacity(4);
    ring.write(&input).unwrap();

    let mut a: Vec<Slot> = vec![None; 2];
    let mut b: Vec<Slot> = vec![None; 2];
    assert_eq!(ring.read_without_advance(&mut a), Ok(2));
    assert_eq!(ring.read_without_advance(&mut b), Ok(2));
    assert_eq!(times(&a), times(&b));

    ring.advance(2);
    assert_eq!(ring.read(&mut a), Ok(2));
    assert_eq!(times(&a), vec![2, 3]);
}

#[test]
fn reset_discards_everything() {
    let mut ring = RingBuffer::with_capacity(4);
    ring.write(&frames(3)).unwrap();
    ring.advance(1);
    ring.reset();

    assert_eq!(ring.begin(), 0);
    assert!(ring.is_empty());
    let mut out: Vec<Slot> = vec![None; 1];
    assert_eq!(ring.read(&mut out), Err(RingError::Exhausted));
}

#[test]
fn adopt_transitions() {
    init_logging();
    let mut ring: RingBuffer<Slot> = RingBuffer::with_capacity(3);
    ring.write(&frames(2)).unwrap();

    // Larger: backing store replaced
    let bigger = frames(6);
    match ring.adopt(bigger) {
        Adopted::Transferred(prev) => assert_eq!(prev.len(), 3),
        Adopted::Copied(_) => panic!("expected transfer"),
    }
    assert_eq!(ring.capacity(), 6);
    assert_eq!(ring.len(), 6);

    // Smaller: copied into the 6-slot store
    match ring.adopt(frames(2)) {
        Adopted::Copied(back) => assert_eq!(back.len(), 2),
        Adopted::Transferred(_) => panic!("expected copy"),
    }
    assert_eq!(ring.capacity(), 6);
    assert_eq!(ring.len(), 2);
    assert_eq!(ring.begin(), 0);
    assert_eq!(ring.free(), 4);
}

#[test]
fn matches_vecdeque_model() {
    let pool = frames(64);
    let mut rng = StdRng::seed_from_u64(7);
    let mut ring: RingBuffer<Slot> = RingBuffer::with_capacity(13);
    let mut model: VecDeque<i64> = VecDeque::new();

    for _ in 0..5_000 {
        match rng.gen_range(0..4) {
            0 => {
                let n = rng.gen_range(0..20);
                let start = rng.gen_range(0..pool.len() - n);
                let chunk = &pool[start..start + n];
                let free = 13 - model.len();
                let stored = n.min(free);
                match ring.write(chunk) {
                    Ok(k) => assert_eq!(k, n),
                    Err(RingError::Full) => assert!(free == 0 && n > 0),
                    Err(e) => assert_eq!(e.written(), stored),
                }
                model.extend(times(&chunk[..stored]));
            }
            1 => {
                let mut out: Vec<Slot> = vec![None; rng.gen_range(0..10)];
                match ring.read(&mut out) {
                    Ok(k) => {
                        let expect: Vec<i64> = model.drain(..k).collect();
                        assert_eq!(times(&out[..k]), expect);
                    }
                    Err(RingError::Exhausted) => assert!(model.is_empty()),
                    Err(e) => panic!("unexpected {e}"),
                }
            }
            2 => {
                let n = rng.gen_range(0..10);
                let k = ring.advance(n);
                assert_eq!(k, n.min(model.len()));
                model.drain(..k);
            }
            _ => {
                let (first, second) = ring.as_slices();
                let mut seen = times(first);
                seen.extend(times(second));
                assert_eq!(seen, model.iter().copied().collect::<Vec<_>>());
            }
        }
        assert_eq!(ring.len(), model.len());
        assert!(ring.begin() < ring.capacity());
    }
}
