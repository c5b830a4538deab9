use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::RingBuffer;

#[test]
fn new_buffer_is_empty_and_not_full() {
    let rb = RingBuffer::new(16);
    assert_eq!(rb.capacity(), 16);
    assert_eq!(rb.len(), 0);
    assert!(rb.is_empty());
    assert!(!rb.is_full());
    assert_eq!(rb.registered_read(), None);
}

#[test]
#[should_panic]
fn non_power_of_two_capacity_panics() {
    let _ = RingBuffer::new(12);
}

#[test]
fn fills_to_capacity_then_rejects() {
    let mut rb = RingBuffer::new(4);
    for byte in 0..4u8 {
        assert!(rb.try_push(byte));
    }
    assert!(rb.is_full());
    assert!(!rb.is_empty());
    assert!(!rb.try_push(0xEE));
    assert_eq!(rb.len(), 4);

    // The rejected byte must not have clobbered anything.
    let drained: Vec<u8> = std::iter::from_fn(|| rb.try_pop()).collect();
    assert_eq!(drained, vec![0, 1, 2, 3]);
    assert!(rb.is_empty());
    assert_eq!(rb.try_pop(), None);
}

#[test]
fn wraparound_keeps_fifo_order() {
    let mut rb = RingBuffer::new(4);
    let mut next = 0u8;
    let mut expected = 0u8;
    // Push three, pop two, repeatedly; the cursors wrap several times.
    for _ in 0..20 {
        for _ in 0..3 {
            if rb.try_push(next) {
                next = next.wrapping_add(1);
            }
        }
        for _ in 0..2 {
            if let Some(byte) = rb.try_pop() {
                assert_eq!(byte, expected);
                expected = expected.wrapping_add(1);
            }
        }
    }
    while let Some(byte) = rb.try_pop() {
        assert_eq!(byte, expected);
        expected = expected.wrapping_add(1);
    }
    assert_eq!(expected, next);
}

#[test]
fn single_slot_buffer_distinguishes_full_from_empty() {
    let mut rb = RingBuffer::new(1);
    assert!(rb.is_empty());
    assert!(rb.try_push(7));
    assert!(rb.is_full());
    assert!(!rb.is_empty());
    assert!(!rb.try_push(8));
    assert_eq!(rb.try_pop(), Some(7));
    assert!(rb.is_empty());
    assert!(rb.try_push(9));
    assert_eq!(rb.try_pop(), Some(9));
}

#[test]
fn tick_write_is_visible_on_the_next_tick() {
    let mut rb = RingBuffer::new(16);
    assert!(rb.tick(Some(0x41), false));
    assert!(!rb.is_empty());
    assert_eq!(rb.len(), 1);
    // Writing alone never produces read output.
    assert_eq!(rb.registered_read(), None);
}

#[test]
fn tick_read_output_is_registered_for_one_tick() {
    let mut rb = RingBuffer::new(16);
    rb.tick(Some(0x41), false);
    rb.tick(Some(0xFF), false);

    rb.tick(None, true);
    assert_eq!(rb.registered_read(), Some(0x41));
    assert_eq!(rb.len(), 1);

    // Output valid drops on a tick without a read request.
    rb.tick(None, false);
    assert_eq!(rb.registered_read(), None);

    rb.tick(None, true);
    assert_eq!(rb.registered_read(), Some(0xFF));
    assert!(rb.is_empty());
}

#[test]
fn tick_read_from_empty_is_invalid() {
    let mut rb = RingBuffer::new(8);
    assert!(!rb.tick(None, true));
    assert_eq!(rb.registered_read(), None);
    assert!(rb.is_empty());
    assert_eq!(rb.len(), 0);
}

#[test]
fn tick_judges_full_before_a_simultaneous_read() {
    let mut rb = RingBuffer::new(2);
    rb.tick(Some(1), false);
    rb.tick(Some(2), false);
    assert!(rb.is_full());

    // Read and write in the same tick: the read succeeds, the write is
    // rejected because the buffer was full when it was requested.
    assert!(!rb.tick(Some(3), true));
    assert_eq!(rb.registered_read(), Some(1));
    assert_eq!(rb.len(), 1);

    rb.tick(None, true);
    assert_eq!(rb.registered_read(), Some(2));
    assert!(rb.is_empty());
}

#[test]
fn tick_judges_empty_before_a_simultaneous_write() {
    let mut rb = RingBuffer::new(2);
    // Empty: the read misses, the write lands.
    assert!(rb.tick(Some(5), true));
    assert_eq!(rb.registered_read(), None);
    assert_eq!(rb.len(), 1);

    // Not empty and not full: both happen.
    assert!(rb.tick(Some(6), true));
    assert_eq!(rb.registered_read(), Some(5));
    assert_eq!(rb.len(), 1);
}

#[test]
fn reset_clears_cursors_and_read_port() {
    let mut rb = RingBuffer::new(4);
    rb.tick(Some(1), false);
    rb.tick(Some(2), true);
    assert!(rb.registered_read().is_some());
    rb.reset();
    assert!(rb.is_empty());
    assert_eq!(rb.len(), 0);
    assert_eq!(rb.registered_read(), None);
}

#[test]
fn random_traffic_matches_model_and_never_exceeds_capacity() {
    for &capacity in &[1usize, 2, 4, 16, 64] {
        let mut rng = StdRng::seed_from_u64(0x5eed_0000 + capacity as u64);
        let mut rb = RingBuffer::new(capacity);
        let mut model: VecDeque<u8> = VecDeque::new();
        let mut reads = 0usize;

        for _ in 0..5_000 {
            let write = rng.gen_bool(0.55).then(|| rng.gen::<u8>());
            let read = rng.gen_bool(0.5);

            let was_full = model.len() == capacity;
            let was_empty = model.is_empty();

            let accepted = rb.tick(write, read);

            // Reference model, evaluated against the pre-tick occupancy.
            let expected_read = if read && !was_empty {
                model.pop_front()
            } else {
                None
            };
            let expected_accept = match write {
                Some(byte) if !was_full => {
                    model.push_back(byte);
                    true
                }
                _ => false,
            };

            assert_eq!(accepted, expected_accept);
            assert_eq!(rb.registered_read(), expected_read);
            assert_eq!(rb.len(), model.len());
            assert!(rb.len() <= capacity);
            assert_eq!(rb.is_full(), model.len() == capacity);
            assert_eq!(rb.is_empty(), model.is_empty());
            if expected_read.is_some() {
                reads += 1;
            }
        }
        assert!(reads > 0);
    }
}
