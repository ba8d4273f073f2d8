//! Property-based tests for the playback queue
//!
//! Uses proptest to verify queue invariants across many random inputs.

use chorus_core::Track;
use chorus_playback::Queue;
use proptest::prelude::*;

// ===== Helpers =====

fn make_track(n: usize) -> Track {
    Track::new(format!("Track {}", n), format!("https://example.com/{}", n))
        .with_id(n.to_string().as_str())
}

fn ids<'a>(tracks: impl Iterator<Item = &'a Track>) -> Vec<String> {
    tracks.map(|t| t.id.as_str().to_string()).collect()
}

#[derive(Debug, Clone)]
enum Op {
    Enqueue,
    Forward,
    Backward,
    Discard,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Enqueue),
        2 => Just(Op::Forward),
        1 => Just(Op::Backward),
        1 => Just(Op::Discard),
    ]
}

fn apply(queue: &mut Queue, ops: &[Op]) {
    for (n, op) in ops.iter().enumerate() {
        match op {
            Op::Enqueue => queue.enqueue(make_track(n)),
            Op::Forward => {
                queue.advance_forward();
            }
            Op::Backward => {
                queue.advance_backward();
            }
            Op::Discard => {
                queue.discard_current();
            }
        }
    }
}

// ===== Property Tests =====

proptest! {
    /// Property: tracks come out of the queue in the order they went in
    #[test]
    fn forward_preserves_enqueue_order(count in 1usize..60) {
        let mut queue = Queue::new();
        for n in 0..count {
            queue.enqueue(make_track(n));
        }

        let mut played = Vec::new();
        while let Some(track) = queue.advance_forward() {
            played.push(track.id.as_str().to_string());
        }

        let expected: Vec<String> = (0..count).map(|n| n.to_string()).collect();
        prop_assert_eq!(played, expected);
        prop_assert!(queue.current().is_none());
    }

    /// Property: forward then backward restores the current track, the
    /// pending list and the history size
    #[test]
    fn forward_backward_round_trip(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let mut queue = Queue::new();
        apply(&mut queue, &ops);
        prop_assume!(queue.current().is_some());

        let current = queue.current().cloned();
        let pending = ids(queue.pending());
        let history_len = queue.history_len();

        queue.advance_forward();
        queue.advance_backward();

        prop_assert_eq!(queue.current().cloned(), current);
        prop_assert_eq!(ids(queue.pending()), pending);
        prop_assert_eq!(queue.history_len(), history_len);
    }

    /// Property: no track is in two places at once, and only discards
    /// remove tracks from the queue
    #[test]
    fn queue_conserves_tracks(ops in prop::collection::vec(arbitrary_op(), 0..120)) {
        let mut queue = Queue::new();
        let mut expected = 0usize;
        for (n, op) in ops.iter().enumerate() {
            match op {
                Op::Enqueue => {
                    queue.enqueue(make_track(n));
                    expected += 1;
                }
                Op::Forward => {
                    queue.advance_forward();
                }
                Op::Backward => {
                    queue.advance_backward();
                }
                Op::Discard => {
                    if queue.discard_current().is_some() {
                        expected -= 1;
                    }
                }
            }
        }

        let mut all = ids(queue.pending());
        all.extend(ids(queue.history()));
        if let Some(current) = queue.current() {
            all.push(current.id.as_str().to_string());
        }
        let total = all.len();
        all.sort();
        all.dedup();
        prop_assert_eq!(all.len(), total);
        prop_assert_eq!(total, expected);
    }

    /// Property: the round trip holds however many tracks have already
    /// been played
    #[test]
    fn round_trip_with_long_history(played in 40usize..150, extra in 1usize..5) {
        let mut queue = Queue::new();
        for n in 0..played + extra {
            queue.enqueue(make_track(n));
        }
        for _ in 0..played {
            queue.advance_forward();
        }
        prop_assert_eq!(queue.history_len(), played - 1);

        let current = queue.current().cloned();
        let pending = ids(queue.pending());

        queue.advance_forward();
        queue.advance_backward();

        prop_assert_eq!(queue.current().cloned(), current);
        prop_assert_eq!(ids(queue.pending()), pending);
        prop_assert_eq!(queue.history_len(), played - 1);
    }

    /// Property: backward on empty history never changes anything
    #[test]
    fn backward_without_history_is_noop(count in 0usize..10, forward in 0usize..2) {
        let mut queue = Queue::new();
        for n in 0..count {
            queue.enqueue(make_track(n));
        }
        for _ in 0..forward {
            queue.advance_forward();
        }

        let before = queue.snapshot();
        prop_assert!(queue.advance_backward().is_none());
        prop_assert_eq!(queue.snapshot(), before);
    }
}
