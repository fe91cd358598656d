//! Keyed FIFO segments over a single arena.
//!
//! A [`SegmentedQueue`] holds a fixed number of ordered segments. Every key
//! lives in exactly one segment, and a hash index maps each key to its node,
//! so removal and re-append by key are O(1) instead of a linear
//! erase-by-value. This is the shared backbone of all three eviction
//! policies: TinyFLU uses one segment, the LIRS-like policy two, S3-FIFO three.
//!
//! ## Architecture
//!
//! ```text
//!   index: FxHashMap<K, SlotId>        arena: SlotArena<Node<K>>
//!   ┌──────────┬──────────┐            ┌─────┬───────────────────────────┐
//!   │   Key    │  SlotId  │            │ Idx │  key, segment, prev, next │
//!   ├──────────┼──────────┤            ├─────┼───────────────────────────┤
//!   │  "q1"    │   id(0)  │──────────► │  0  │  q1, 0, None, id(2)       │
//!   │  "q2"    │   id(1)  │──────────► │  1  │  q2, 1, None, None        │
//!   │  "q3"    │   id(2)  │──────────► │  2  │  q3, 0, id(0), None       │
//!   └──────────┴──────────┘            └─────┴───────────────────────────┘
//!
//!   segment 0: front ─► [q1] ◄──► [q3] ◄── back
//!   segment 1: front ─► [q2] ◄── back
//! ```
//!
//! The front of a segment is its oldest key, the back its most recent.
//!
//! ## Operations
//!
//! | Operation      | Cost | Notes                                   |
//! |----------------|------|-----------------------------------------|
//! | `push_back`    | O(1) | no-op if the key is already queued      |
//! | `move_to_back` | O(1) | may change segment                      |
//! | `remove`       | O(1) | returns the segment the key was in      |
//! | `pop_front`    | O(1) | oldest key of one segment               |
//! | `position`     | O(n) | rank inside the key's segment           |

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<K> {
    key: K,
    segment: usize,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Segment {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

/// Ordered key segments with O(1) removal by key.
#[derive(Debug)]
pub struct SegmentedQueue<K> {
    arena: SlotArena<Node<K>>,
    index: FxHashMap<K, SlotId>,
    segments: Vec<Segment>,
}

impl<K> SegmentedQueue<K>
where
    K: Clone + Eq + Hash,
{
    /// Creates a queue with `segments` empty segments.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is zero.
    pub fn new(segments: usize) -> Self {
        Self::with_capacity(segments, 0)
    }

    /// Creates a queue with room for `capacity` keys before reallocating.
    ///
    /// # Panics
    ///
    /// Panics if `segments` is zero.
    pub fn with_capacity(segments: usize, capacity: usize) -> Self {
        assert!(segments > 0, "a segmented queue needs at least one segment");
        Self {
            arena: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            segments: vec![Segment::default(); segments],
        }
    }

    /// Number of segments.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total number of keys across all segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of keys in `segment`.
    ///
    /// # Panics
    ///
    /// Panics if `segment` is out of range.
    #[inline]
    pub fn segment_len(&self, segment: usize) -> usize {
        self.segments[segment].len
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Segment currently holding `key`.
    pub fn segment_of(&self, key: &K) -> Option<usize> {
        let &id = self.index.get(key)?;
        self.arena.get(id).map(|node| node.segment)
    }

    /// Oldest key of `segment`.
    ///
    /// # Panics
    ///
    /// Panics if `segment` is out of range.
    pub fn front(&self, segment: usize) -> Option<&K> {
        let id = self.segments[segment].head?;
        self.arena.get(id).map(|node| &node.key)
    }

    /// Most recent key of `segment`.
    ///
    /// # Panics
    ///
    /// Panics if `segment` is out of range.
    pub fn back(&self, segment: usize) -> Option<&K> {
        let id = self.segments[segment].tail?;
        self.arena.get(id).map(|node| &node.key)
    }

    /// Appends `key` at the back of `segment`.
    ///
    /// Returns `false` and leaves the queue untouched if `key` is already
    /// queued in any segment.
    ///
    /// # Panics
    ///
    /// Panics if `segment` is out of range. The queue is left unchanged.
    pub fn push_back(&mut self, segment: usize, key: K) -> bool {
        self.assert_segment(segment);
        if self.index.contains_key(&key) {
            return false;
        }
        let id = self.arena.insert(Node {
            key: key.clone(),
            segment,
            prev: None,
            next: None,
        });
        self.index.insert(key, id);
        self.attach_back(segment, id);
        true
    }

    /// Moves `key` to the back of `segment`, possibly changing segment.
    ///
    /// Returns `false` if `key` is not queued.
    ///
    /// # Panics
    ///
    /// Panics if `segment` is out of range. The queue is left unchanged.
    pub fn move_to_back(&mut self, key: &K, segment: usize) -> bool {
        self.assert_segment(segment);
        let Some(&id) = self.index.get(key) else {
            return false;
        };
        let current = self.arena.get(id).map(|node| node.segment);
        if current == Some(segment) && self.segments[segment].tail == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_back(segment, id);
        true
    }

    /// Removes `key`, returning the segment it was in.
    pub fn remove(&mut self, key: &K) -> Option<usize> {
        let id = self.index.remove(key)?;
        self.detach(id);
        self.arena.remove(id).map(|node| node.segment)
    }

    /// Removes and returns the oldest key of `segment`.
    pub fn pop_front(&mut self, segment: usize) -> Option<K> {
        let id = self.segments[segment].head?;
        self.detach(id);
        let node = self.arena.remove(id)?;
        self.index.remove(&node.key);
        Some(node.key)
    }

    /// Rank of `key` inside its segment, 0 being the front (oldest).
    pub fn position(&self, key: &K) -> Option<usize> {
        let segment = self.segment_of(key)?;
        self.iter(segment).position(|k| k == key)
    }

    /// Keys of `segment` from front (oldest) to back (most recent).
    ///
    /// # Panics
    ///
    /// Panics if `segment` is out of range.
    pub fn iter(&self, segment: usize) -> SegmentIter<'_, K> {
        SegmentIter {
            arena: &self.arena,
            current: self.segments[segment].head,
            remaining: self.segments[segment].len,
        }
    }

    /// Drops every key from every segment.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.segments.fill(Segment::default());
    }

    fn assert_segment(&self, segment: usize) {
        assert!(
            segment < self.segments.len(),
            "segment {segment} out of range for {} segments",
            self.segments.len()
        );
    }

    fn attach_back(&mut self, segment: usize, id: SlotId) {
        let old_tail = self.segments[segment].tail;
        if let Some(node) = self.arena.get_mut(id) {
            node.segment = segment;
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(tail) => {
                if let Some(tail_node) = self.arena.get_mut(tail) {
                    tail_node.next = Some(id);
                }
            },
            None => self.segments[segment].head = Some(id),
        }
        self.segments[segment].tail = Some(id);
        self.segments[segment].len += 1;
    }

    fn detach(&mut self, id: SlotId) {
        let Some((segment, prev, next)) = self
            .arena
            .get(id)
            .map(|node| (node.segment, node.prev, node.next))
        else {
            return;
        };

        match prev {
            Some(p) => {
                if let Some(prev_node) = self.arena.get_mut(p) {
                    prev_node.next = next;
                }
            },
            None => self.segments[segment].head = next,
        }
        match next {
            Some(n) => {
                if let Some(next_node) = self.arena.get_mut(n) {
                    next_node.prev = prev;
                }
            },
            None => self.segments[segment].tail = prev,
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
        self.segments[segment].len -= 1;
    }

    /// Validates links, segment lengths and the key index (debug-only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError>
    where
        K: std::fmt::Debug,
    {
        use crate::error::InvariantError;

        let mut total = 0;
        for (segment, seg) in self.segments.iter().enumerate() {
            let mut count = 0;
            let mut prev: Option<SlotId> = None;
            let mut current = seg.head;
            while let Some(id) = current {
                let node = self.arena.get(id).ok_or_else(|| {
                    InvariantError::new(format!("segment {segment}: stale SlotId {id:?}"))
                })?;
                if node.segment != segment {
                    return Err(InvariantError::new(format!(
                        "key {:?} linked in segment {segment} but tagged {}",
                        node.key, node.segment
                    )));
                }
                if node.prev != prev {
                    return Err(InvariantError::new(format!(
                        "segment {segment}: key {:?} prev link inconsistent",
                        node.key
                    )));
                }
                if self.index.get(&node.key) != Some(&id) {
                    return Err(InvariantError::new(format!(
                        "key {:?} missing from index",
                        node.key
                    )));
                }
                count += 1;
                if count > seg.len {
                    return Err(InvariantError::new(format!(
                        "segment {segment}: more nodes than len {}",
                        seg.len
                    )));
                }
                prev = Some(id);
                current = node.next;
            }
            if seg.tail != prev {
                return Err(InvariantError::new(format!(
                    "segment {segment}: tail does not match last node"
                )));
            }
            if count != seg.len {
                return Err(InvariantError::new(format!(
                    "segment {segment}: counted {count} but len = {}",
                    seg.len
                )));
            }
            total += count;
        }

        if total != self.index.len() || total != self.arena.len() {
            return Err(InvariantError::new(format!(
                "linked {total} keys, index has {}, arena has {}",
                self.index.len(),
                self.arena.len()
            )));
        }
        Ok(())
    }
}

/// Iterator over one segment, oldest first.
#[derive(Debug)]
pub struct SegmentIter<'a, K> {
    arena: &'a SlotArena<Node<K>>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, K> Iterator for SegmentIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.arena.get(id)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for SegmentIter<'_, K> {}

impl<K> std::iter::FusedIterator for SegmentIter<'_, K> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(queue: &SegmentedQueue<&'static str>, segment: usize) -> Vec<&'static str> {
        queue.iter(segment).copied().collect()
    }

    mod basic_operations {
        use super::*;

        #[test]
        fn push_back_appends_in_order() {
            let mut queue = SegmentedQueue::new(1);
            assert!(queue.push_back(0, "a"));
            assert!(queue.push_back(0, "b"));
            assert!(queue.push_back(0, "c"));
            assert_eq!(keys(&queue, 0), vec!["a", "b", "c"]);
            assert_eq!(queue.front(0), Some(&"a"));
            assert_eq!(queue.back(0), Some(&"c"));
            assert_eq!(queue.len(), 3);
        }

        #[test]
        fn duplicate_push_is_rejected() {
            let mut queue = SegmentedQueue::new(2);
            assert!(queue.push_back(0, "a"));
            assert!(!queue.push_back(1, "a"));
            assert_eq!(queue.segment_of(&"a"), Some(0));
            assert_eq!(queue.len(), 1);
        }

        #[test]
        fn pop_front_returns_oldest() {
            let mut queue = SegmentedQueue::new(1);
            queue.push_back(0, "a");
            queue.push_back(0, "b");
            assert_eq!(queue.pop_front(0), Some("a"));
            assert_eq!(queue.pop_front(0), Some("b"));
            assert_eq!(queue.pop_front(0), None);
            assert!(queue.is_empty());
        }

        #[test]
        fn remove_middle_and_ends() {
            let mut queue = SegmentedQueue::new(1);
            for k in ["a", "b", "c", "d"] {
                queue.push_back(0, k);
            }
            assert_eq!(queue.remove(&"b"), Some(0));
            assert_eq!(keys(&queue, 0), vec!["a", "c", "d"]);
            assert_eq!(queue.remove(&"a"), Some(0));
            assert_eq!(queue.remove(&"d"), Some(0));
            assert_eq!(keys(&queue, 0), vec!["c"]);
            assert_eq!(queue.remove(&"zzz"), None);
        }

        #[test]
        fn clear_resets_every_segment() {
            let mut queue = SegmentedQueue::new(3);
            queue.push_back(0, "a");
            queue.push_back(1, "b");
            queue.push_back(2, "c");
            queue.clear();
            assert!(queue.is_empty());
            for segment in 0..3 {
                assert_eq!(queue.segment_len(segment), 0);
                assert_eq!(queue.front(segment), None);
            }
        }

        #[test]
        #[should_panic(expected = "at least one segment")]
        fn zero_segments_panics() {
            let _queue: SegmentedQueue<u32> = SegmentedQueue::new(0);
        }

        #[test]
        #[should_panic(expected = "out of range")]
        fn push_to_missing_segment_panics() {
            let mut queue = SegmentedQueue::new(2);
            queue.push_back(2, "a");
        }

        #[test]
        fn rejected_segment_leaves_queue_untouched() {
            use std::panic::{AssertUnwindSafe, catch_unwind};

            let mut queue = SegmentedQueue::new(2);
            queue.push_back(0, "a");
            let pushed = catch_unwind(AssertUnwindSafe(|| queue.push_back(5, "b")));
            assert!(pushed.is_err());
            let moved = catch_unwind(AssertUnwindSafe(|| queue.move_to_back(&"a", 5)));
            assert!(moved.is_err());

            assert_eq!(queue.len(), 1);
            assert!(!queue.contains(&"b"));
            assert_eq!(queue.segment_of(&"a"), Some(0));
            assert_eq!(keys(&queue, 0), vec!["a"]);
            assert!(queue.push_back(1, "b"));
            #[cfg(debug_assertions)]
            queue.check_invariants().unwrap();
        }
    }

    mod moves {
        use super::*;

        #[test]
        fn move_to_back_within_segment() {
            let mut queue = SegmentedQueue::new(1);
            for k in ["a", "b", "c"] {
                queue.push_back(0, k);
            }
            assert!(queue.move_to_back(&"a", 0));
            assert_eq!(keys(&queue, 0), vec!["b", "c", "a"]);
            assert!(queue.move_to_back(&"a", 0));
            assert_eq!(keys(&queue, 0), vec!["b", "c", "a"]);
        }

        #[test]
        fn move_to_back_across_segments() {
            let mut queue = SegmentedQueue::new(2);
            queue.push_back(0, "a");
            queue.push_back(0, "b");
            queue.push_back(1, "x");
            assert!(queue.move_to_back(&"a", 1));
            assert_eq!(keys(&queue, 0), vec!["b"]);
            assert_eq!(keys(&queue, 1), vec!["x", "a"]);
            assert_eq!(queue.segment_of(&"a"), Some(1));
            assert_eq!(queue.segment_len(0), 1);
            assert_eq!(queue.segment_len(1), 2);
        }

        #[test]
        fn move_missing_key_is_false() {
            let mut queue: SegmentedQueue<&str> = SegmentedQueue::new(1);
            assert!(!queue.move_to_back(&"a", 0));
        }

        #[test]
        fn position_is_rank_within_segment() {
            let mut queue = SegmentedQueue::new(2);
            queue.push_back(0, "a");
            queue.push_back(1, "b");
            queue.push_back(0, "c");
            assert_eq!(queue.position(&"a"), Some(0));
            assert_eq!(queue.position(&"c"), Some(1));
            assert_eq!(queue.position(&"b"), Some(0));
            assert_eq!(queue.position(&"zzz"), None);
        }
    }

    #[cfg(debug_assertions)]
    mod invariants {
        use super::*;

        #[test]
        fn hold_through_mixed_operations() {
            let mut queue = SegmentedQueue::new(3);
            for i in 0..20u32 {
                queue.push_back((i % 3) as usize, i);
                queue.check_invariants().unwrap();
            }
            for i in (0..20u32).step_by(4) {
                queue.move_to_back(&i, 2);
                queue.check_invariants().unwrap();
            }
            for i in (1..20u32).step_by(5) {
                queue.remove(&i);
                queue.check_invariants().unwrap();
            }
            while queue.pop_front(2).is_some() {
                queue.check_invariants().unwrap();
            }
            queue.clear();
            queue.check_invariants().unwrap();
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Push(usize, u8),
            Move(u8, usize),
            Remove(u8),
            Pop(usize),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..3, any::<u8>()).prop_map(|(s, k)| Op::Push(s, k % 32)),
                (any::<u8>(), 0usize..3).prop_map(|(k, s)| Op::Move(k % 32, s)),
                any::<u8>().prop_map(|k| Op::Remove(k % 32)),
                (0usize..3).prop_map(Op::Pop),
            ]
        }

        proptest! {
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_segment_lengths_sum_to_len(
                ops in prop::collection::vec(op_strategy(), 0..200)
            ) {
                let mut queue = SegmentedQueue::new(3);
                for op in ops {
                    match op {
                        Op::Push(s, k) => { queue.push_back(s, k); },
                        Op::Move(k, s) => { queue.move_to_back(&k, s); },
                        Op::Remove(k) => { queue.remove(&k); },
                        Op::Pop(s) => { queue.pop_front(s); },
                    }
                    let sum: usize = (0..3).map(|s| queue.segment_len(s)).sum();
                    prop_assert_eq!(sum, queue.len());
                    #[cfg(debug_assertions)]
                    queue.check_invariants().unwrap();
                }
            }
        }
    }
}
