//! Recency-queue policy ("TinyFLU").
//!
//! One ordered sequence of every resident key, least recently touched at the
//! front. Admission appends, a touch moves the key to the back and the victim
//! is always the front. This is LRU expressed as an explicit queue.
//!
//! ```text
//!   front (LRU) ─► [a] ◄──► [b] ◄──► [c] ◄── back (MRU)
//!
//!   promote(a):    [b] ◄──► [c] ◄──► [a]
//!   evict():       b
//! ```

use std::hash::Hash;

use crate::ds::{SegmentIter, SegmentedQueue};
use crate::traits::EvictionPolicy;

const RECENCY: usize = 0;

/// Single-queue recency policy.
///
/// # Example
///
/// ```
/// use querycache::policy::tiny_flu::TinyFluPolicy;
/// use querycache::traits::EvictionPolicy;
///
/// let mut policy = TinyFluPolicy::new();
/// policy.admit(1);
/// policy.admit(2);
/// policy.admit(3);
/// policy.promote(&1);
///
/// assert_eq!(policy.recency_rank(&1), Some(0));
/// assert_eq!(policy.peek_victim(), Some(&2));
/// ```
#[derive(Debug)]
pub struct TinyFluPolicy<K> {
    queue: SegmentedQueue<K>,
}

impl<K> Default for TinyFluPolicy<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TinyFluPolicy<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: SegmentedQueue::with_capacity(1, capacity),
        }
    }

    /// Recency rank of `key`: 0 is the most recently touched.
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        let position = self.queue.position(key)?;
        Some(self.queue.len() - 1 - position)
    }

    /// Keys from least to most recently touched.
    pub fn keys_in_order(&self) -> SegmentIter<'_, K> {
        self.queue.iter(RECENCY)
    }

    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError>
    where
        K: std::fmt::Debug,
    {
        self.queue.check_invariants()
    }
}

impl<K> EvictionPolicy<K> for TinyFluPolicy<K>
where
    K: Clone + Eq + Hash,
{
    fn name(&self) -> &'static str {
        "tinyflu"
    }

    fn admit(&mut self, key: K) {
        self.queue.push_back(RECENCY, key);
    }

    fn promote(&mut self, key: &K) -> bool {
        self.queue.move_to_back(key, RECENCY)
    }

    fn evict(&mut self) -> Option<K> {
        self.queue.pop_front(RECENCY)
    }

    fn peek_victim(&self) -> Option<&K> {
        self.queue.front(RECENCY)
    }

    fn contains(&self, key: &K) -> bool {
        self.queue.contains(key)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}
