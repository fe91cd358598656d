//! Segmented-FIFO policy ("S3-FIFO").
//!
//! Three FIFO tiers of increasing reuse confidence. New keys enter the short
//! tier; each reuse moves a key one tier up, and a reuse in the long tier
//! refreshes its position there. Victims come from the lowest non-empty tier,
//! so a burst of one-shot keys is drained from the short tier without
//! disturbing keys that have been reused twice.
//!
//! ## Architecture
//!
//! ```text
//!   admit(k)
//!      │
//!      ▼
//!   ┌────────────────────────┐  promote   ┌────────────────────────┐
//!   │ SHORT  front ─► ... ◄─ │ ─────────► │ MEDIUM front ─► ... ◄─ │
//!   └────────────────────────┘            └────────────────────────┘
//!                                                     │ promote
//!                                                     ▼
//!                                         ┌────────────────────────┐
//!                                         │ LONG   front ─► ... ◄─ │ ◄─┐
//!                                         └────────────────────────┘   │
//!                                                     └── promote ─────┘
//!
//!   evict(): front of SHORT, else MEDIUM, else LONG
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use querycache::policy::s3_fifo::{S3FifoPolicy, S3Tier};
//! use querycache::traits::EvictionPolicy;
//!
//! let mut policy = S3FifoPolicy::new();
//! policy.admit("hot");
//! policy.admit("scan");
//! policy.promote(&"hot");
//! policy.promote(&"hot");
//!
//! assert_eq!(policy.tier_of(&"hot"), Some(S3Tier::Long));
//! assert_eq!(policy.evict(), Some("scan"));
//! ```

use std::hash::Hash;

use crate::ds::{SegmentIter, SegmentedQueue};
use crate::traits::EvictionPolicy;

/// Tier of a key tracked by [`S3FifoPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S3Tier {
    /// Admitted, not yet reused.
    Short,
    /// Reused once.
    Medium,
    /// Reused twice or more.
    Long,
}

impl S3Tier {
    /// Tiers in eviction order.
    pub const ALL: [S3Tier; 3] = [S3Tier::Short, S3Tier::Medium, S3Tier::Long];

    #[inline]
    fn segment(self) -> usize {
        match self {
            S3Tier::Short => 0,
            S3Tier::Medium => 1,
            S3Tier::Long => 2,
        }
    }

    fn from_segment(segment: usize) -> Self {
        match segment {
            0 => S3Tier::Short,
            1 => S3Tier::Medium,
            _ => S3Tier::Long,
        }
    }

    /// Tier a reuse moves a key into.
    fn next(self) -> Self {
        match self {
            S3Tier::Short => S3Tier::Medium,
            S3Tier::Medium | S3Tier::Long => S3Tier::Long,
        }
    }
}

/// Three-tier segmented FIFO eviction policy.
#[derive(Debug)]
pub struct S3FifoPolicy<K> {
    queue: SegmentedQueue<K>,
}

impl<K> Default for S3FifoPolicy<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> S3FifoPolicy<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a policy with room for `capacity` keys before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: SegmentedQueue::with_capacity(S3Tier::ALL.len(), capacity),
        }
    }

    #[inline]
    pub fn short_len(&self) -> usize {
        self.queue.segment_len(S3Tier::Short.segment())
    }

    #[inline]
    pub fn medium_len(&self) -> usize {
        self.queue.segment_len(S3Tier::Medium.segment())
    }

    #[inline]
    pub fn long_len(&self) -> usize {
        self.queue.segment_len(S3Tier::Long.segment())
    }

    pub fn tier_of(&self, key: &K) -> Option<S3Tier> {
        self.queue.segment_of(key).map(S3Tier::from_segment)
    }

    /// Keys of `tier`, oldest first.
    pub fn keys_in_order(&self, tier: S3Tier) -> SegmentIter<'_, K> {
        self.queue.iter(tier.segment())
    }

    /// Validates the tier sequences (debug-only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError>
    where
        K: std::fmt::Debug,
    {
        self.queue.check_invariants()
    }
}

impl<K> EvictionPolicy<K> for S3FifoPolicy<K>
where
    K: Clone + Eq + Hash,
{
    fn name(&self) -> &'static str {
        "s3fifo"
    }

    fn admit(&mut self, key: K) {
        self.queue.push_back(S3Tier::Short.segment(), key);
    }

    fn promote(&mut self, key: &K) -> bool {
        let Some(tier) = self.tier_of(key) else {
            return false;
        };
        let target = tier.next();
        if target != tier {
            tracing::trace!(policy = "s3fifo", from = ?tier, to = ?target, "tier promotion");
        }
        self.queue.move_to_back(key, target.segment())
    }

    fn evict(&mut self) -> Option<K> {
        S3Tier::ALL
            .iter()
            .find_map(|tier| self.queue.pop_front(tier.segment()))
    }

    fn peek_victim(&self) -> Option<&K> {
        S3Tier::ALL
            .iter()
            .find_map(|tier| self.queue.front(tier.segment()))
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
