//! LIRS-like two-tier policy.
//!
//! Splits resident keys into a *low-interference* tier (admitted, never
//! reused) and a *high-interference* tier (reused at least once). A single
//! reuse promotes a key to high for good; there is no demotion.
//!
//! ## Architecture
//!
//! ```text
//!   admit(k) ──► LOW:  front ─► [k1] ◄──► [k2] ◄──► [k] ◄── back
//!                         │
//!          promote(k1)    │  (first reuse)
//!                         ▼
//!                HIGH: front ─► [h1] ◄──► [h2] ◄──► [k1] ◄── back
//!                         ▲
//!          promote(h1)    │  (reuse in high: move to back)
//!
//!   evict(): front of HIGH if non-empty, else front of LOW
//! ```
//!
//! ## Victim Rule
//!
//! The oldest *high* key is evicted before any low key. This is not textbook
//! LIRS, which protects the high tier and evicts from the low tier; a
//! saturated high tier here gives up its oldest key first while one-shot
//! keys in the low tier wait.
//!
//! ## Example Usage
//!
//! ```
//! use querycache::policy::lirs::LirsPolicy;
//! use querycache::traits::EvictionPolicy;
//!
//! let mut policy = LirsPolicy::new();
//! policy.admit("a");
//! policy.admit("b");
//! policy.promote(&"a");
//!
//! assert!(policy.is_high(&"a"));
//! assert_eq!(policy.low_len(), 1);
//!
//! // The reused key is the victim: high is drained first.
//! assert_eq!(policy.evict(), Some("a"));
//! ```

use std::hash::Hash;

use crate::ds::{SegmentIter, SegmentedQueue};
use crate::traits::EvictionPolicy;

/// Tier of a key tracked by [`LirsPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LirsTier {
    /// Admitted, not yet reused.
    Low,
    /// Reused at least once.
    High,
}

impl LirsTier {
    #[inline]
    fn segment(self) -> usize {
        match self {
            LirsTier::Low => 0,
            LirsTier::High => 1,
        }
    }

    fn from_segment(segment: usize) -> Self {
        if segment == 0 {
            LirsTier::Low
        } else {
            LirsTier::High
        }
    }
}

/// Two-tier LIRS-like eviction policy.
#[derive(Debug)]
pub struct LirsPolicy<K> {
    queue: SegmentedQueue<K>,
}

impl<K> Default for LirsPolicy<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LirsPolicy<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a policy with room for `capacity` keys before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: SegmentedQueue::with_capacity(2, capacity),
        }
    }

    /// Number of keys in the high-interference tier.
    #[inline]
    pub fn high_len(&self) -> usize {
        self.queue.segment_len(LirsTier::High.segment())
    }

    /// Number of keys in the low-interference tier.
    #[inline]
    pub fn low_len(&self) -> usize {
        self.queue.segment_len(LirsTier::Low.segment())
    }

    /// Returns `true` if `key` has been reused since admission.
    pub fn is_high(&self, key: &K) -> bool {
        self.tier_of(key) == Some(LirsTier::High)
    }

    pub fn tier_of(&self, key: &K) -> Option<LirsTier> {
        self.queue.segment_of(key).map(LirsTier::from_segment)
    }

    /// Keys of `tier`, oldest first.
    pub fn keys_in_order(&self, tier: LirsTier) -> SegmentIter<'_, K> {
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

impl<K> EvictionPolicy<K> for LirsPolicy<K>
where
    K: Clone + Eq + Hash,
{
    fn name(&self) -> &'static str {
        "lirs"
    }

    fn admit(&mut self, key: K) {
        self.queue.push_back(LirsTier::Low.segment(), key);
    }

    fn promote(&mut self, key: &K) -> bool {
        match self.tier_of(key) {
            Some(LirsTier::Low) => {
                tracing::trace!(policy = "lirs", "low key reused, moving to high");
                self.queue.move_to_back(key, LirsTier::High.segment())
            },
            Some(LirsTier::High) => self.queue.move_to_back(key, LirsTier::High.segment()),
            None => false,
        }
    }

    fn evict(&mut self) -> Option<K> {
        self.queue
            .pop_front(LirsTier::High.segment())
            .or_else(|| self.queue.pop_front(LirsTier::Low.segment()))
    }

    fn peek_victim(&self) -> Option<&K> {
        self.queue
            .front(LirsTier::High.segment())
            .or_else(|| self.queue.front(LirsTier::Low.segment()))
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
