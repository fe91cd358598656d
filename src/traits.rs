//! # Cache and Policy Traits
//!
//! Two seams split the cache subsystem:
//!
//! - [`EvictionPolicy`]: bookkeeping over keys only. A policy decides where a
//!   new key is admitted, how a reused key is promoted and which key is the
//!   next victim. It never sees values.
//! - [`CoreCache`]: the uniform get/put contract over keys and values, as
//!   implemented by [`ResultCache`](crate::cache::ResultCache).
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────┐
//!   │        ResultCache<K, V, P>           │  implements CoreCache<K, V>
//!   │                                       │
//!   │   store: FxHashMap<K, V>              │
//!   │   policy: P ───────────────┐          │
//!   │   counters: CacheCounters  │          │
//!   └────────────────────────────┼──────────┘
//!                                ▼
//!   ┌───────────────────────────────────────┐
//!   │        EvictionPolicy<K>              │
//!   │                                       │
//!   │  admit(K)          new key            │
//!   │  promote(&K)       hit or overwrite   │
//!   │  evict() → K       choose and forget  │
//!   └──────────────────┬────────────────────┘
//!          ┌───────────┼─────────────┐
//!          ▼           ▼             ▼
//!     LirsPolicy  TinyFluPolicy  S3FifoPolicy
//! ```
//!
//! ## Trait Summary
//!
//! | Trait             | Purpose                                       |
//! |-------------------|-----------------------------------------------|
//! | `EvictionPolicy`  | Admission, promotion, victim selection        |
//! | `CoreCache`       | Capacity-bounded key/value contract           |
//! | `ConcurrentCache` | Marker for thread-safe caches                 |

use std::hash::Hash;

/// Admission, promotion and victim selection over resident keys.
///
/// The cache owning the policy guarantees that `admit` is only called for a
/// key the policy does not track, and `promote` only for a key it does. The
/// set of keys tracked by a policy always equals the set of keys in the
/// owning store.
///
/// # Example
///
/// ```
/// use querycache::policy::tiny_flu::TinyFluPolicy;
/// use querycache::traits::EvictionPolicy;
///
/// let mut policy = TinyFluPolicy::new();
/// policy.admit("a");
/// policy.admit("b");
/// policy.promote(&"a");
///
/// assert_eq!(policy.evict(), Some("b"));
/// assert_eq!(policy.len(), 1);
/// ```
pub trait EvictionPolicy<K>
where
    K: Clone + Eq + Hash,
{
    /// Short policy name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Starts tracking a newly inserted key.
    fn admit(&mut self, key: K);

    /// Records a reuse of `key`. Returns `false` if the key is not tracked.
    fn promote(&mut self, key: &K) -> bool;

    /// Chooses the next victim, stops tracking it and returns it.
    ///
    /// Returns `None` only when no key is tracked.
    fn evict(&mut self) -> Option<K>;

    /// The key the next [`evict`](Self::evict) would return.
    fn peek_victim(&self) -> Option<&K>;

    fn contains(&self, key: &K) -> bool;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every tracked key.
    fn clear(&mut self);
}

/// Core cache operations.
///
/// # Example
///
/// ```
/// use querycache::cache::ResultCache;
/// use querycache::policy::lirs::LirsPolicy;
/// use querycache::traits::CoreCache;
///
/// fn warm<C: CoreCache<String, String>>(cache: &mut C, rows: &[(&str, &str)]) {
///     for (query, result) in rows {
///         cache.insert(query.to_string(), result.to_string());
///     }
/// }
///
/// let mut cache = ResultCache::new(5, LirsPolicy::new());
/// warm(&mut cache, &[("select 1", "one"), ("select 2", "two")]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// A new key inserted into a full cache evicts exactly one entry first.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a value by key, counting a hit or miss and promoting on hit.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without touching counters or policy state.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Marker trait for caches that are safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}
