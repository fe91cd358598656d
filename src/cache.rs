//! Capacity-bounded result cache over a pluggable eviction policy.
//!
//! [`ResultCache`] owns a key/value store, an [`EvictionPolicy`] tracking
//! the same keys, and the hit/miss counters. The store is the source of
//! truth for values; the policy only decides order.
//!
//! ## Request Flow
//!
//! ```text
//!   get(k) ──► store hit?  ── yes ──► hits += 1, policy.promote(k), Some(v)
//!                 │
//!                 no ───────────────► misses += 1, None      (policy untouched)
//!
//!   put(k, v) ──► resident? ── yes ──► overwrite, policy.promote(k), Some(old)
//!                    │
//!                    no ──► full? ── yes ──► evict() once
//!                                   │
//!                                   ▼
//!                           store.insert(k, v), policy.admit(k), None
//! ```
//!
//! ## Invariants
//!
//! - `len() <= capacity()` after every `put`.
//! - The policy tracks exactly the keys in the store.
//! - `evict()` only ever removes a resident key.
//!
//! ## Thread Safety
//!
//! - [`ResultCache`]: single-threaded; mutations take `&mut self`.
//! - [`ConcurrentResultCache`]: shares one cache behind a `parking_lot`
//!   mutex (feature `concurrency`). `get` mutates policy state, so reads take
//!   the same exclusive lock as writes.
//!
//! ## Example Usage
//!
//! ```
//! use querycache::cache::ResultCache;
//! use querycache::policy::tiny_flu::TinyFluPolicy;
//!
//! let mut cache = ResultCache::new(2, TinyFluPolicy::new());
//! cache.put("A", "a");
//! cache.put("B", "b");
//! assert_eq!(cache.get(&"A"), Some(&"a"));
//!
//! cache.put("C", "c");
//! assert!(!cache.contains(&"B"));
//! assert_eq!(cache.get(&"B"), None);
//!
//! let report = cache.report();
//! assert_eq!((report.hits, report.misses, report.size), (1, 1, 2));
//! ```

use std::fmt::Debug;
use std::hash::Hash;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::ConfigError;
use crate::metrics::{CacheCounters, CacheReport, MetricsRecorder, MetricsSnapshotProvider};
#[cfg(feature = "concurrency")]
use crate::traits::ConcurrentCache;
use crate::traits::{CoreCache, EvictionPolicy};

/// Key/value store fronted by an eviction policy.
#[derive(Debug)]
pub struct ResultCache<K, V, P> {
    store: FxHashMap<K, V>,
    policy: P,
    capacity: usize,
    counters: CacheCounters,
}

impl<K, V, P> ResultCache<K, V, P>
where
    K: Clone + Eq + Hash + Debug,
    P: EvictionPolicy<K>,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize, policy: P) -> Self {
        match Self::try_new(capacity, policy) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates an empty cache, returning an error for a zero capacity.
    ///
    /// Any keys the policy already tracks are forgotten so that it starts in
    /// step with the empty store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize, mut policy: P) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        policy.clear();
        Ok(Self {
            store: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            policy,
            capacity,
            counters: CacheCounters::default(),
        })
    }

    /// Looks up `key`, counting a hit or a miss.
    ///
    /// A hit promotes the key in the policy. A miss leaves policy state
    /// untouched.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.store.get(key) {
            Some(value) => {
                self.counters.record_hit();
                self.policy.promote(key);
                tracing::trace!(policy = self.policy.name(), ?key, "cache hit");
                Some(value)
            },
            None => {
                self.counters.record_miss();
                tracing::trace!(policy = self.policy.name(), ?key, "cache miss");
                None
            },
        }
    }

    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// Overwriting promotes the key and leaves the size unchanged. A new key
    /// arriving at a full cache evicts exactly one entry first.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.store.get_mut(&key) {
            let previous = std::mem::replace(slot, value);
            self.counters.record_update();
            self.policy.promote(&key);
            return Some(previous);
        }

        if self.store.len() >= self.capacity {
            self.evict();
        }

        tracing::trace!(policy = self.policy.name(), ?key, "admitting");
        self.store.insert(key.clone(), value);
        self.policy.admit(key);
        self.counters.record_insert();
        None
    }

    /// Removes one entry and returns it; `None` if the cache is empty.
    ///
    /// The victim is the policy's choice. If the policy has no candidate, or
    /// names a key the store does not hold, an arbitrary resident key goes
    /// instead so that a `put` never grows the store past capacity.
    pub fn evict(&mut self) -> Option<(K, V)> {
        match self.policy.evict() {
            Some(victim) => {
                if let Some(value) = self.store.remove(&victim) {
                    return Some(self.record_eviction(victim, value));
                }
                tracing::warn!(
                    policy = self.policy.name(),
                    key = ?victim,
                    "policy victim is not resident, evicting arbitrary resident key"
                );
            },
            None if !self.store.is_empty() => {
                tracing::warn!(
                    policy = self.policy.name(),
                    "policy offered no victim, evicting arbitrary resident key"
                );
            },
            None => return None,
        }

        let key = self.store.keys().next()?.clone();
        let value = self.store.remove(&key)?;
        Some(self.record_eviction(key, value))
    }

    fn record_eviction(&mut self, key: K, value: V) -> (K, V) {
        self.counters.record_eviction();
        tracing::debug!(policy = self.policy.name(), ?key, "evicted");
        (key, value)
    }

    /// Value for `key` without touching counters or policy state.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.store.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The eviction policy, for tier inspection.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn counters(&self) -> &CacheCounters {
        &self.counters
    }

    /// Resident keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.store.keys()
    }

    /// Drops every entry and all policy state. Counters are kept.
    pub fn clear(&mut self) {
        self.store.clear();
        self.policy.clear();
    }

    /// Drops every entry, all policy state and the counters.
    pub fn reset(&mut self) {
        self.clear();
        self.counters.reset();
    }

    /// Snapshot of counters, size and resident keys.
    pub fn report(&self) -> CacheReport<K> {
        CacheReport::new(
            self.policy.name(),
            self.capacity,
            &self.counters,
            self.store.keys().cloned().collect(),
        )
    }

    /// Same as [`report`](Self::report).
    pub fn stats(&self) -> CacheReport<K> {
        self.report()
    }

    /// Validates capacity and store/policy membership (debug-only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError> {
        use crate::error::InvariantError;

        if self.store.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "store holds {} entries, capacity is {}",
                self.store.len(),
                self.capacity
            )));
        }
        if self.policy.len() != self.store.len() {
            return Err(InvariantError::new(format!(
                "store has {} keys, policy tracks {}",
                self.store.len(),
                self.policy.len()
            )));
        }
        if let Some(key) = self.store.keys().find(|k| !self.policy.contains(k)) {
            return Err(InvariantError::new(format!(
                "key {key:?} is stored but not tracked by {}",
                self.policy.name()
            )));
        }
        Ok(())
    }
}

impl<K, V, P> CoreCache<K, V> for ResultCache<K, V, P>
where
    K: Clone + Eq + Hash + Debug,
    P: EvictionPolicy<K>,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.put(key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        ResultCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        ResultCache::contains(self, key)
    }

    fn len(&self) -> usize {
        ResultCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        ResultCache::clear(self);
    }
}

impl<K, V, P> MetricsSnapshotProvider<CacheReport<K>> for ResultCache<K, V, P>
where
    K: Clone + Eq + Hash + Debug,
    P: EvictionPolicy<K>,
{
    fn snapshot(&self) -> CacheReport<K> {
        self.report()
    }
}

// ---------------------------------------------------------------------------
// Concurrent wrapper
// ---------------------------------------------------------------------------

/// Thread-safe handle to a shared [`ResultCache`].
///
/// Every operation takes one mutex, so the store and the policy are always
/// updated together. Clones share the same cache.
///
/// # Example
///
/// ```
/// use querycache::cache::{ConcurrentResultCache, ResultCache};
/// use querycache::policy::s3_fifo::S3FifoPolicy;
///
/// let cache = ConcurrentResultCache::new(ResultCache::new(5, S3FifoPolicy::new()));
/// let handle = cache.clone();
///
/// std::thread::spawn(move || {
///     handle.put("select 1".to_string(), "one".to_string());
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(cache.get(&"select 1".to_string()), Some("one".to_string()));
/// ```
#[cfg(feature = "concurrency")]
#[derive(Debug)]
pub struct ConcurrentResultCache<K, V, P> {
    inner: Arc<Mutex<ResultCache<K, V, P>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V, P> Clone for ConcurrentResultCache<K, V, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, P> ConcurrentResultCache<K, V, P>
where
    K: Clone + Eq + Hash + Debug,
    P: EvictionPolicy<K>,
{
    pub fn new(cache: ResultCache<K, V, P>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Looks up `key` and clones the value out of the lock.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.inner.lock().put(key, value)
    }

    pub fn evict(&self) -> Option<(K, V)> {
        self.inner.lock().evict()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn report(&self) -> CacheReport<K> {
        self.inner.lock().report()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    /// Swaps in `cache` under the lock and returns the previous one.
    ///
    /// No operation observes a half-replaced cache.
    pub fn replace(&self, cache: ResultCache<K, V, P>) -> ResultCache<K, V, P> {
        std::mem::replace(&mut *self.inner.lock(), cache)
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with_cache<R>(&self, f: impl FnOnce(&mut ResultCache<K, V, P>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(feature = "concurrency")]
impl<K, V, P> ConcurrentCache for ConcurrentResultCache<K, V, P>
where
    K: Send,
    V: Send,
    P: Send,
{
}
