//! Recorder and snapshot traits.
//!
//! ```text
//!   ResultCache ──record_*──► MetricsRecorder (CacheCounters)
//!        │
//!        └──snapshot()──► MetricsSnapshotProvider<CacheReport<K>>
//! ```

/// Counters written by a cache as it serves requests.
pub trait MetricsRecorder {
    /// A `get` found its key.
    fn record_hit(&mut self);
    /// A `get` did not find its key.
    fn record_miss(&mut self);
    /// A `put` admitted a new key.
    fn record_insert(&mut self);
    /// A `put` overwrote a resident key.
    fn record_update(&mut self);
    /// An entry was evicted to make room.
    fn record_eviction(&mut self);
    /// Zeroes every counter.
    fn reset(&mut self);
}

/// Produces an owned snapshot for tests, benches and reports.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
