use std::fmt;

use crate::metrics::metrics_impl::CacheCounters;

/// Point-in-time view of a cache: counters, occupancy and resident keys.
///
/// `keys` follows the store's enumeration order, which carries no meaning
/// and may differ between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheReport<K> {
    /// Name of the eviction policy.
    pub policy: &'static str,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// New keys admitted.
    pub inserts: u64,
    /// Overwrites of resident keys.
    pub updates: u64,
    pub evictions: u64,
    /// Resident entries at snapshot time.
    pub size: usize,
    pub keys: Vec<K>,
}

impl<K> CacheReport<K> {
    pub(crate) fn new(
        policy: &'static str,
        capacity: usize,
        counters: &CacheCounters,
        keys: Vec<K>,
    ) -> Self {
        Self {
            policy,
            capacity,
            hits: counters.hits,
            misses: counters.misses,
            inserts: counters.inserts,
            updates: counters.updates,
            evictions: counters.evictions,
            size: keys.len(),
            keys,
        }
    }

    /// Fraction of lookups that hit, in `[0.0, 1.0]`.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

impl<K> fmt::Display for CacheReport<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheReport {{ policy: {}, size: {}/{}, hits: {}, misses: {}, hit_rate: {:.2}%, \
             inserts: {}, updates: {}, evictions: {} }}",
            self.policy,
            self.size,
            self.capacity,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.inserts,
            self.updates,
            self.evictions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_tracks_keys() {
        let counters = CacheCounters {
            hits: 2,
            misses: 6,
            ..CacheCounters::default()
        };
        let report = CacheReport::new("lirs", 5, &counters, vec!["a", "b"]);
        assert_eq!(report.size, 2);
        assert_eq!(report.hit_rate(), 0.25);
    }

    #[test]
    fn display_includes_hit_rate() {
        let counters = CacheCounters {
            hits: 1,
            misses: 1,
            ..CacheCounters::default()
        };
        let report = CacheReport::new("tinyflu", 5, &counters, vec![1u32]);
        let text = report.to_string();
        assert!(text.contains("policy: tinyflu"));
        assert!(text.contains("size: 1/5"));
        assert!(text.contains("hit_rate: 50.00%"));
    }
}
