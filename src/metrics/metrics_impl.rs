use crate::metrics::traits::MetricsRecorder;

/// Plain counters owned by a single cache instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub evictions: u64,
}

impl CacheCounters {
    /// Total `get` calls observed.
    #[inline]
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, in `[0.0, 1.0]`.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

impl MetricsRecorder for CacheCounters {
    #[inline]
    fn record_hit(&mut self) {
        self.hits += 1;
    }

    #[inline]
    fn record_miss(&mut self) {
        self.misses += 1;
    }

    #[inline]
    fn record_insert(&mut self) {
        self.inserts += 1;
    }

    #[inline]
    fn record_update(&mut self) {
        self.updates += 1;
    }

    #[inline]
    fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_of_fresh_counters_is_zero() {
        let counters = CacheCounters::default();
        assert_eq!(counters.lookups(), 0);
        assert_eq!(counters.hit_rate(), 0.0);
    }

    #[test]
    fn records_and_resets() {
        let mut counters = CacheCounters::default();
        counters.record_hit();
        counters.record_miss();
        counters.record_miss();
        counters.record_miss();
        counters.record_insert();
        counters.record_update();
        counters.record_eviction();
        assert_eq!(counters.lookups(), 4);
        assert_eq!(counters.hit_rate(), 0.25);
        assert_eq!((counters.inserts, counters.updates, counters.evictions), (1, 1, 1));

        counters.reset();
        assert_eq!(counters, CacheCounters::default());
    }
}
