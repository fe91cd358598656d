// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behaviour every policy must share when driven through `ResultCache`, plus
// the per-policy ordering rules that distinguish them.

use querycache::builder::{CacheBuilder, DynResultCache, PolicyKind};
use querycache::cache::ResultCache;
use querycache::policy::lirs::{LirsPolicy, LirsTier};
use querycache::policy::s3_fifo::{S3FifoPolicy, S3Tier};
use querycache::policy::tiny_flu::TinyFluPolicy;
use querycache::traits::EvictionPolicy;

fn cache(kind: PolicyKind, capacity: usize) -> DynResultCache<u32, u32> {
    CacheBuilder::new(capacity).build(kind)
}

// ==============================================
// Capacity-0 Behavior
// ==============================================

mod zero_capacity {
    use super::*;

    #[test]
    fn every_policy_rejects_zero_capacity() {
        for kind in PolicyKind::ALL {
            let err = CacheBuilder::new(0)
                .try_build::<u32, u32>(kind)
                .unwrap_err();
            assert!(err.message().contains("capacity"), "policy {kind}");
        }
    }
}

// ==============================================
// Scenarios
// ==============================================

mod scenarios {
    use super::*;

    #[test]
    fn recency_queue_keeps_touched_key() {
        let mut cache = ResultCache::new(2, TinyFluPolicy::new());
        cache.put("A", "a");
        cache.put("B", "b");
        assert_eq!(cache.get(&"A"), Some(&"a"));
        cache.put("C", "c");
        assert!(cache.contains(&"A"));
        assert!(cache.contains(&"C"));
        assert_eq!(cache.get(&"B"), None);
    }

    #[test]
    fn lirs_evicts_oldest_high_even_if_reused() {
        let mut cache = ResultCache::new(2, LirsPolicy::new());
        cache.put("A", "a");
        cache.put("B", "b");
        assert_eq!(cache.policy().low_len(), 2);
        assert_eq!(cache.get(&"A"), Some(&"a"));
        assert_eq!(cache.policy().tier_of(&"A"), Some(LirsTier::High));

        cache.put("C", "c");
        assert_eq!(cache.get(&"A"), None);
        assert_eq!(cache.get(&"B"), Some(&"b"));
        assert_eq!(cache.get(&"C"), Some(&"c"));
    }

    #[test]
    fn recency_queue_evicts_first_admitted() {
        let capacity = 4;
        let mut cache = ResultCache::new(capacity, TinyFluPolicy::new());
        for i in 0..=capacity as u32 {
            cache.put(i, i);
        }
        assert!(!cache.contains(&0));
        assert_eq!(cache.len(), capacity);
    }

    #[test]
    fn segmented_fifo_drains_short_in_admission_order() {
        let mut cache = ResultCache::new(3, S3FifoPolicy::new());
        for k in ["x", "y", "z"] {
            cache.put(k, ());
        }
        assert_eq!(cache.policy().short_len(), 3);
        assert_eq!(cache.evict().map(|(k, _)| k), Some("x"));
        assert_eq!(cache.evict().map(|(k, _)| k), Some("y"));
        assert_eq!(cache.evict().map(|(k, _)| k), Some("z"));
        assert_eq!(cache.evict(), None);
    }

    #[test]
    fn segmented_fifo_protects_twice_reused_key() {
        let hot = 1_000u32;
        let mut cache = ResultCache::new(3, S3FifoPolicy::new());
        cache.put(hot, 0);
        cache.get(&hot);
        cache.get(&hot);
        assert_eq!(cache.policy().tier_of(&hot), Some(S3Tier::Long));
        for i in 0..100u32 {
            cache.put(i, i);
        }
        assert!(cache.contains(&hot));
        assert_eq!(cache.counters().evictions, 98);
    }

    #[test]
    fn empty_cache_evict_is_noop_for_every_policy() {
        for kind in PolicyKind::ALL {
            let mut cache = cache(kind, 3);
            assert_eq!(cache.evict(), None);
            assert!(cache.is_empty());
        }
    }
}

// ==============================================
// LIRS promotion ordering
// ==============================================

mod lirs_promotion {
    use super::*;

    #[test]
    fn newly_promoted_key_outlives_existing_high_keys() {
        let mut policy = LirsPolicy::new();
        for k in 0..4u32 {
            policy.admit(k);
            policy.promote(&k);
        }
        policy.admit(10);
        policy.admit(11);
        policy.promote(&10);

        for expected in 0..4u32 {
            assert_eq!(policy.evict(), Some(expected));
            assert!(policy.is_high(&10));
        }
        assert_eq!(policy.evict(), Some(10));
        assert_eq!(policy.evict(), Some(11));
    }

    #[test]
    fn high_keys_never_return_to_low() {
        let mut policy = LirsPolicy::new();
        policy.admit("a");
        policy.promote(&"a");
        for k in ["b", "c", "d"] {
            policy.admit(k);
        }
        policy.promote(&"a");
        assert_eq!(policy.tier_of(&"a"), Some(LirsTier::High));
        assert_eq!(policy.high_len(), 1);
        assert_eq!(policy.low_len(), 3);
    }
}

// ==============================================
// Property tests
// ==============================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Put(u32, u32),
        Get(u32),
        Evict,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u32..16, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
            4 => (0u32..16).prop_map(Op::Get),
            1 => Just(Op::Evict),
        ]
    }

    fn kind_strategy() -> impl Strategy<Value = PolicyKind> {
        prop_oneof![
            Just(PolicyKind::Lirs),
            Just(PolicyKind::TinyFlu),
            Just(PolicyKind::S3Fifo),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Size never exceeds capacity and the policy tracks exactly the store.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_capacity_and_membership(
            kind in kind_strategy(),
            capacity in 1usize..8,
            ops in prop::collection::vec(op_strategy(), 0..300)
        ) {
            let mut cache = cache(kind, capacity);
            for op in ops {
                match op {
                    Op::Put(k, v) => { cache.put(k, v); },
                    Op::Get(k) => { cache.get(&k); },
                    Op::Evict => { cache.evict(); },
                }
                prop_assert!(cache.len() <= capacity);
                prop_assert_eq!(cache.policy().len(), cache.len());
                for key in cache.keys() {
                    prop_assert!(cache.policy().contains(key));
                }
                #[cfg(debug_assertions)]
                {
                    cache.check_invariants().unwrap();
                    cache.policy().check_invariants().unwrap();
                }
            }
        }

        /// hits + misses equals the number of gets, and get-after-put hits.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_hit_miss_accounting(
            kind in kind_strategy(),
            capacity in 1usize..8,
            ops in prop::collection::vec(op_strategy(), 0..300)
        ) {
            let mut cache = cache(kind, capacity);
            let mut gets = 0u64;
            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        cache.put(k, v);
                        let hits_before = cache.counters().hits;
                        prop_assert_eq!(cache.get(&k), Some(&v));
                        prop_assert_eq!(cache.counters().hits, hits_before + 1);
                        gets += 1;
                    },
                    Op::Get(k) => {
                        cache.get(&k);
                        gets += 1;
                    },
                    Op::Evict => { cache.evict(); },
                }
            }
            let report = cache.report();
            prop_assert_eq!(report.hits + report.misses, gets);
        }

        /// `evict` only removes resident keys and shrinks the store by one.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_no_phantom_evictions(
            kind in kind_strategy(),
            keys in prop::collection::vec(0u32..32, 0..40),
            touches in prop::collection::vec(0u32..32, 0..40)
        ) {
            let mut cache = cache(kind, 8);
            for k in keys {
                cache.put(k, k);
            }
            for k in touches {
                cache.get(&k);
            }
            while !cache.is_empty() {
                let before = cache.len();
                let expected = cache.policy().peek_victim().copied();
                let (victim, value) = cache.evict().unwrap();
                prop_assert_eq!(Some(victim), expected);
                prop_assert_eq!(victim, value);
                prop_assert!(!cache.contains(&victim));
                prop_assert_eq!(cache.len(), before - 1);
            }
            prop_assert_eq!(cache.evict(), None);
        }

        /// The recency queue behaves exactly like a reference LRU list.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_tiny_flu_matches_reference_lru(
            capacity in 1usize..6,
            ops in prop::collection::vec(op_strategy(), 0..200)
        ) {
            let mut cache = ResultCache::new(capacity, TinyFluPolicy::new());
            let mut order: Vec<u32> = Vec::new();
            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        if let Some(pos) = order.iter().position(|&x| x == k) {
                            order.remove(pos);
                        } else if order.len() == capacity {
                            order.remove(0);
                        }
                        order.push(k);
                        cache.put(k, v);
                    },
                    Op::Get(k) => {
                        if let Some(pos) = order.iter().position(|&x| x == k) {
                            order.remove(pos);
                            order.push(k);
                        }
                        cache.get(&k);
                    },
                    Op::Evict => {
                        let expected = if order.is_empty() { None } else { Some(order.remove(0)) };
                        prop_assert_eq!(cache.evict().map(|(k, _)| k), expected);
                    },
                }
                let actual: Vec<u32> = cache.policy().keys_in_order().copied().collect();
                prop_assert_eq!(&actual, &order);
            }
        }

        /// With only short-tier keys, eviction follows admission order.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_s3_fifo_short_tier_is_fifo(
            keys in prop::collection::hash_set(any::<u32>(), 1..32)
        ) {
            let keys: Vec<u32> = keys.into_iter().collect();
            let mut policy = S3FifoPolicy::new();
            for &k in &keys {
                policy.admit(k);
            }
            for &k in &keys {
                prop_assert_eq!(policy.evict(), Some(k));
            }
        }
    }
}
