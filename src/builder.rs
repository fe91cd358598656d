//! Runtime policy selection.
//!
//! [`PolicyKind`] names a policy, [`DynPolicy`] dispatches to the chosen
//! one, and [`CacheBuilder`] assembles a [`ResultCache`] around it. This is
//! how a strategy picked by name at runtime ends up behind one concrete
//! cache type.
//!
//! ## Example
//!
//! ```rust
//! use querycache::builder::{CacheBuilder, PolicyKind};
//!
//! let kind = PolicyKind::parse_lenient("  S3-FIFO ");
//! assert_eq!(kind, PolicyKind::S3Fifo);
//!
//! let mut cache = CacheBuilder::new(5).build::<String, String>(kind);
//! cache.put("select 1".to_string(), "one".to_string());
//! assert_eq!(cache.policy_name(), "s3fifo");
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::cache::ResultCache;
use crate::error::ConfigError;
use crate::policy::lirs::LirsPolicy;
use crate::policy::s3_fifo::S3FifoPolicy;
use crate::policy::tiny_flu::TinyFluPolicy;
use crate::traits::EvictionPolicy;

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolicyKind {
    /// Two-tier LIRS-like policy.
    #[default]
    Lirs,
    /// Single recency queue.
    TinyFlu,
    /// Three-tier segmented FIFO.
    S3Fifo,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Lirs, PolicyKind::TinyFlu, PolicyKind::S3Fifo];

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Lirs => "lirs",
            PolicyKind::TinyFlu => "tinyflu",
            PolicyKind::S3Fifo => "s3fifo",
        }
    }

    /// Parses a policy name, falling back to [`PolicyKind::Lirs`].
    ///
    /// Surrounding whitespace and case are ignored. An unrecognised name is
    /// logged as a warning rather than rejected.
    pub fn parse_lenient(name: &str) -> Self {
        match name.parse() {
            Ok(kind) => kind,
            Err(err) => {
                tracing::warn!(%err, fallback = PolicyKind::Lirs.as_str(), "unknown policy name");
                PolicyKind::Lirs
            },
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    /// Strict parse: `lirs`, `tinyflu`, `s3fifo` or `s3-fifo`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lirs" => Ok(PolicyKind::Lirs),
            "tinyflu" => Ok(PolicyKind::TinyFlu),
            "s3fifo" | "s3-fifo" => Ok(PolicyKind::S3Fifo),
            _ => Err(ConfigError::new(format!(
                "unknown cache policy {:?} (expected lirs, tinyflu or s3fifo)",
                s.trim()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// DynPolicy
// ---------------------------------------------------------------------------

/// One of the three policies, chosen at runtime.
#[derive(Debug)]
pub enum DynPolicy<K> {
    Lirs(LirsPolicy<K>),
    TinyFlu(TinyFluPolicy<K>),
    S3Fifo(S3FifoPolicy<K>),
}

impl<K> DynPolicy<K>
where
    K: Clone + Eq + Hash,
{
    /// Empty policy of `kind` sized for `capacity` keys.
    pub fn new(kind: PolicyKind, capacity: usize) -> Self {
        match kind {
            PolicyKind::Lirs => DynPolicy::Lirs(LirsPolicy::with_capacity(capacity)),
            PolicyKind::TinyFlu => DynPolicy::TinyFlu(TinyFluPolicy::with_capacity(capacity)),
            PolicyKind::S3Fifo => DynPolicy::S3Fifo(S3FifoPolicy::with_capacity(capacity)),
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            DynPolicy::Lirs(_) => PolicyKind::Lirs,
            DynPolicy::TinyFlu(_) => PolicyKind::TinyFlu,
            DynPolicy::S3Fifo(_) => PolicyKind::S3Fifo,
        }
    }

    pub fn as_lirs(&self) -> Option<&LirsPolicy<K>> {
        match self {
            DynPolicy::Lirs(policy) => Some(policy),
            _ => None,
        }
    }

    pub fn as_tiny_flu(&self) -> Option<&TinyFluPolicy<K>> {
        match self {
            DynPolicy::TinyFlu(policy) => Some(policy),
            _ => None,
        }
    }

    pub fn as_s3_fifo(&self) -> Option<&S3FifoPolicy<K>> {
        match self {
            DynPolicy::S3Fifo(policy) => Some(policy),
            _ => None,
        }
    }

    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError>
    where
        K: fmt::Debug,
    {
        match self {
            DynPolicy::Lirs(policy) => policy.check_invariants(),
            DynPolicy::TinyFlu(policy) => policy.check_invariants(),
            DynPolicy::S3Fifo(policy) => policy.check_invariants(),
        }
    }
}

impl<K> EvictionPolicy<K> for DynPolicy<K>
where
    K: Clone + Eq + Hash,
{
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    fn admit(&mut self, key: K) {
        match self {
            DynPolicy::Lirs(policy) => policy.admit(key),
            DynPolicy::TinyFlu(policy) => policy.admit(key),
            DynPolicy::S3Fifo(policy) => policy.admit(key),
        }
    }

    fn promote(&mut self, key: &K) -> bool {
        match self {
            DynPolicy::Lirs(policy) => policy.promote(key),
            DynPolicy::TinyFlu(policy) => policy.promote(key),
            DynPolicy::S3Fifo(policy) => policy.promote(key),
        }
    }

    fn evict(&mut self) -> Option<K> {
        match self {
            DynPolicy::Lirs(policy) => policy.evict(),
            DynPolicy::TinyFlu(policy) => policy.evict(),
            DynPolicy::S3Fifo(policy) => policy.evict(),
        }
    }

    fn peek_victim(&self) -> Option<&K> {
        match self {
            DynPolicy::Lirs(policy) => policy.peek_victim(),
            DynPolicy::TinyFlu(policy) => policy.peek_victim(),
            DynPolicy::S3Fifo(policy) => policy.peek_victim(),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match self {
            DynPolicy::Lirs(policy) => policy.contains(key),
            DynPolicy::TinyFlu(policy) => policy.contains(key),
            DynPolicy::S3Fifo(policy) => policy.contains(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            DynPolicy::Lirs(policy) => policy.len(),
            DynPolicy::TinyFlu(policy) => policy.len(),
            DynPolicy::S3Fifo(policy) => policy.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            DynPolicy::Lirs(policy) => policy.clear(),
            DynPolicy::TinyFlu(policy) => policy.clear(),
            DynPolicy::S3Fifo(policy) => policy.clear(),
        }
    }
}

/// Cache whose policy was chosen at runtime.
pub type DynResultCache<K, V> = ResultCache<K, V, DynPolicy<K>>;

// ---------------------------------------------------------------------------
// CacheBuilder
// ---------------------------------------------------------------------------

/// Builder for caches with a runtime-selected policy.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds an empty cache for `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero. See [`try_build`](Self::try_build).
    pub fn build<K, V>(self, kind: PolicyKind) -> DynResultCache<K, V>
    where
        K: Clone + Eq + Hash + fmt::Debug,
    {
        match self.try_build(kind) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds an empty cache for `kind`, returning an error for a zero capacity.
    pub fn try_build<K, V>(self, kind: PolicyKind) -> Result<DynResultCache<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash + fmt::Debug,
    {
        ResultCache::try_new(self.capacity, DynPolicy::new(kind, self.capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parsing {
        use super::*;

        #[test]
        fn strict_parse_accepts_known_names() {
            assert_eq!("lirs".parse::<PolicyKind>(), Ok(PolicyKind::Lirs));
            assert_eq!("TinyFLU".parse::<PolicyKind>(), Ok(PolicyKind::TinyFlu));
            assert_eq!(" s3fifo\n".parse::<PolicyKind>(), Ok(PolicyKind::S3Fifo));
            assert_eq!("S3-FIFO".parse::<PolicyKind>(), Ok(PolicyKind::S3Fifo));
        }

        #[test]
        fn strict_parse_rejects_unknown() {
            let err = "arc".parse::<PolicyKind>().unwrap_err();
            assert!(err.message().contains("arc"));
            assert!("".parse::<PolicyKind>().is_err());
        }

        #[test]
        fn lenient_parse_falls_back_to_lirs() {
            assert_eq!(PolicyKind::parse_lenient("clock"), PolicyKind::Lirs);
            assert_eq!(PolicyKind::parse_lenient(""), PolicyKind::Lirs);
            assert_eq!(PolicyKind::parse_lenient(" TINYFLU "), PolicyKind::TinyFlu);
        }

        #[test]
        fn display_round_trips() {
            for kind in PolicyKind::ALL {
                assert_eq!(kind.to_string().parse::<PolicyKind>(), Ok(kind));
            }
            assert_eq!(PolicyKind::default(), PolicyKind::Lirs);
        }
    }

    mod dispatch {
        use super::*;

        #[test]
        fn dyn_policy_matches_kind() {
            for kind in PolicyKind::ALL {
                let policy: DynPolicy<u32> = DynPolicy::new(kind, 4);
                assert_eq!(policy.kind(), kind);
                assert_eq!(policy.name(), kind.as_str());
            }
        }

        #[test]
        fn dyn_policy_forwards_operations() {
            let mut policy = DynPolicy::new(PolicyKind::Lirs, 4);
            policy.admit("a");
            policy.admit("b");
            policy.promote(&"b");
            assert!(policy.as_lirs().is_some_and(|p| p.is_high(&"b")));
            assert!(policy.as_tiny_flu().is_none());
            assert_eq!(policy.peek_victim(), Some(&"b"));
            assert_eq!(policy.evict(), Some("b"));
            assert_eq!(policy.len(), 1);
            policy.clear();
            assert!(policy.is_empty());
        }

        #[test]
        fn builder_builds_each_policy() {
            for kind in PolicyKind::ALL {
                let mut cache = CacheBuilder::new(2).build::<&str, u32>(kind);
                cache.put("a", 1);
                cache.put("b", 2);
                cache.put("c", 3);
                assert_eq!(cache.len(), 2);
                assert_eq!(cache.policy().kind(), kind);
                #[cfg(debug_assertions)]
                {
                    cache.check_invariants().unwrap();
                    cache.policy().check_invariants().unwrap();
                }
            }
        }

        #[test]
        fn builder_rejects_zero_capacity() {
            assert!(
                CacheBuilder::new(0)
                    .try_build::<u32, u32>(PolicyKind::S3Fifo)
                    .is_err()
            );
        }
    }
}
