use std::fmt;
use std::time::{Duration, Instant};

use crate::builder::{CacheBuilder, DynResultCache, PolicyKind};
use crate::error::ConfigError;
use crate::metrics::CacheReport;
use crate::service::config::ServiceConfig;
use crate::service::pipeline::{QueryPipeline, ResultSource};

/// Fixed benchmark workload: five distinct queries, the first two repeated.
pub const BENCHMARK_QUERIES: [&str; 7] = [
    "SELECT * FROM employees",
    "SELECT * FROM orders WHERE order_id = 100",
    "SELECT name FROM customers WHERE city = 'New York'",
    "SELECT * FROM orders",
    "SELECT COUNT(*) FROM sales",
    "SELECT * FROM employees",
    "SELECT * FROM orders WHERE order_id = 100",
];

/// Result of [`QueryService::process_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub result: String,
    /// `true` if the result came from the cache.
    pub cache_hit: bool,
}

/// Summary of one [`QueryService::run_workload`] pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    pub policy: &'static str,
    pub queries: usize,
    pub hits: u64,
    pub misses: u64,
    pub elapsed: Duration,
}

impl BenchmarkReport {
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BenchmarkReport {{ policy: {}, queries: {}, hits: {}, misses: {}, hit_rate: {:.2}%, \
             elapsed: {:.3}s }}",
            self.policy,
            self.queries,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Query front end owning the active result cache.
///
/// Lookups are keyed by the raw query text. On a miss the [`ResultSource`]
/// computes the result exactly once and it is stored; on a hit the source is
/// not consulted.
///
/// # Example
///
/// ```
/// use querycache::service::{QueryService, ServiceConfig};
///
/// let mut calls = 0;
/// let source = |q: &str| {
///     calls += 1;
///     format!("rows for {q}")
/// };
/// let mut service = QueryService::with_source(ServiceConfig::instant(), source).unwrap();
///
/// assert!(!service.process_query("SELECT 1").cache_hit);
/// assert!(service.process_query("SELECT 1").cache_hit);
///
/// service.set_policy("tinyflu", 3).unwrap();
/// assert_eq!(service.report().size, 0);
/// ```
#[derive(Debug)]
pub struct QueryService<S = QueryPipeline> {
    cache: DynResultCache<String, String>,
    source: S,
}

impl QueryService<QueryPipeline> {
    /// Service with the default pipeline.
    ///
    /// # Panics
    ///
    /// Panics if `config` is invalid. See [`try_new`](Self::try_new).
    pub fn new(config: ServiceConfig) -> Self {
        match Self::try_new(config) {
            Ok(service) => service,
            Err(e) => panic!("{}", e),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails [`ServiceConfig::validate`].
    pub fn try_new(config: ServiceConfig) -> Result<Self, ConfigError> {
        let pipeline = QueryPipeline::new(&config);
        Self::with_source(config, pipeline)
    }
}

impl<S> QueryService<S>
where
    S: ResultSource,
{
    /// Service computing misses with `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails [`ServiceConfig::validate`].
    pub fn with_source(config: ServiceConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = CacheBuilder::new(config.capacity).try_build(config.policy)?;
        Ok(Self { cache, source })
    }

    /// Cached result for `key`, counting a hit or a miss.
    pub fn lookup(&mut self, key: &str) -> Option<String> {
        self.cache.get(&key.to_string()).cloned()
    }

    /// Caches `value` under `key`.
    pub fn store(&mut self, key: &str, value: String) {
        self.cache.put(key.to_string(), value);
    }

    /// Replaces the active cache with an empty one using `name`'s policy.
    ///
    /// `name` is trimmed and matched case-insensitively; an unknown name
    /// selects [`PolicyKind::Lirs`]. Entries and counters are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero. The current cache is
    /// kept in that case.
    pub fn set_policy(&mut self, name: &str, capacity: usize) -> Result<PolicyKind, ConfigError> {
        let kind = PolicyKind::parse_lenient(name);
        let cache = CacheBuilder::new(capacity).try_build(kind)?;
        tracing::info!(
            from = self.cache.policy_name(),
            to = kind.as_str(),
            capacity,
            discarded = self.cache.len(),
            "switching cache policy"
        );
        self.cache = cache;
        Ok(kind)
    }

    /// Serves `query` from the cache, computing and storing it on a miss.
    pub fn process_query(&mut self, query: &str) -> QueryOutcome {
        if let Some(result) = self.lookup(query) {
            tracing::debug!(query, "served from cache");
            return QueryOutcome {
                result,
                cache_hit: true,
            };
        }

        let result = self.source.compute_result(query);
        self.store(query, result.clone());
        QueryOutcome {
            result,
            cache_hit: false,
        }
    }

    /// Counters, size and resident queries of the active cache.
    pub fn report(&self) -> CacheReport<String> {
        self.cache.report()
    }

    /// Runs [`BENCHMARK_QUERIES`] through [`process_query`](Self::process_query).
    pub fn run_benchmark(&mut self) -> BenchmarkReport {
        self.run_workload(&BENCHMARK_QUERIES)
    }

    /// Runs `queries` in order and summarises hits, misses and wall time.
    pub fn run_workload(&mut self, queries: &[&str]) -> BenchmarkReport {
        let start = Instant::now();
        let mut hits = 0;
        for query in queries {
            if self.process_query(query).cache_hit {
                hits += 1;
            }
        }
        let report = BenchmarkReport {
            policy: self.cache.policy_name(),
            queries: queries.len(),
            hits,
            misses: queries.len() as u64 - hits,
            elapsed: start.elapsed(),
        };
        tracing::info!(%report, "workload finished");
        report
    }

    pub fn cache(&self) -> &DynResultCache<String, String> {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
