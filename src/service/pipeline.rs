//! Miss-path query pipeline.
//!
//! Stand-ins for the parts of a database the result cache sits in front of.
//! None of them does real work: the parser lowercases, the optimizer wraps
//! the text in a label, the engine sleeps and makes up a result, and the
//! lock and transaction managers only log.
//!
//! ```text
//!   query ─► parse ─► optimize ─► lock(resource) ─► begin ─► execute ─► commit ─► unlock
//!                                     │                │                   │          │
//!                                  LockGuard       Transaction          (guard)    (drop)
//! ```

use std::thread;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::service::config::ServiceConfig;

/// Produces the result for a query the cache does not hold.
///
/// Called at most once per miss and never on a hit.
pub trait ResultSource {
    fn compute_result(&mut self, query: &str) -> String;
}

impl<F> ResultSource for F
where
    F: FnMut(&str) -> String,
{
    fn compute_result(&mut self, query: &str) -> String {
        self(query)
    }
}

// ---------------------------------------------------------------------------
// Parser / optimizer
// ---------------------------------------------------------------------------

/// Normalises query text.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryParser;

impl QueryParser {
    /// Lowercases the query.
    pub fn parse(&self, query: &str) -> String {
        query.to_lowercase()
    }
}

/// Turns normalised text into a plan label.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryOptimizer;

impl QueryOptimizer {
    pub fn optimize(&self, parsed: &str) -> String {
        format!("OptimizedPlan({parsed})")
    }
}

// ---------------------------------------------------------------------------
// Execution engine
// ---------------------------------------------------------------------------

/// Fabricates a result after a simulated execution time.
#[derive(Debug)]
pub struct ExecutionEngine {
    delay: Duration,
    jitter: Duration,
    rng: SmallRng,
}

impl ExecutionEngine {
    /// Engine sleeping `delay` plus a uniform draw from `[0, jitter)`.
    pub fn new(delay: Duration, jitter: Duration) -> Self {
        Self {
            delay,
            jitter,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Same as [`new`](Self::new) with a fixed RNG seed.
    pub fn with_seed(delay: Duration, jitter: Duration, seed: u64) -> Self {
        Self {
            delay,
            jitter,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Draws the time the next execution will take.
    pub fn next_delay(&mut self) -> Duration {
        let jitter_nanos = u64::try_from(self.jitter.as_nanos()).unwrap_or(u64::MAX);
        if jitter_nanos == 0 {
            return self.delay;
        }
        self.delay
            .saturating_add(Duration::from_nanos(self.rng.random_range(0..jitter_nanos)))
    }

    /// Runs `plan`, returning `"Result for <plan>"`.
    pub fn execute(&mut self, plan: &str) -> String {
        let delay = self.next_delay();
        tracing::debug!(plan, ?delay, "executing");
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        format!("Result for {plan}")
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Hands out numbered transactions.
#[derive(Debug, Default)]
pub struct TransactionManager {
    next_id: u64,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Transaction {
        self.next_id += 1;
        tracing::info!(txn = self.next_id, "transaction started");
        Transaction {
            id: self.next_id,
            finished: false,
        }
    }
}

/// An open transaction. Dropping it without [`commit`](Self::commit) rolls
/// it back.
#[derive(Debug)]
#[must_use = "dropping a transaction rolls it back"]
pub struct Transaction {
    id: u64,
    finished: bool,
}

impl Transaction {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn commit(mut self) {
        self.finished = true;
        tracing::info!(txn = self.id, "transaction committed");
    }

    pub fn rollback(mut self) {
        self.finished = true;
        tracing::info!(txn = self.id, "transaction rolled back");
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.finished {
            tracing::info!(txn = self.id, "transaction rolled back");
        }
    }
}

// ---------------------------------------------------------------------------
// Locks
// ---------------------------------------------------------------------------

/// Issues logging-only lock guards. No mutual exclusion is enforced.
#[derive(Debug, Default, Clone, Copy)]
pub struct LockManager;

impl LockManager {
    pub fn acquire(&self, resource: &str) -> LockGuard {
        tracing::info!(resource, "lock acquired");
        LockGuard {
            resource: resource.to_string(),
        }
    }
}

/// Held lock on a named resource; released on drop.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard {
    resource: String,
}

impl LockGuard {
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        tracing::info!(resource = %self.resource, "lock released");
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Default [`ResultSource`]: parse, optimize, then execute under a lock and
/// a transaction.
#[derive(Debug)]
pub struct QueryPipeline {
    parser: QueryParser,
    optimizer: QueryOptimizer,
    engine: ExecutionEngine,
    transactions: TransactionManager,
    locks: LockManager,
    lock_resource: String,
}

impl QueryPipeline {
    pub fn new(config: &ServiceConfig) -> Self {
        Self::with_engine(
            config,
            ExecutionEngine::new(config.execution_delay, config.execution_jitter),
        )
    }

    /// Pipeline around a caller-provided engine, e.g. one with a fixed seed.
    pub fn with_engine(config: &ServiceConfig, engine: ExecutionEngine) -> Self {
        Self {
            parser: QueryParser,
            optimizer: QueryOptimizer,
            engine,
            transactions: TransactionManager::new(),
            locks: LockManager,
            lock_resource: config.lock_resource.clone(),
        }
    }
}

impl ResultSource for QueryPipeline {
    fn compute_result(&mut self, query: &str) -> String {
        let parsed = self.parser.parse(query);
        let plan = self.optimizer.optimize(&parsed);

        let _lock = self.locks.acquire(&self.lock_resource);
        let txn = self.transactions.begin();
        let result = self.engine.execute(&plan);
        txn.commit();
        result
    }
}
