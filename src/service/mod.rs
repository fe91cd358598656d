//! Query front end.
//!
//! [`QueryService`] owns the active result cache and a [`ResultSource`] used
//! on misses. The default source is [`QueryPipeline`], a logging-only
//! stand-in for parsing, planning and execution.
//!
//! ```text
//!   process_query(q)
//!        │
//!        ▼
//!   cache.get(q) ── hit ──► QueryOutcome { cache_hit: true }
//!        │
//!       miss
//!        ▼
//!   source.compute_result(q) ──► cache.put(q, result) ──► QueryOutcome { cache_hit: false }
//! ```

pub mod config;
pub mod orchestrator;
pub mod pipeline;

pub use config::ServiceConfig;
pub use orchestrator::{BENCHMARK_QUERIES, BenchmarkReport, QueryOutcome, QueryService};
pub use pipeline::{
    ExecutionEngine, LockGuard, LockManager, QueryOptimizer, QueryParser, QueryPipeline,
    ResultSource, Transaction, TransactionManager,
};
