pub use crate::builder::{CacheBuilder, DynPolicy, DynResultCache, PolicyKind};
#[cfg(feature = "concurrency")]
pub use crate::cache::ConcurrentResultCache;
pub use crate::cache::ResultCache;
pub use crate::ds::{SegmentedQueue, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::metrics::{CacheCounters, CacheReport, MetricsRecorder, MetricsSnapshotProvider};
pub use crate::policy::{LirsPolicy, LirsTier, S3FifoPolicy, S3Tier, TinyFluPolicy};
pub use crate::service::{
    BENCHMARK_QUERIES, BenchmarkReport, QueryOutcome, QueryService, ResultSource, ServiceConfig,
};
#[cfg(feature = "concurrency")]
pub use crate::traits::ConcurrentCache;
pub use crate::traits::{CoreCache, EvictionPolicy};
