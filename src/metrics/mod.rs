//! Hit/miss accounting for [`ResultCache`](crate::cache::ResultCache).
//!
//! Recording and reporting are split: [`CacheCounters`] is written on every
//! cache operation through [`MetricsRecorder`], and a [`CacheReport`] is an
//! owned snapshot taken on demand.

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::CacheCounters;
pub use snapshot::CacheReport;
pub use traits::{MetricsRecorder, MetricsSnapshotProvider};
