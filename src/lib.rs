//! querycache: a capacity-bounded query result cache with pluggable
//! eviction policies.
//!
//! The cache core is [`cache::ResultCache`], a key/value store paired with
//! an [`traits::EvictionPolicy`]. Three policies are provided:
//!
//! - [`policy::lirs::LirsPolicy`]: low and high interference tiers.
//! - [`policy::tiny_flu::TinyFluPolicy`]: a single recency queue.
//! - [`policy::s3_fifo::S3FifoPolicy`]: short, medium and long FIFO tiers.
//!
//! [`service::QueryService`] puts a cache in front of a simulated query
//! pipeline and can swap policies at runtime by name.
//!
//! ```
//! use querycache::prelude::*;
//!
//! let mut cache = CacheBuilder::new(5).build::<String, String>(PolicyKind::TinyFlu);
//! cache.put("SELECT 1".into(), "one".into());
//! assert_eq!(cache.get(&"SELECT 1".to_string()).map(String::as_str), Some("one"));
//! ```

pub mod builder;
pub mod cache;
pub mod ds;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod service;
pub mod traits;
