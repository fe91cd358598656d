//! Error types for querycache.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a cache or service is configured with
//!   invalid parameters (zero capacity, unknown policy name in strict parsing).
//! - [`InvariantError`]: Returned by debug-only `check_invariants` methods when
//!   the store and the policy's sequences disagree.
//!
//! Cache operations themselves never fail: `get`, `put` and `evict` are total
//! over any key and value. Only construction can be rejected.
//!
//! ## Example Usage
//!
//! ```
//! use querycache::cache::ResultCache;
//! use querycache::error::ConfigError;
//! use querycache::policy::tiny_flu::TinyFluPolicy;
//!
//! let cache: Result<ResultCache<String, String, TinyFluPolicy<String>>, ConfigError> =
//!     ResultCache::try_new(5, TinyFluPolicy::new());
//! assert!(cache.is_ok());
//!
//! let bad = ResultCache::<String, String, _>::try_new(0, TinyFluPolicy::new());
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache or service configuration is invalid.
///
/// Produced by fallible constructors such as
/// [`ResultCache::try_new`](crate::cache::ResultCache::try_new),
/// [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build) and
/// [`QueryService::set_policy`](crate::service::QueryService::set_policy).
///
/// # Example
///
/// ```
/// use querycache::builder::PolicyKind;
///
/// let err = "arc".parse::<PolicyKind>().unwrap_err();
/// assert!(err.to_string().contains("arc"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Error for a capacity of zero.
    pub(crate) fn zero_capacity() -> Self {
        Self::new("cache capacity must be greater than zero")
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by debug-only `check_invariants` methods, e.g.
/// [`ResultCache::check_invariants`](crate::cache::ResultCache::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("capacity must be > 0");
        assert_eq!(err.to_string(), "capacity must be > 0");
        assert_eq!(err.message(), "capacity must be > 0");
    }

    #[test]
    fn zero_capacity_mentions_capacity() {
        let err = ConfigError::zero_capacity();
        assert!(err.message().contains("capacity"));
    }

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("store has 3 keys, policy tracks 2");
        assert_eq!(err.to_string(), "store has 3 keys, policy tracks 2");
    }

    #[test]
    fn both_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConfigError>();
        assert_error::<InvariantError>();
    }
}
