//! Query service configuration.

use std::time::Duration;

use crate::builder::PolicyKind;
use crate::error::ConfigError;

/// Configuration for a [`QueryService`](crate::service::QueryService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Maximum number of cached results.
    pub capacity: usize,
    /// Eviction policy of the initial cache.
    pub policy: PolicyKind,
    /// Fixed part of the simulated execution time.
    pub execution_delay: Duration,
    /// Upper bound (exclusive) of the random extra execution time.
    pub execution_jitter: Duration,
    /// Resource name taken by the lock manager around execution.
    pub lock_resource: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            policy: PolicyKind::Lirs,
            execution_delay: Duration::from_millis(150),
            execution_jitter: Duration::from_millis(150),
            lock_resource: "table".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Defaults with no simulated execution time, for tests and benches.
    pub fn instant() -> Self {
        Self {
            execution_delay: Duration::ZERO,
            execution_jitter: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the fixed and random parts of the simulated execution time.
    pub fn with_execution_delay(mut self, delay: Duration, jitter: Duration) -> Self {
        self.execution_delay = delay;
        self.execution_jitter = jitter;
        self
    }

    pub fn with_lock_resource(mut self, resource: impl Into<String>) -> Self {
        self.lock_resource = resource.into();
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero or `lock_resource` is
    /// blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        if self.lock_resource.trim().is_empty() {
            return Err(ConfigError::new("lock resource name must not be empty"));
        }
        Ok(())
    }
}
