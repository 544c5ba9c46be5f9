//! Errors reported by agent runtimes.

use super::AgentLifecycleError;
use crate::capability::domain::Capability;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failures returned through the agent runtime contract.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// The contract was called out of order.
    #[error(transparent)]
    Lifecycle(#[from] AgentLifecycleError),

    /// The agent was invoked for a capability it does not offer.
    #[error("agent does not offer capability {0}")]
    UnsupportedCapability(Capability),

    /// Configuration passed to `initialize` was rejected.
    #[error("invalid agent configuration: {0}")]
    Configuration(String),

    /// `stop` did not complete within its timeout.
    #[error("agent did not stop within {0:?}")]
    StopTimedOut(Duration),

    /// Implementation-specific failure.
    #[error("agent runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentError {
    /// Wraps an implementation-specific error.
    #[must_use]
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
