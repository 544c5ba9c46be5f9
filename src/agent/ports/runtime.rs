//! The runtime contract every agent implementation satisfies.

use crate::agent::domain::{AgentConfig, AgentError, HealthStatus, Invocation};
use crate::registry::domain::DescriptorFragment;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Result type for agent runtime operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Lifecycle and introspection contract for agents.
///
/// Implementations do not need to police call order themselves; wrap them
/// in [`ManagedAgent`](crate::agent::services::ManagedAgent) to get
/// lifecycle enforcement.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Prepares the agent with its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Configuration`] when the configuration is
    /// unusable, or an implementation error.
    async fn initialize(&self, config: &AgentConfig) -> AgentResult<()>;

    /// Starts serving.
    ///
    /// # Errors
    ///
    /// Returns an implementation error when the agent cannot start.
    async fn start(&self) -> AgentResult<()>;

    /// Stops serving, finishing within `timeout` where possible.
    ///
    /// # Errors
    ///
    /// Returns an implementation error when shutdown fails.
    async fn stop(&self, timeout: Duration) -> AgentResult<()>;

    /// Reports current health.
    async fn health(&self) -> HealthStatus;

    /// Declares display name, capabilities, endpoint and metadata.
    ///
    /// The registry assigns identity and status; they are not part of the
    /// fragment.
    fn describe(&self) -> DescriptorFragment;

    /// Handles a request addressed to one of the declared capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnsupportedCapability`] or an implementation
    /// error.
    async fn invoke(&self, invocation: Invocation) -> AgentResult<Value>;
}
