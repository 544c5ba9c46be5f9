//! In-process agent with a fixed declaration and a closure handler.

use crate::agent::domain::{AgentConfig, AgentHealthError, HealthStatus, Invocation};
use crate::agent::ports::{AgentResult, AgentRuntime};
use crate::registry::domain::{AgentManifest, DescriptorFragment, ManifestError};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Closure that serves invocations for a [`StaticAgent`].
pub type InvocationHandler = Arc<dyn Fn(&Invocation) -> AgentResult<Value> + Send + Sync>;

/// In-process agent whose declaration never changes.
///
/// Invocations go to a handler closure (echoing the payload by default).
/// Health can be flipped from outside, which makes the adapter suitable for
/// tests and for wrapping plain functions as agents. Clones share state.
#[derive(Clone)]
pub struct StaticAgent {
    fragment: DescriptorFragment,
    handler: InvocationHandler,
    stop_delay: Option<Duration>,
    state: Arc<RwLock<StaticAgentState>>,
}

#[derive(Debug, Default)]
struct StaticAgentState {
    config: Option<AgentConfig>,
    running: bool,
    unhealthy: Option<AgentHealthError>,
    invocations: u64,
}

impl StaticAgent {
    /// Creates an agent that echoes invocation payloads.
    #[must_use]
    pub fn new(fragment: DescriptorFragment) -> Self {
        Self {
            fragment,
            handler: Arc::new(|invocation: &Invocation| Ok(invocation.payload().clone())),
            stop_delay: None,
            state: Arc::new(RwLock::new(StaticAgentState::default())),
        }
    }

    /// Creates an echoing agent from a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the manifest is malformed.
    pub fn from_manifest(manifest: AgentManifest) -> Result<Self, ManifestError> {
        Ok(Self::new(manifest.into_fragment()?))
    }

    /// Replaces the invocation handler.
    #[must_use]
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Invocation) -> AgentResult<Value> + Send + Sync + 'static,
    {
        self.handler = Arc::new(handler);
        self
    }

    /// Makes `stop` take at least `delay`.
    #[must_use]
    pub const fn with_stop_delay(mut self, delay: Duration) -> Self {
        self.stop_delay = Some(delay);
        self
    }

    /// Reports `Unhealthy` with `reason` until [`Self::mark_healthy`].
    pub fn mark_unhealthy(&self, reason: impl Into<String>) {
        self.state.write().unhealthy = Some(AgentHealthError::new(reason));
    }

    /// Clears a previous [`Self::mark_unhealthy`].
    pub fn mark_healthy(&self) {
        self.state.write().unhealthy = None;
    }

    /// Returns whether the agent is between `start` and `stop`.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.read().running
    }

    /// Returns the configuration passed to `initialize`.
    #[must_use]
    pub fn config(&self) -> Option<AgentConfig> {
        self.state.read().config.clone()
    }

    /// Returns how many invocations reached the handler.
    #[must_use]
    pub fn invocation_count(&self) -> u64 {
        self.state.read().invocations
    }
}

#[async_trait]
impl AgentRuntime for StaticAgent {
    async fn initialize(&self, config: &AgentConfig) -> AgentResult<()> {
        self.state.write().config = Some(config.clone());
        Ok(())
    }

    async fn start(&self) -> AgentResult<()> {
        self.state.write().running = true;
        Ok(())
    }

    async fn stop(&self, _timeout: Duration) -> AgentResult<()> {
        if let Some(delay) = self.stop_delay {
            tokio::time::sleep(delay).await;
        }
        self.state.write().running = false;
        Ok(())
    }

    async fn health(&self) -> HealthStatus {
        let state = self.state.read();
        if !state.running {
            return HealthStatus::Unknown;
        }
        state
            .unhealthy
            .clone()
            .map_or(HealthStatus::Healthy, HealthStatus::Unhealthy)
    }

    fn describe(&self) -> DescriptorFragment {
        self.fragment.clone()
    }

    async fn invoke(&self, invocation: Invocation) -> AgentResult<Value> {
        self.state.write().invocations += 1;
        (self.handler)(&invocation)
    }
}
