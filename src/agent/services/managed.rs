//! Lifecycle guard around an agent runtime.

use crate::agent::domain::{
    AgentConfig, AgentError, AgentLifecycleError, HealthStatus, Invocation, LifecycleOperation,
    LifecyclePhase,
};
use crate::agent::ports::{AgentResult, AgentRuntime};
use crate::registry::domain::DescriptorFragment;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Wraps an [`AgentRuntime`] and enforces the lifecycle call order.
///
/// | phase       | initialize | start | stop   | invoke |
/// |-------------|------------|-------|--------|--------|
/// | created     | runs       | error | error  | error  |
/// | initialized | no-op      | runs  | runs   | error  |
/// | running     | no-op      | error | runs   | runs   |
/// | stopped     | error      | error | no-op  | error  |
/// | failed      | error      | error | error  | error  |
///
/// A failed `initialize`, `start` or `stop` moves the agent to `Failed`.
/// Lifecycle calls are serialized; `invoke` and `health` only read the
/// phase and run concurrently.
pub struct ManagedAgent<A> {
    runtime: A,
    name: String,
    phase: Mutex<LifecyclePhase>,
}

impl<A> ManagedAgent<A>
where
    A: AgentRuntime,
{
    /// Wraps a freshly constructed runtime in the `Created` phase.
    #[must_use]
    pub fn new(runtime: A) -> Self {
        let name = runtime.describe().display_name().to_owned();
        Self {
            runtime,
            name,
            phase: Mutex::new(LifecyclePhase::Created),
        }
    }

    /// Returns the current phase.
    pub async fn phase(&self) -> LifecyclePhase {
        *self.phase.lock().await
    }

    /// Returns the wrapped runtime.
    #[must_use]
    pub const fn runtime(&self) -> &A {
        &self.runtime
    }

    async fn ensure_running(&self, operation: LifecycleOperation) -> AgentResult<()> {
        let phase = self.phase().await;
        if phase == LifecyclePhase::Running {
            Ok(())
        } else {
            Err(AgentLifecycleError::new(operation, phase).into())
        }
    }
}

#[async_trait]
impl<A> AgentRuntime for ManagedAgent<A>
where
    A: AgentRuntime,
{
    async fn initialize(&self, config: &AgentConfig) -> AgentResult<()> {
        let mut phase = self.phase.lock().await;
        match *phase {
            LifecyclePhase::Created => {}
            LifecyclePhase::Initialized | LifecyclePhase::Running => {
                debug!(agent = %self.name, "agent already initialized");
                return Ok(());
            }
            current @ (LifecyclePhase::Stopped | LifecyclePhase::Failed) => {
                return Err(
                    AgentLifecycleError::new(LifecycleOperation::Initialize, current).into(),
                );
            }
        }

        let outcome = self.runtime.initialize(config).await;
        *phase = next_phase(&outcome, LifecyclePhase::Initialized);
        log_outcome(&self.name, LifecycleOperation::Initialize, &outcome);
        outcome
    }

    async fn start(&self) -> AgentResult<()> {
        let mut phase = self.phase.lock().await;
        if *phase != LifecyclePhase::Initialized {
            return Err(AgentLifecycleError::new(LifecycleOperation::Start, *phase).into());
        }

        let outcome = self.runtime.start().await;
        *phase = next_phase(&outcome, LifecyclePhase::Running);
        log_outcome(&self.name, LifecycleOperation::Start, &outcome);
        outcome
    }

    async fn stop(&self, timeout: Duration) -> AgentResult<()> {
        let mut phase = self.phase.lock().await;
        match *phase {
            LifecyclePhase::Initialized | LifecyclePhase::Running => {}
            LifecyclePhase::Stopped => {
                debug!(agent = %self.name, "agent already stopped");
                return Ok(());
            }
            current @ (LifecyclePhase::Created | LifecyclePhase::Failed) => {
                return Err(AgentLifecycleError::new(LifecycleOperation::Stop, current).into());
            }
        }

        let outcome = tokio::time::timeout(timeout, self.runtime.stop(timeout))
            .await
            .unwrap_or(Err(AgentError::StopTimedOut(timeout)));
        *phase = next_phase(&outcome, LifecyclePhase::Stopped);
        log_outcome(&self.name, LifecycleOperation::Stop, &outcome);
        outcome
    }

    async fn health(&self) -> HealthStatus {
        if self.phase().await == LifecyclePhase::Running {
            self.runtime.health().await
        } else {
            HealthStatus::Unknown
        }
    }

    fn describe(&self) -> DescriptorFragment {
        self.runtime.describe()
    }

    async fn invoke(&self, invocation: Invocation) -> AgentResult<Value> {
        self.ensure_running(LifecycleOperation::Invoke).await?;

        let declared = self.runtime.describe();
        let supported = declared
            .capabilities()
            .iter()
            .any(|offered| invocation.capability().is_satisfied_by(offered));
        if !supported {
            return Err(AgentError::UnsupportedCapability(
                invocation.capability().clone(),
            ));
        }

        self.runtime.invoke(invocation).await
    }
}

const fn next_phase(outcome: &AgentResult<()>, success: LifecyclePhase) -> LifecyclePhase {
    if outcome.is_ok() {
        success
    } else {
        LifecyclePhase::Failed
    }
}

fn log_outcome(agent: &str, operation: LifecycleOperation, outcome: &AgentResult<()>) {
    match outcome {
        Ok(()) => info!(agent, %operation, "agent lifecycle step completed"),
        Err(error) => warn!(agent, %operation, %error, "agent lifecycle step failed"),
    }
}
