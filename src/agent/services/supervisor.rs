//! Runs an agent, registers it, and keeps its heartbeat flowing.

use super::ManagedAgent;
use crate::agent::domain::{AgentConfig, AgentError};
use crate::agent::ports::AgentRuntime;
use crate::registry::domain::AgentId;
use crate::registry::services::{AgentRegistry, RegistryError};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Failures while launching or shutting down a supervised agent.
#[derive(Debug, Clone, Error)]
pub enum SupervisorError {
    /// The agent runtime rejected a lifecycle call.
    #[error(transparent)]
    Agent(#[from] AgentError),
    /// The registry rejected a registration or status change.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for supervisor operations.
pub type SupervisorResult<T> = Result<T, SupervisorError>;

/// Launches agents against one registry.
///
/// Launching initializes and starts the agent, registers its
/// [`describe`](AgentRuntime::describe) fragment, reports its first health,
/// and spawns a task that heartbeats every `heartbeat_interval` with the
/// agent's current health.
pub struct AgentSupervisor<C>
where
    C: Clock + Send + Sync,
{
    registry: AgentRegistry<C>,
    heartbeat_interval: Duration,
}

impl<C> AgentSupervisor<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a supervisor.
    #[must_use]
    pub const fn new(registry: AgentRegistry<C>, heartbeat_interval: Duration) -> Self {
        Self {
            registry,
            heartbeat_interval,
        }
    }

    /// Brings an agent up and into the registry.
    ///
    /// If registration fails the agent is stopped again before the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Agent`] when initialize or start fails,
    /// and [`SupervisorError::Registry`] when registration fails.
    pub async fn launch<A>(
        &self,
        runtime: A,
        config: &AgentConfig,
    ) -> SupervisorResult<SupervisedAgent<A, C>>
    where
        A: AgentRuntime + 'static,
    {
        let agent = Arc::new(ManagedAgent::new(runtime));
        agent.initialize(config).await?;
        agent.start().await?;

        let agent_id = match self.register(&agent).await {
            Ok(agent_id) => agent_id,
            Err(error) => {
                if let Err(stop_error) = agent.stop(self.heartbeat_interval).await {
                    warn!(error = %stop_error, "failed to stop agent after registration failure");
                }
                return Err(error);
            }
        };

        let (shutdown, stop) = oneshot::channel();
        let task = tokio::spawn(heartbeat_loop(
            Arc::clone(&agent),
            self.registry.clone(),
            agent_id,
            self.heartbeat_interval,
            stop,
        ));

        info!(%agent_id, "agent launched");
        Ok(SupervisedAgent {
            agent_id,
            agent,
            registry: self.registry.clone(),
            shutdown,
            task,
        })
    }

    async fn register<A>(&self, agent: &ManagedAgent<A>) -> SupervisorResult<AgentId>
    where
        A: AgentRuntime,
    {
        let agent_id = self.registry.register(agent.describe())?;
        let health = agent.health().await;
        if let Err(error) = self.registry.heartbeat(agent_id, &health) {
            if let Err(cleanup) = self.registry.deregister(agent_id) {
                debug!(%agent_id, error = %cleanup, "cleanup after failed first heartbeat");
            }
            return Err(error.into());
        }
        Ok(agent_id)
    }
}

async fn heartbeat_loop<A, C>(
    agent: Arc<ManagedAgent<A>>,
    registry: AgentRegistry<C>,
    agent_id: AgentId,
    period: Duration,
    mut stop: oneshot::Receiver<()>,
) where
    A: AgentRuntime,
    C: Clock + Send + Sync,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let health = agent.health().await;
                match registry.heartbeat(agent_id, &health) {
                    Ok(_) => {}
                    Err(RegistryError::UnknownAgent(_)) => {
                        warn!(%agent_id, "agent no longer registered; heartbeats stopped");
                        break;
                    }
                    Err(error) => warn!(%agent_id, %error, "heartbeat rejected"),
                }
            }
        }
    }
}

/// A running agent with a live registry entry and heartbeat task.
pub struct SupervisedAgent<A, C>
where
    C: Clock + Send + Sync,
{
    agent_id: AgentId,
    agent: Arc<ManagedAgent<A>>,
    registry: AgentRegistry<C>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl<A, C> SupervisedAgent<A, C>
where
    A: AgentRuntime,
    C: Clock + Send + Sync,
{
    /// Returns the registry identifier.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the managed agent, for direct invocation.
    #[must_use]
    pub const fn agent(&self) -> &Arc<ManagedAgent<A>> {
        &self.agent
    }

    /// Drains the registry entry, stops heartbeats, stops the agent within
    /// `timeout`, and deregisters it.
    ///
    /// The entry is deregistered even when the agent fails to stop.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::Agent`] when the agent fails to stop, or
    /// [`SupervisorError::Registry`] when deregistration fails.
    pub async fn shutdown(self, timeout: Duration) -> SupervisorResult<()> {
        let agent_id = self.agent_id;
        if self.shutdown.send(()).is_err() {
            debug!(%agent_id, "heartbeat task already finished");
        }
        if let Err(error) = self.task.await {
            warn!(%agent_id, %error, "heartbeat task failed");
        }

        if let Err(error) = self.registry.drain(agent_id) {
            debug!(%agent_id, %error, "agent not drained before stop");
        }

        let stopped = self.agent.stop(timeout).await;
        match self.registry.deregister(agent_id) {
            Ok(()) | Err(RegistryError::UnknownAgent(_)) => {}
            Err(error) => return Err(error.into()),
        }
        stopped?;

        info!(%agent_id, "agent shut down");
        Ok(())
    }
}
