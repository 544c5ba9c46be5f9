//! Background liveness sweep.

use super::AgentRegistry;
use mockable::Clock;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Periodically expires agents whose heartbeats have gone stale.
pub struct LivenessSweeper;

impl LivenessSweeper {
    /// Spawns a sweep task on the current Tokio runtime.
    ///
    /// The task runs [`AgentRegistry::sweep_now`] every
    /// [`sweep_interval`](crate::config::RegistryConfig::sweep_interval)
    /// until the returned handle is shut down or dropped.
    #[must_use]
    pub fn spawn<C>(registry: AgentRegistry<C>) -> SweeperHandle
    where
        C: Clock + Send + Sync + 'static,
    {
        let (shutdown, mut stop) = oneshot::channel();
        let period = registry.config().sweep_interval;

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!(?period, "liveness sweeper started");

            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {
                        let expired = registry.sweep_now();
                        if !expired.is_empty() {
                            info!(count = expired.len(), "liveness sweep expired agents");
                        }
                    }
                }
            }

            debug!("liveness sweeper stopped");
        });

        SweeperHandle { shutdown, task }
    }
}

/// Handle to a running sweep task.
///
/// Dropping the handle also stops the task at its next wakeup.
pub struct SweeperHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweep task and waits for it to finish.
    pub async fn shutdown(self) {
        if self.shutdown.send(()).is_err() {
            debug!("liveness sweeper already stopped");
        }
        if let Err(error) = self.task.await {
            warn!(%error, "liveness sweeper task failed");
        }
    }
}
