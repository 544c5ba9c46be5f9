//! Live change feed for one discovery query.

use crate::discovery::domain::{DiscoveryEvent, DiscoveryQuery};
use crate::registry::domain::RegistryEvent;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};

/// Owned, cancellable stream of registry changes matching a query.
///
/// Events for one agent arrive in revision order. The buffer is bounded by
/// [`RegistryConfig::event_capacity`](crate::config::RegistryConfig::event_capacity);
/// a subscriber that falls further behind receives
/// [`DiscoveryEvent::Lagged`] and then resumes with the oldest retained
/// event. Dropping or cancelling the subscription releases its buffer.
pub struct Subscription {
    receiver: Receiver<RegistryEvent>,
    query: DiscoveryQuery,
}

impl Subscription {
    pub(crate) const fn new(receiver: Receiver<RegistryEvent>, query: DiscoveryQuery) -> Self {
        Self { receiver, query }
    }

    /// Returns the query this subscription filters on.
    #[must_use]
    pub const fn query(&self) -> &DiscoveryQuery {
        &self.query
    }

    /// Waits for the next relevant event.
    ///
    /// Returns `None` once the registry has been dropped.
    pub async fn recv(&mut self) -> Option<DiscoveryEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.is_relevant(&event) => return Some(DiscoveryEvent::Change(event)),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => return Some(lagged(missed)),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next relevant event already buffered, without waiting.
    pub fn try_recv(&mut self) -> Option<DiscoveryEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.is_relevant(&event) => return Some(DiscoveryEvent::Change(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(missed)) => return Some(lagged(missed)),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Stops the subscription; no further events are delivered.
    pub fn cancel(self) {
        debug!(
            requirements = self.query.requirements().len(),
            "discovery subscription cancelled"
        );
    }

    /// Re-registrations are relevant when the agent matched before or
    /// after the change, so subscribers see agents leave the match set.
    fn is_relevant(&self, event: &RegistryEvent) -> bool {
        self.query.requirements().is_empty()
            || self.query.is_offered_by(event.descriptor())
            || event
                .previous_capabilities()
                .is_some_and(|previous| self.query.is_offered_among(previous))
    }
}

fn lagged(missed: u64) -> DiscoveryEvent {
    warn!(missed, "discovery subscriber lagged; events dropped");
    DiscoveryEvent::Lagged { missed }
}
