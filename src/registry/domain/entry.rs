//! Registry entry: a descriptor plus its revision counter.

use super::{
    AgentDescriptor, AgentId, AgentStatus, DescriptorFragment, RegistryDomainError, Revision,
};
use crate::agent::domain::HealthStatus;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Canonical registry record for one agent.
///
/// Every mutation bumps [`Revision`]; change events carry the revision they
/// reflect so consumers can order updates for the same agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    descriptor: AgentDescriptor,
    revision: Revision,
}

impl RegistryEntry {
    /// Creates a `Starting` entry at revision zero.
    pub(crate) fn register(
        agent_id: AgentId,
        fragment: DescriptorFragment,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            descriptor: AgentDescriptor::from_fragment(agent_id, fragment, now),
            revision: Revision::INITIAL,
        }
    }

    /// Returns the descriptor snapshot.
    #[must_use]
    pub const fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    /// Consumes the entry, returning the descriptor.
    #[must_use]
    pub fn into_descriptor(self) -> AgentDescriptor {
        self.descriptor
    }

    /// Returns the revision.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.descriptor.agent_id()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.descriptor.status()
    }

    /// Returns whether the last heartbeat is older than `timeout` at `now`.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>, timeout: TimeDelta) -> bool {
        now.signed_duration_since(self.descriptor.last_heartbeat()) > timeout
    }

    /// Records a heartbeat and maps the reported health onto the status.
    ///
    /// `Healthy` moves the agent to `Ready`, `Unhealthy` to `Degraded`, and
    /// `Unknown` leaves the status alone. A draining agent stays draining.
    /// The heartbeat timestamp never moves backwards.
    pub(crate) fn record_heartbeat(
        &mut self,
        now: DateTime<Utc>,
        health: &HealthStatus,
    ) -> Result<(), RegistryDomainError> {
        let current = self.status();
        if current.is_terminal() {
            return Err(RegistryDomainError::InvalidStatusTransition {
                from: current,
                to: current,
            });
        }

        let target = match (current, health) {
            (AgentStatus::Draining, _) | (_, HealthStatus::Unknown) => current,
            (_, HealthStatus::Healthy) => AgentStatus::Ready,
            (_, HealthStatus::Unhealthy(_)) => AgentStatus::Degraded,
        };

        if target != current {
            ensure_transition(current, target)?;
        }

        self.descriptor.set_status(target);
        self.descriptor.touch_heartbeat(now);
        self.bump();
        Ok(())
    }

    /// Moves the entry to `target`.
    pub(crate) fn transition_to(&mut self, target: AgentStatus) -> Result<(), RegistryDomainError> {
        ensure_transition(self.status(), target)?;
        self.descriptor.set_status(target);
        self.bump();
        Ok(())
    }

    /// Replaces the agent-declared part of the descriptor.
    pub(crate) fn replace_fragment(&mut self, fragment: DescriptorFragment) {
        self.descriptor.apply_fragment(fragment);
        self.bump();
    }

    const fn bump(&mut self) {
        self.revision = self.revision.next();
    }
}

const fn ensure_transition(from: AgentStatus, to: AgentStatus) -> Result<(), RegistryDomainError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(RegistryDomainError::InvalidStatusTransition { from, to })
    }
}
