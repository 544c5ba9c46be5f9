//! Registry service: the live directory of agents.

use super::index::CapabilityIndex;
use crate::agent::domain::HealthStatus;
use crate::capability::domain::{Capability, CapabilityName};
use crate::config::{ConfigError, RegistryConfig};
use crate::registry::domain::{
    AgentDescriptor, AgentId, AgentStatus, ChangeKind, DescriptorFragment, RegistryDomainError,
    RegistryEntry, RegistryEvent, RemovalReason, Revision,
};
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mockable::Clock;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

/// Errors returned by registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// An explicit identifier is already live.
    #[error("agent {0} is already registered")]
    DuplicateRegistration(AgentId),

    /// The identifier is not live (and, for deregistration, not recently
    /// removed).
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    /// A descriptor or status rule was violated.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

type Slot = Arc<Mutex<RegistryEntry>>;

struct Shared {
    entries: DashMap<AgentId, Slot>,
    tombstones: DashMap<AgentId, DateTime<Utc>>,
    index: CapabilityIndex,
    events: broadcast::Sender<RegistryEvent>,
    config: RegistryConfig,
}

/// Concurrent in-memory agent registry.
///
/// Cloning is cheap and every clone sees the same directory. Each entry
/// carries its own lock, so operations on different agents never wait on
/// each other and no lock is held across an `.await`.
///
/// Change events for one agent are published while that agent's entry is
/// locked, so subscribers observe them in revision order.
pub struct AgentRegistry<C>
where
    C: Clock + Send + Sync,
{
    shared: Arc<Shared>,
    clock: Arc<C>,
}

impl<C> Clone for AgentRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> AgentRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a registry with [`RegistryConfig::default`].
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self::build(RegistryConfig::default(), clock)
    }

    /// Creates a registry with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration does not validate.
    pub fn with_config(config: RegistryConfig, clock: Arc<C>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: RegistryConfig, clock: Arc<C>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            shared: Arc::new(Shared {
                entries: DashMap::new(),
                tombstones: DashMap::new(),
                index: CapabilityIndex::default(),
                events,
                config,
            }),
            clock,
        }
    }

    /// Returns the active settings.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.shared.config
    }

    /// Returns the registry clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Registers an agent under a freshly allocated identifier.
    ///
    /// The entry starts in [`AgentStatus::Starting`] at revision zero and an
    /// `Added` event is published.
    ///
    /// # Errors
    ///
    /// Never fails for a validated fragment; the result type is shared with
    /// [`Self::register_with_id`].
    pub fn register(&self, fragment: DescriptorFragment) -> RegistryResult<AgentId> {
        let mut agent_id = AgentId::new();
        while self.shared.entries.contains_key(&agent_id)
            || self.shared.tombstones.contains_key(&agent_id)
        {
            agent_id = AgentId::new();
        }
        self.insert(agent_id, fragment)
    }

    /// Registers an agent under a caller-chosen identifier.
    ///
    /// An identifier that was deregistered or expired may be reused; doing
    /// so clears its tombstone.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRegistration`] when the identifier
    /// is live.
    pub fn register_with_id(
        &self,
        agent_id: AgentId,
        fragment: DescriptorFragment,
    ) -> RegistryResult<AgentId> {
        self.insert(agent_id, fragment)
    }

    fn insert(&self, agent_id: AgentId, fragment: DescriptorFragment) -> RegistryResult<AgentId> {
        let slot: Slot = Arc::new(Mutex::new(RegistryEntry::register(
            agent_id,
            fragment,
            self.clock.utc(),
        )));
        let entry = slot.lock();

        match self.shared.entries.entry(agent_id) {
            Entry::Occupied(_) => {
                debug!(%agent_id, "rejected duplicate registration");
                return Err(RegistryError::DuplicateRegistration(agent_id));
            }
            Entry::Vacant(vacant) => {
                self.shared
                    .index
                    .insert(agent_id, capability_names(entry.descriptor()));
                vacant.insert(Arc::clone(&slot));
            }
        }

        self.shared.tombstones.remove(&agent_id);
        self.publish(ChangeKind::Added, &entry);
        info!(
            %agent_id,
            display_name = entry.descriptor().display_name(),
            capabilities = entry.descriptor().capabilities().len(),
            "agent registered"
        );
        Ok(agent_id)
    }

    /// Replaces what a live agent declares about itself.
    ///
    /// Identity, status and timestamps are kept; the revision is bumped and
    /// an `Updated` event is published. Capabilities no longer declared stop
    /// matching immediately.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAgent`] when the identifier is not
    /// live.
    pub fn reregister(
        &self,
        agent_id: AgentId,
        fragment: DescriptorFragment,
    ) -> RegistryResult<Revision> {
        let slot = self.live_slot(agent_id)?;
        let mut entry = slot.lock();
        ensure_live(&entry)?;

        let replaced = entry.descriptor().capabilities().clone();
        self.shared
            .index
            .insert(agent_id, fragment.capabilities().iter().map(Capability::name));
        entry.replace_fragment(fragment);

        let current = entry.descriptor().capabilities();
        let retired: Vec<&CapabilityName> = replaced
            .iter()
            .map(Capability::name)
            .filter(|name| !current.iter().any(|capability| capability.name() == *name))
            .collect();
        self.shared.index.remove(agent_id, retired);

        self.broadcast(|| RegistryEvent::replaced(&entry, replaced));
        info!(%agent_id, revision = %entry.revision(), "agent re-registered");
        Ok(entry.revision())
    }

    /// Records a heartbeat with the agent's self-reported health.
    ///
    /// `Healthy` moves the agent to `Ready`, `Unhealthy` to `Degraded`, and
    /// `Unknown` only refreshes the timestamp. A draining agent stays
    /// draining.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAgent`] when the identifier is not
    /// live.
    pub fn heartbeat(&self, agent_id: AgentId, health: &HealthStatus) -> RegistryResult<Revision> {
        let slot = self.live_slot(agent_id)?;
        let mut entry = slot.lock();
        ensure_live(&entry)?;

        let before = entry.status();
        entry.record_heartbeat(self.clock.utc(), health)?;
        let after = entry.status();

        if let HealthStatus::Unhealthy(reason) = health {
            warn!(%agent_id, %reason, "agent reported unhealthy");
        }
        if before == after {
            debug!(%agent_id, revision = %entry.revision(), "heartbeat recorded");
        } else {
            info!(%agent_id, from = %before, to = %after, "agent status changed");
        }

        self.publish(ChangeKind::Updated, &entry);
        Ok(entry.revision())
    }

    /// Moves a live agent to [`AgentStatus::Draining`].
    ///
    /// Draining agents stay registered but are excluded from discovery.
    /// Draining an already draining agent is a no-op that still bumps the
    /// revision.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAgent`] when the identifier is not
    /// live.
    pub fn drain(&self, agent_id: AgentId) -> RegistryResult<Revision> {
        let slot = self.live_slot(agent_id)?;
        let mut entry = slot.lock();
        ensure_live(&entry)?;

        entry.transition_to(AgentStatus::Draining)?;
        self.publish(ChangeKind::Updated, &entry);
        info!(%agent_id, "agent draining");
        Ok(entry.revision())
    }

    /// Removes an agent from the directory.
    ///
    /// Deregistering an identifier removed within the tombstone grace
    /// window succeeds without effect.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAgent`] when the identifier was never
    /// registered or was removed longer ago than the grace window.
    pub fn deregister(&self, agent_id: AgentId) -> RegistryResult<()> {
        let Ok(slot) = self.live_slot(agent_id) else {
            return self.deregister_removed(agent_id);
        };

        let mut entry = slot.lock();
        if entry.status().is_terminal() {
            drop(entry);
            return self.deregister_removed(agent_id);
        }

        self.remove_locked(&slot, &mut entry, RemovalReason::Deregistered)?;
        info!(%agent_id, "agent deregistered");
        Ok(())
    }

    fn deregister_removed(&self, agent_id: AgentId) -> RegistryResult<()> {
        let grace = self.shared.config.tombstone_grace_delta();
        let now = self.clock.utc();
        let recent = self
            .shared
            .tombstones
            .get(&agent_id)
            .is_some_and(|removed_at| now.signed_duration_since(*removed_at) <= grace);

        if recent {
            debug!(%agent_id, "duplicate deregistration ignored");
            Ok(())
        } else {
            Err(RegistryError::UnknownAgent(agent_id))
        }
    }

    /// Returns a snapshot of one live agent's descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAgent`] when the identifier is not
    /// live.
    pub fn get(&self, agent_id: AgentId) -> RegistryResult<AgentDescriptor> {
        self.entry(agent_id).map(|entry| entry.descriptor().clone())
    }

    /// Returns a snapshot of one live entry including its revision.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAgent`] when the identifier is not
    /// live.
    pub fn entry(&self, agent_id: AgentId) -> RegistryResult<RegistryEntry> {
        let slot = self.live_slot(agent_id)?;
        let entry = slot.lock();
        ensure_live(&entry)?;
        Ok(entry.clone())
    }

    /// Returns snapshots of every live descriptor, ordered by identifier.
    #[must_use]
    pub fn list(&self) -> Vec<AgentDescriptor> {
        let mut descriptors: Vec<AgentDescriptor> = self
            .slots()
            .into_iter()
            .filter_map(|slot| {
                let entry = slot.lock();
                (!entry.status().is_terminal()).then(|| entry.descriptor().clone())
            })
            .collect();
        descriptors.sort_by_key(AgentDescriptor::agent_id);
        descriptors
    }

    /// Returns the number of live agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.entries.len()
    }

    /// Returns whether no agent is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.entries.is_empty()
    }

    /// Returns snapshots of live entries declaring every requested
    /// capability name, ordered by identifier.
    ///
    /// Candidates come from the capability index and are re-read from their
    /// entries, so the result never includes removed agents. Version and
    /// parameter matching is left to the caller.
    #[must_use]
    pub fn entries_offering(&self, requirements: &[Capability]) -> Vec<RegistryEntry> {
        let Some((first, rest)) = requirements.split_first() else {
            return Vec::new();
        };

        let mut candidates = self.shared.index.agents_offering(first.name());
        for requirement in rest {
            if candidates.is_empty() {
                break;
            }
            let offering = self.shared.index.agents_offering(requirement.name());
            candidates.retain(|agent_id| offering.contains(agent_id));
        }

        candidates
            .into_iter()
            .filter_map(|agent_id| self.live_slot(agent_id).ok())
            .filter_map(|slot| {
                let entry = slot.lock();
                (!entry.status().is_terminal()).then(|| entry.clone())
            })
            .collect()
    }

    /// Subscribes to every subsequent change event.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<RegistryEvent> {
        self.shared.events.subscribe()
    }

    /// Expires every agent whose last heartbeat is older than `timeout` at
    /// `now`, and forgets tombstones older than the grace window.
    ///
    /// Each expired agent is marked `Stopped`, removed, and reported with an
    /// `Expired` removal event. Entries are locked one at a time, so a
    /// heartbeat racing the sweep either lands first (and the agent
    /// survives) or finds the agent gone.
    ///
    /// Returns the expired identifiers in ascending order.
    #[must_use]
    pub fn sweep(&self, now: DateTime<Utc>, timeout: TimeDelta) -> Vec<AgentId> {
        let mut expired = Vec::new();
        for slot in self.slots() {
            let mut entry = slot.lock();
            if entry.status().is_terminal() || !entry.is_stale(now, timeout) {
                continue;
            }

            let agent_id = entry.agent_id();
            let last_heartbeat = entry.descriptor().last_heartbeat();
            match self.remove_locked(&slot, &mut entry, RemovalReason::Expired) {
                Ok(()) => {
                    info!(%agent_id, %last_heartbeat, "agent expired");
                    expired.push(agent_id);
                }
                Err(error) => warn!(%agent_id, %error, "failed to expire agent"),
            }
        }

        let grace = self.shared.config.tombstone_grace_delta();
        self.shared
            .tombstones
            .retain(|_, removed_at| now.signed_duration_since(*removed_at) <= grace);

        expired.sort_unstable();
        expired
    }

    /// Runs [`Self::sweep`] at the current clock time with the configured
    /// heartbeat timeout.
    #[must_use]
    pub fn sweep_now(&self) -> Vec<AgentId> {
        self.sweep(self.clock.utc(), self.shared.config.heartbeat_timeout_delta())
    }

    /// Drains and then deregisters every live agent.
    ///
    /// Returns how many agents were removed.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut removed = 0_usize;
        for slot in self.slots() {
            let mut entry = slot.lock();
            if entry.status().is_terminal() {
                continue;
            }

            let agent_id = entry.agent_id();
            if entry.transition_to(AgentStatus::Draining).is_ok() {
                self.publish(ChangeKind::Updated, &entry);
            }
            match self.remove_locked(&slot, &mut entry, RemovalReason::Deregistered) {
                Ok(()) => removed += 1,
                Err(error) => warn!(%agent_id, %error, "failed to remove agent during shutdown"),
            }
        }

        info!(removed, "registry shut down");
        removed
    }

    /// Marks the locked entry `Stopped`, unlinks it from the index and the
    /// directory, and publishes the removal.
    ///
    /// The index is pruned before the map so that a re-registration under
    /// the same identifier cannot have its fresh index entries removed.
    fn remove_locked(
        &self,
        slot: &Slot,
        entry: &mut RegistryEntry,
        reason: RemovalReason,
    ) -> RegistryResult<()> {
        entry.transition_to(AgentStatus::Stopped)?;

        let agent_id = entry.agent_id();
        self.shared
            .index
            .remove(agent_id, capability_names(entry.descriptor()));
        self.shared
            .entries
            .remove_if(&agent_id, |_, current| Arc::ptr_eq(current, slot));
        self.shared.tombstones.insert(agent_id, self.clock.utc());

        self.publish(ChangeKind::Removed(reason), entry);
        Ok(())
    }

    fn publish(&self, kind: ChangeKind, entry: &RegistryEntry) {
        self.broadcast(|| RegistryEvent::from_entry(kind, entry));
    }

    fn broadcast<F>(&self, event: F)
    where
        F: FnOnce() -> RegistryEvent,
    {
        if self.shared.events.receiver_count() == 0 {
            return;
        }
        if let Err(unsent) = self.shared.events.send(event()) {
            trace!(
                agent_id = %unsent.0.agent_id(),
                kind = %unsent.0.kind(),
                "no event subscribers"
            );
        }
    }

    fn live_slot(&self, agent_id: AgentId) -> RegistryResult<Slot> {
        self.shared
            .entries
            .get(&agent_id)
            .map(|slot| Arc::clone(slot.value()))
            .ok_or(RegistryError::UnknownAgent(agent_id))
    }

    fn slots(&self) -> Vec<Slot> {
        self.shared
            .entries
            .iter()
            .map(|slot| Arc::clone(slot.value()))
            .collect()
    }
}

fn capability_names(descriptor: &AgentDescriptor) -> impl Iterator<Item = &CapabilityName> {
    descriptor.capabilities().iter().map(Capability::name)
}

/// A slot whose entry is already `Stopped` is being removed concurrently.
const fn ensure_live(entry: &RegistryEntry) -> RegistryResult<()> {
    if entry.status().is_terminal() {
        Err(RegistryError::UnknownAgent(entry.agent_id()))
    } else {
        Ok(())
    }
}
