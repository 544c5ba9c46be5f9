//! Change events published by the registry.

use super::{AgentDescriptor, AgentId, RegistryEntry, Revision};
use crate::capability::domain::Capability;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Why an entry left the live directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// The agent (or an operator) deregistered it.
    Deregistered,
    /// The liveness sweep found its heartbeat stale.
    Expired,
}

/// Kind of mutation an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A new entry was registered.
    Added,
    /// An existing entry changed status, heartbeat or declaration.
    Updated,
    /// The entry was removed.
    Removed(RemovalReason),
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => f.write_str("added"),
            Self::Updated => f.write_str("updated"),
            Self::Removed(RemovalReason::Deregistered) => f.write_str("removed"),
            Self::Removed(RemovalReason::Expired) => f.write_str("expired"),
        }
    }
}

/// A registry mutation together with the descriptor state it produced.
///
/// For removals the descriptor is the last state before removal, with
/// status `Stopped`. Re-registrations also carry the capabilities declared
/// before the replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEvent {
    kind: ChangeKind,
    revision: Revision,
    descriptor: AgentDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_capabilities: Option<BTreeSet<Capability>>,
}

impl RegistryEvent {
    pub(crate) fn from_entry(kind: ChangeKind, entry: &RegistryEntry) -> Self {
        Self {
            kind,
            revision: entry.revision(),
            descriptor: entry.descriptor().clone(),
            previous_capabilities: None,
        }
    }

    /// An `Updated` event for a re-registration that replaced `previous`.
    pub(crate) fn replaced(entry: &RegistryEntry, previous: BTreeSet<Capability>) -> Self {
        Self {
            previous_capabilities: Some(previous),
            ..Self::from_entry(ChangeKind::Updated, entry)
        }
    }

    /// Returns the mutation kind.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Returns the entry revision this event reflects.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the affected agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.descriptor.agent_id()
    }

    /// Returns the descriptor snapshot.
    #[must_use]
    pub const fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    /// Returns the capabilities declared before a re-registration.
    ///
    /// `None` for every other kind of change.
    #[must_use]
    pub const fn previous_capabilities(&self) -> Option<&BTreeSet<Capability>> {
        self.previous_capabilities.as_ref()
    }
}
