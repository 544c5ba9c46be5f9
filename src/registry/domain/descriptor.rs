//! Registered agent descriptor.

use super::{AgentId, AgentStatus, DescriptorFragment, Endpoint};
use crate::capability::domain::Capability;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Identity and capability record of a registered agent.
///
/// Instances handed out by the registry are snapshots; mutating the
/// directory never changes a descriptor a caller already holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDescriptor {
    agent_id: AgentId,
    display_name: String,
    capabilities: BTreeSet<Capability>,
    endpoint: Endpoint,
    status: AgentStatus,
    registered_at: DateTime<Utc>,
    last_heartbeat: DateTime<Utc>,
    metadata: BTreeMap<String, String>,
}

impl AgentDescriptor {
    pub(crate) fn from_fragment(
        agent_id: AgentId,
        fragment: DescriptorFragment,
        now: DateTime<Utc>,
    ) -> Self {
        let (display_name, capabilities, endpoint, metadata) = fragment.into_parts();
        Self {
            agent_id,
            display_name,
            capabilities,
            endpoint,
            status: AgentStatus::Starting,
            registered_at: now,
            last_heartbeat: now,
            metadata,
        }
    }

    pub(crate) fn apply_fragment(&mut self, fragment: DescriptorFragment) {
        let (display_name, capabilities, endpoint, metadata) = fragment.into_parts();
        self.display_name = display_name;
        self.capabilities = capabilities;
        self.endpoint = endpoint;
        self.metadata = metadata;
    }

    pub(crate) const fn set_status(&mut self, status: AgentStatus) {
        self.status = status;
    }

    pub(crate) fn touch_heartbeat(&mut self, now: DateTime<Utc>) {
        self.last_heartbeat = self.last_heartbeat.max(now);
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the offered capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    /// Returns the invocation endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns when the agent was (re)registered under this identifier.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the latest heartbeat timestamp.
    #[must_use]
    pub const fn last_heartbeat(&self) -> DateTime<Utc> {
        self.last_heartbeat
    }

    /// Returns the free-form metadata.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Returns the offered capabilities that satisfy `requested`.
    pub fn offers<'a>(&'a self, requested: &'a Capability) -> impl Iterator<Item = &'a Capability> {
        self.capabilities
            .iter()
            .filter(move |offered| requested.is_satisfied_by(offered))
    }
}
