//! Capability-name index over live registry entries.

use crate::capability::domain::CapabilityName;
use crate::registry::domain::AgentId;
use dashmap::DashMap;
use std::collections::BTreeSet;

/// Maps capability names to the agents declaring them.
///
/// Derived from registry entries and owned by the registry. For every live
/// entry the index holds at least the names it declares; it may briefly
/// hold extra ids while an entry is being replaced or removed, so readers
/// re-check candidates against the entry itself.
#[derive(Debug, Default)]
pub(crate) struct CapabilityIndex {
    by_name: DashMap<CapabilityName, BTreeSet<AgentId>>,
}

impl CapabilityIndex {
    pub(crate) fn insert<'a>(
        &self,
        agent_id: AgentId,
        names: impl IntoIterator<Item = &'a CapabilityName>,
    ) {
        for name in names {
            self.by_name.entry(name.clone()).or_default().insert(agent_id);
        }
    }

    pub(crate) fn remove<'a>(
        &self,
        agent_id: AgentId,
        names: impl IntoIterator<Item = &'a CapabilityName>,
    ) {
        for name in names {
            if let Some(mut ids) = self.by_name.get_mut(name) {
                ids.remove(&agent_id);
            }
            self.by_name.remove_if(name, |_, ids| ids.is_empty());
        }
    }

    pub(crate) fn agents_offering(&self, name: &CapabilityName) -> BTreeSet<AgentId> {
        self.by_name
            .get(name)
            .map(|ids| ids.value().clone())
            .unwrap_or_default()
    }
}
