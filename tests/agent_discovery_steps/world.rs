//! Shared world state for agent discovery BDD scenarios.

use dynamus::capability::domain::Capability;
use dynamus::discovery::services::DiscoveryService;
use dynamus::registry::domain::{AgentDescriptor, AgentId, DescriptorFragment, Endpoint};
use dynamus::registry::services::AgentRegistry;
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use rstest::fixture;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry type used by the BDD world.
pub type TestRegistry = AgentRegistry<DefaultClock>;

/// Scenario world for discovery behaviour tests.
pub struct DiscoveryWorld {
    /// The registry under test.
    pub registry: TestRegistry,
    /// Discovery over the same registry.
    pub discovery: DiscoveryService<DefaultClock>,
    /// Registered agents by display name.
    pub agents: HashMap<String, AgentId>,
    /// Result of the last `find` call.
    pub last_found: Option<Vec<AgentDescriptor>>,
    /// Identifiers expired by the last sweep.
    pub expired: Vec<AgentId>,
}

impl DiscoveryWorld {
    /// Creates a world around a fresh registry.
    #[must_use]
    pub fn new() -> Self {
        let registry = AgentRegistry::new(Arc::new(DefaultClock));
        let discovery = DiscoveryService::new(registry.clone());
        Self {
            registry,
            discovery,
            agents: HashMap::new(),
            last_found: None,
            expired: Vec::new(),
        }
    }

    /// Returns the identifier registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when no agent with that name was registered.
    pub fn agent_id(&self, name: &str) -> Result<AgentId, eyre::Report> {
        self.agents
            .get(name)
            .copied()
            .ok_or_else(|| eyre!("no agent named '{name}' in scenario world"))
    }
}

impl Default for DiscoveryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DiscoveryWorld {
    DiscoveryWorld::default()
}

/// Builds an in-process fragment offering one capability.
///
/// # Errors
///
/// Returns an error when the capability text or name is invalid.
pub fn single_capability_fragment(
    name: &str,
    spec: &str,
) -> Result<DescriptorFragment, eyre::Report> {
    let capability = Capability::parse(spec).wrap_err("parse capability spec")?;
    let endpoint = Endpoint::in_process(name).wrap_err("build endpoint")?;
    DescriptorFragment::new(name, [capability], endpoint).wrap_err("build descriptor fragment")
}
