//! Shared test helpers for in-memory registry integration tests.

use dynamus::capability::domain::Capability;
use dynamus::config::RegistryConfig;
use dynamus::registry::domain::{DescriptorFragment, Endpoint};
use dynamus::registry::services::AgentRegistry;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Registry type used across integration tests.
pub type TestRegistry = AgentRegistry<DefaultClock>;

/// Provides a registry with default configuration.
#[fixture]
pub fn registry() -> TestRegistry {
    AgentRegistry::new(Arc::new(DefaultClock))
}

/// Provides a registry tuned for fast expiry in timing-based tests.
#[fixture]
pub fn fast_registry() -> TestRegistry {
    let config = RegistryConfig {
        heartbeat_timeout: Duration::from_millis(150),
        sweep_interval: Duration::from_millis(20),
        tombstone_grace: Duration::from_secs(5),
        event_capacity: 64,
    };
    AgentRegistry::with_config(config, Arc::new(DefaultClock))
        .expect("fast registry config should be valid")
}

/// Parses a capability, panicking on malformed test input.
pub fn capability(spec: &str) -> Capability {
    Capability::parse(spec).expect("valid test capability")
}

/// Builds an in-process fragment offering `specs`.
pub fn fragment(name: &str, specs: &[&str]) -> DescriptorFragment {
    DescriptorFragment::new(
        name,
        specs.iter().map(|spec| capability(spec)),
        Endpoint::in_process(name).expect("valid test endpoint"),
    )
    .expect("valid test fragment")
}

/// Polls `condition` until it holds or `deadline` elapses.
pub async fn eventually<F>(deadline: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let until = Instant::now() + deadline;
    while Instant::now() < until {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    condition()
}
