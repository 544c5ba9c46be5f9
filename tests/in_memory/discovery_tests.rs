//! Discovery queries and subscriptions over a shared registry.

use super::helpers::{TestRegistry, capability, fragment, registry};
use dynamus::agent::domain::HealthStatus;
use dynamus::discovery::domain::{DiscoveryEvent, DiscoveryQuery, SelectionPolicy};
use dynamus::discovery::services::{DiscoveryError, DiscoveryService};
use dynamus::registry::domain::{AgentId, ChangeKind};
use rstest::rstest;
use std::time::Duration;
use tokio::time::timeout;

fn ready(registry: &TestRegistry, name: &str, specs: &[&str]) -> AgentId {
    let agent_id = registry
        .register(fragment(name, specs))
        .expect("registration should succeed");
    registry
        .heartbeat(agent_id, &HealthStatus::Healthy)
        .expect("heartbeat should succeed");
    agent_id
}

#[rstest]
fn finds_agents_offering_every_requirement(registry: TestRegistry) {
    let both = ready(
        &registry,
        "Both",
        &["image.resize@2.1.0?format=png|jpeg", "image.crop@1.0.0"],
    );
    ready(&registry, "ResizeOnly", &["image.resize@2.3.0?format=png"]);
    ready(&registry, "Legacy", &["image.resize@1.4.0?format=png"]);
    let discovery = DiscoveryService::new(registry);

    let query = DiscoveryQuery::new([
        capability("image.resize@2.0.0?format=jpeg"),
        capability("image.crop@1.0.0"),
    ]);
    let found = discovery.find(&query).expect("query should run");

    let ids: Vec<_> = found.iter().map(|descriptor| descriptor.agent_id()).collect();
    assert_eq!(ids, vec![both]);
}

#[rstest]
fn highest_version_policy_prefers_newest_offer(registry: TestRegistry) {
    ready(&registry, "Older", &["image.resize@2.1.0"]);
    let newer = ready(&registry, "Newer", &["image.resize@2.4.0"]);
    let discovery = DiscoveryService::new(registry);

    let query = DiscoveryQuery::new([capability("image.resize@2.0.0")])
        .with_policy(SelectionPolicy::HighestVersion);
    let best = discovery
        .find_one(&query)
        .expect("query should run")
        .expect("an agent should match");

    assert_eq!(best.agent_id(), newer);
}

#[rstest]
fn empty_query_is_rejected(registry: TestRegistry) {
    let discovery = DiscoveryService::new(registry);
    let query = DiscoveryQuery::new(Vec::new());

    assert_eq!(discovery.find(&query), Err(DiscoveryError::EmptyQuery));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subscription_sees_only_relevant_changes(registry: TestRegistry) {
    let discovery = DiscoveryService::new(registry.clone());
    let mut subscription = discovery.subscribe(DiscoveryQuery::new([capability(
        "text.summarize@1.0.0",
    )]));

    ready(&registry, "Resizer", &["image.resize@2.1.0"]);
    let summarizer = registry
        .register(fragment("Summarizer", &["text.summarize@1.2.0"]))
        .expect("registration should succeed");

    let event = timeout(Duration::from_secs(1), subscription.recv())
        .await
        .expect("event should arrive in time")
        .expect("subscription should stay open");
    let DiscoveryEvent::Change(change) = event else {
        panic!("expected a change event, got {event:?}");
    };
    assert_eq!(change.kind(), ChangeKind::Added);
    assert_eq!(change.agent_id(), summarizer);
    assert!(subscription.try_recv().is_none());
}
