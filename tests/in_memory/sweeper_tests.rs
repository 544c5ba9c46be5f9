//! Background liveness sweeping.

use super::helpers::{TestRegistry, eventually, fast_registry, fragment};
use dynamus::agent::adapters::StaticAgent;
use dynamus::agent::domain::AgentConfig;
use dynamus::agent::services::AgentSupervisor;
use dynamus::registry::domain::{ChangeKind, RemovalReason};
use dynamus::registry::services::LivenessSweeper;
use rstest::rstest;
use std::time::Duration;
use tokio::time::timeout;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn silent_agent_expires(fast_registry: TestRegistry) {
    let mut events = fast_registry.subscribe_events();
    let sweeper = LivenessSweeper::spawn(fast_registry.clone());
    let agent_id = fast_registry
        .register(fragment("Silent", &["text.summarize@1.0.0"]))
        .expect("registration should succeed");

    assert!(eventually(Duration::from_secs(3), || fast_registry.is_empty()).await);

    let added = events.recv().await.expect("added event");
    assert_eq!(added.kind(), ChangeKind::Added);
    let removed = timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("removal should be published")
        .expect("event channel open");
    assert_eq!(removed.kind(), ChangeKind::Removed(RemovalReason::Expired));
    assert_eq!(removed.agent_id(), agent_id);

    fast_registry
        .deregister(agent_id)
        .expect("expired agent stays idempotently deregisterable");
    sweeper.shutdown().await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn supervised_agent_survives_sweeps(fast_registry: TestRegistry) {
    let sweeper = LivenessSweeper::spawn(fast_registry.clone());
    let supervisor = AgentSupervisor::new(fast_registry.clone(), Duration::from_millis(25));
    let supervised = supervisor
        .launch(
            StaticAgent::new(fragment("Busy", &["text.summarize@1.0.0"])),
            &AgentConfig::new(),
        )
        .await
        .expect("launch should succeed");

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(fast_registry.get(supervised.agent_id()).is_ok());

    supervised
        .shutdown(Duration::from_secs(1))
        .await
        .expect("shutdown should succeed");
    sweeper.shutdown().await;
    assert!(fast_registry.is_empty());
}
