//! Registry behaviour through the public API.

use super::helpers::{TestRegistry, fragment, registry};
use dynamus::agent::domain::HealthStatus;
use dynamus::error::{CoreError, ErrorKind};
use dynamus::registry::domain::{AgentId, AgentStatus, ChangeKind, RemovalReason, Revision};
use dynamus::registry::services::RegistryError;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_publishes_ordered_events(registry: TestRegistry) {
    let mut events = registry.subscribe_events();
    let agent_id = registry
        .register(fragment("Resizer", &["image.resize2.1.0"]))
        .expect("registration should succeed");

    registry
        .heartbeat(agent_id, &HealthStatus::Healthy)
        .expect("heartbeat should succeed");
    registry
        .heartbeat(agent_id, &HealthStatus::unhealthy("gpu busy"))
        .expect("heartbeat should succeed");
    registry.drain(agent_id).expect("drain should succeed");
    registry.deregister(agent_id).expect("deregister should succeed");

    let mut observed = Vec::new();
    for _ in 0..5 {
        let event = events.recv().await.expect("event should arrive");
        observed.push((event.kind(), event.descriptor().status(), event.revision()));
    }

    assert_eq!(
        observed,
        vec![
            (ChangeKind::Added, AgentStatus::Starting, Revision::new(0)),
            (ChangeKind::Updated, AgentStatus::Ready, Revision::new(1)),
            (ChangeKind::Updated, AgentStatus::Degraded, Revision::new(2)),
            (ChangeKind::Updated, AgentStatus::Draining, Revision::new(3)),
            (
                ChangeKind::Removed(RemovalReason::Deregistered),
                AgentStatus::Stopped,
                Revision::new(4)
            ),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_registrations_from_tasks_all_land(registry: TestRegistry) {
    let shared = Arc::new(registry);
    let mut handles = Vec::new();
    for index in 0..32 {
        let target = Arc::clone(&shared);
        handles.push(tokio::spawn(async move {
            target.register(fragment(&format!("agent-{index}"), &["text.summarize1.0.0"]))
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(
            handle
                .await
                .expect("task should not panic")
                .expect("registration should succeed"),
        );
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 32);
    assert_eq!(shared.len(), 32);
}

#[rstest]
fn errors_map_to_core_kinds(registry: TestRegistry) {
    let missing = AgentId::new();
    let unknown: CoreError = registry
        .heartbeat(missing, &HealthStatus::Healthy)
        .expect_err("unknown agent should be rejected")
        .into();
    assert_eq!(unknown.kind(), ErrorKind::NotFound);

    let agent_id = registry
        .register(fragment("Resizer", &["image.resize2.1.0"]))
        .expect("registration should succeed");
    let duplicate: CoreError = registry
        .register_with_id(agent_id, fragment("Resizer", &["image.resize2.1.0"]))
        .expect_err("duplicate id should be rejected")
        .into();
    assert_eq!(duplicate.kind(), ErrorKind::Conflict);
}

#[rstest]
fn shutdown_removes_every_agent(registry: TestRegistry) {
    for name in ["one", "two", "three"] {
        registry
            .register(fragment(name, &["text.summarize1.0.0"]))
            .expect("registration should succeed");
    }

    assert_eq!(registry.shutdown(), 3);
    assert!(registry.is_empty());
    assert!(matches!(
        registry.get(AgentId::new()),
        Err(RegistryError::UnknownAgent(_))
    ));
}
