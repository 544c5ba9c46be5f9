//! Supervised agents: launch, background heartbeats and shutdown.

use super::helpers::{TestRegistry, eventually, fragment, registry};
use dynamus::agent::adapters::StaticAgent;
use dynamus::agent::domain::{AgentConfig, Invocation, LifecyclePhase};
use dynamus::agent::ports::AgentRuntime;
use dynamus::agent::services::AgentSupervisor;
use dynamus::capability::domain::Capability;
use dynamus::registry::domain::{AgentId, AgentStatus};
use dynamus::registry::services::RegistryError;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

const HEARTBEAT: Duration = Duration::from_millis(20);

fn status_of(registry: &TestRegistry, agent_id: AgentId) -> Option<AgentStatus> {
    registry.get(agent_id).ok().map(|descriptor| descriptor.status())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn launched_agent_is_ready_and_tracks_health(registry: TestRegistry) {
    let agent = StaticAgent::new(fragment("Summarizer", &["text.summarize@1.0.0"]));
    let probe = agent.clone();
    let supervisor = AgentSupervisor::new(registry.clone(), HEARTBEAT);

    let supervised = supervisor
        .launch(agent, &AgentConfig::new().with_setting("model", "small"))
        .await
        .expect("launch should succeed");
    let agent_id = supervised.agent_id();

    assert_eq!(status_of(&registry, agent_id), Some(AgentStatus::Ready));
    assert_eq!(supervised.agent().phase().await, LifecyclePhase::Running);
    assert_eq!(
        probe.config().and_then(|config| config.get_str("model").map(str::to_owned)),
        Some("small".to_owned())
    );

    probe.mark_unhealthy("model cold");
    assert!(
        eventually(Duration::from_secs(2), || {
            status_of(&registry, agent_id) == Some(AgentStatus::Degraded)
        })
        .await
    );

    probe.mark_healthy();
    assert!(
        eventually(Duration::from_secs(2), || {
            status_of(&registry, agent_id) == Some(AgentStatus::Ready)
        })
        .await
    );

    supervised
        .shutdown(Duration::from_secs(1))
        .await
        .expect("shutdown should succeed");
    assert!(matches!(
        registry.get(agent_id),
        Err(RegistryError::UnknownAgent(_))
    ));
    assert!(!probe.is_running());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn supervised_agent_serves_invocations(registry: TestRegistry) {
    let agent = StaticAgent::new(fragment("Echo", &["text.echo@1.0.0"]));
    let probe = agent.clone();
    let supervisor = AgentSupervisor::new(registry, HEARTBEAT);
    let supervised = supervisor
        .launch(agent, &AgentConfig::new())
        .await
        .expect("launch should succeed");

    let request = Capability::parse("text.echo@1.0.0").expect("valid capability");
    let reply = supervised
        .agent()
        .invoke(Invocation::new(request, json!({"text": "hi"})))
        .await
        .expect("invocation should succeed");

    assert_eq!(reply, json!({"text": "hi"}));
    assert_eq!(probe.invocation_count(), 1);

    supervised
        .shutdown(Duration::from_secs(1))
        .await
        .expect("shutdown should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn heartbeats_stop_after_external_deregistration(registry: TestRegistry) {
    let agent = StaticAgent::new(fragment("Summarizer", &["text.summarize@1.0.0"]));
    let supervisor = AgentSupervisor::new(registry.clone(), HEARTBEAT);
    let supervised = supervisor
        .launch(agent, &AgentConfig::new())
        .await
        .expect("launch should succeed");
    let agent_id = supervised.agent_id();

    registry
        .deregister(agent_id)
        .expect("operator deregistration should succeed");
    tokio::time::sleep(HEARTBEAT * 3).await;

    assert!(registry.is_empty());
    supervised
        .shutdown(Duration::from_secs(1))
        .await
        .expect("shutdown tolerates an already removed entry");
}
