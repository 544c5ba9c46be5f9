//! Given steps for agent discovery BDD scenarios.

use super::world::{DiscoveryWorld, single_capability_fragment};
use dynamus::agent::domain::HealthStatus;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"an agent "{name}" offering "{spec}""#)]
fn an_agent_offering(
    world: &mut DiscoveryWorld,
    name: String,
    spec: String,
) -> Result<(), eyre::Report> {
    let fragment = single_capability_fragment(&name, &spec)?;
    let agent_id = world
        .registry
        .register(fragment)
        .wrap_err("register agent for scenario")?;
    world.agents.insert(name, agent_id);
    Ok(())
}

#[given(r#"the agent "{name}" reports healthy"#)]
fn agent_reports_healthy(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let agent_id = world.agent_id(&name)?;
    world
        .registry
        .heartbeat(agent_id, &HealthStatus::Healthy)
        .wrap_err("send healthy heartbeat")?;
    Ok(())
}

#[given(r#"the agent "{name}" reports unhealthy because "{reason}""#)]
fn agent_reports_unhealthy(
    world: &mut DiscoveryWorld,
    name: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let agent_id = world.agent_id(&name)?;
    world
        .registry
        .heartbeat(agent_id, &HealthStatus::unhealthy(reason))
        .wrap_err("send unhealthy heartbeat")?;
    Ok(())
}
