//! Then steps for agent discovery BDD scenarios.

use super::world::DiscoveryWorld;
use dynamus::discovery::domain::DiscoveryQuery;
use dynamus::registry::domain::AgentStatus;
use dynamus::registry::services::RegistryError;
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;

#[then(r#"the result contains only "{name}""#)]
fn result_contains_only(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.agent_id(&name)?;
    let found = world
        .last_found
        .as_ref()
        .ok_or_else(|| eyre!("no discovery result in scenario world"))?;
    let ids: Vec<_> = found.iter().map(|descriptor| descriptor.agent_id()).collect();
    if ids != vec![expected] {
        return Err(eyre!("expected only '{name}' ({expected}), found {ids:?}"));
    }
    Ok(())
}

#[then("the result is empty")]
fn result_is_empty(world: &DiscoveryWorld) -> Result<(), eyre::Report> {
    let found = world
        .last_found
        .as_ref()
        .ok_or_else(|| eyre!("no discovery result in scenario world"))?;
    if !found.is_empty() {
        return Err(eyre!("expected no matches, found {}", found.len()));
    }
    Ok(())
}

#[then(r#"deregistering "{name}" again succeeds"#)]
fn deregistering_again_succeeds(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let agent_id = world.agent_id(&name)?;
    world
        .registry
        .deregister(agent_id)
        .wrap_err("repeat deregistration should be idempotent")?;
    Ok(())
}

#[then(r#"the sweep expired "{name}""#)]
fn sweep_expired(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let agent_id = world.agent_id(&name)?;
    if world.expired != vec![agent_id] {
        return Err(eyre!(
            "expected sweep to expire only '{name}', got {:?}",
            world.expired
        ));
    }
    Ok(())
}

#[then(r#"looking up "{name}" fails with an unknown agent error"#)]
fn lookup_fails_unknown(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let agent_id = world.agent_id(&name)?;
    match world.registry.get(agent_id) {
        Err(RegistryError::UnknownAgent(missing)) if missing == agent_id => Ok(()),
        other => Err(eyre!("expected unknown agent error, got {other:?}")),
    }
}

#[then(r#"a caller looking for "{spec}" finds nothing"#)]
fn caller_finds_nothing(world: &DiscoveryWorld, spec: String) -> Result<(), eyre::Report> {
    let query = DiscoveryQuery::parse([spec.as_str()]).wrap_err("parse discovery query")?;
    let found = world.discovery.find(&query).wrap_err("run discovery query")?;
    if !found.is_empty() {
        return Err(eyre!("expected no matches for {spec}, found {}", found.len()));
    }
    Ok(())
}

#[then(r#"a degraded-tolerant caller looking for "{spec}" finds only "{name}""#)]
fn tolerant_caller_finds_only(
    world: &DiscoveryWorld,
    spec: String,
    name: String,
) -> Result<(), eyre::Report> {
    let expected = world.agent_id(&name)?;
    let query = DiscoveryQuery::parse([spec.as_str()])
        .wrap_err("parse discovery query")?
        .including_degraded();
    let found = world.discovery.find(&query).wrap_err("run discovery query")?;
    let ids: Vec<_> = found.iter().map(|descriptor| descriptor.agent_id()).collect();
    if ids != vec![expected] {
        return Err(eyre!("expected only '{name}', found {ids:?}"));
    }
    Ok(())
}

#[then(r#"the agent "{name}" is "{status}""#)]
fn agent_has_status(world: &DiscoveryWorld, name: String, status: String) -> Result<(), eyre::Report> {
    let agent_id = world.agent_id(&name)?;
    let expected = AgentStatus::try_from(status.as_str()).wrap_err("parse expected status")?;
    let descriptor = world.registry.get(agent_id).wrap_err("look up agent")?;
    if descriptor.status() != expected {
        return Err(eyre!(
            "expected '{name}' to be {expected}, found {}",
            descriptor.status()
        ));
    }
    Ok(())
}
