//! When steps for agent discovery BDD scenarios.

use super::world::DiscoveryWorld;
use chrono::{TimeDelta, Utc};
use dynamus::discovery::domain::DiscoveryQuery;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"a caller looks for "{spec}""#)]
fn caller_looks_for(world: &mut DiscoveryWorld, spec: String) -> Result<(), eyre::Report> {
    let query = DiscoveryQuery::parse([spec.as_str()]).wrap_err("parse discovery query")?;
    let found = world.discovery.find(&query).wrap_err("run discovery query")?;
    world.last_found = Some(found);
    Ok(())
}

#[when(r#"the agent "{name}" deregisters"#)]
fn agent_deregisters(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let agent_id = world.agent_id(&name)?;
    world
        .registry
        .deregister(agent_id)
        .wrap_err("deregister agent")?;
    Ok(())
}

#[when("the liveness sweep runs {later:i64} seconds later with a {timeout:i64} second timeout")]
fn liveness_sweep_runs(world: &mut DiscoveryWorld, later: i64, timeout: i64) {
    let now = Utc::now() + TimeDelta::seconds(later);
    world.expired = world.registry.sweep(now, TimeDelta::seconds(timeout));
}
