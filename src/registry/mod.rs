//! Authoritative in-memory directory of live agents.
//!
//! Agents register a [`domain::DescriptorFragment`], keep themselves alive
//! with heartbeats, and leave by deregistering or by going silent long
//! enough for the liveness sweep to expire them. Every mutation bumps the
//! entry's revision and publishes a [`domain::RegistryEvent`].
//!
//! - Domain types in [`domain`]
//! - Registry, capability index and sweeper in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
