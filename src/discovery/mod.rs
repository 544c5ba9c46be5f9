//! Capability-based lookup and change subscriptions over the registry.
//!
//! Discovery is read-only: it never mutates the registry and never blocks
//! registration or heartbeats. "No match" is an empty result, not an error.
//!
//! - Queries, selection policies and subscription events in [`domain`]
//! - The discovery service and subscription handles in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
