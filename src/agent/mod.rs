//! Agent runtime contract and lifecycle management.
//!
//! Every agent implementation satisfies the [`ports::AgentRuntime`]
//! contract (initialize, start, stop, health, describe, invoke). The
//! registry only ever talks to agents through that contract, so concrete
//! agent types are interchangeable. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Lifecycle guard and supervision in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
