//! Dynamus: agent registry and capability-based discovery.
//!
//! Agents describe themselves with versioned, parameterised capabilities,
//! register with an in-memory [`registry::services::AgentRegistry`], keep
//! their entries alive with heartbeats, and are found by capability through
//! [`discovery::services::DiscoveryService`]. Agents that stop heartbeating
//! are expired by the liveness sweep.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: value types, invariants and state machines
//! - **Ports**: trait contracts implemented by agents
//! - **Adapters**: concrete agent implementations
//! - **Services**: registry, discovery and supervision orchestration
//!
//! # Modules
//!
//! - [`capability`]: capability names, versions, parameters and matching
//! - [`agent`]: the agent runtime contract, lifecycle guard and supervisor
//! - [`registry`]: the live directory, liveness sweep and change events
//! - [`discovery`]: capability lookup and change subscriptions
//! - [`config`]: registry and discovery settings
//! - [`error`]: the crate-wide error taxonomy

pub mod agent;
pub mod capability;
pub mod config;
pub mod discovery;
pub mod error;
pub mod registry;
