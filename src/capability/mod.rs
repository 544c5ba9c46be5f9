//! Capability model for agent discovery.
//!
//! A capability is a named, versioned skill with optional parameter
//! constraints, written canonically as `name@major.minor.patch[?key=value&...]`.
//! Agents declare the capabilities they offer and consumers ask for the
//! capabilities they require; [`domain::matches`] decides whether an offer
//! satisfies a request.
//!
//! The module is pure domain logic with no side effects:
//!
//! - Domain types in [`domain`]

pub mod domain;

#[cfg(test)]
mod tests;
