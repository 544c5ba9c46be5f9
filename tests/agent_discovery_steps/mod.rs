//! Step definitions for agent discovery behaviour tests.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
