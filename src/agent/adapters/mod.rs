//! Agent runtime adapters.

mod static_agent;

pub use static_agent::{InvocationHandler, StaticAgent};
