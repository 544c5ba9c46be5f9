//! Unit tests for agent domain types and lifecycle services.


use crate::capability::domain::Capability;
use crate::registry::domain::{DescriptorFragment, Endpoint};

pub(super) fn capability(text: &str) -> Capability {
    Capability::parse(text).expect("test capability should parse")
}

pub(super) fn fragment(name: &str, capabilities: &[&str]) -> DescriptorFragment {
    DescriptorFragment::new(
        name,
        capabilities.iter().map(|text| capability(text)),
        Endpoint::in_process(name).expect("test endpoint should be valid"),
    )
    .expect("test fragment should be valid")
}
