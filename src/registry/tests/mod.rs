//! Unit tests for the registry domain and service.


use crate::capability::domain::Capability;
use crate::registry::domain::{DescriptorFragment, Endpoint};

pub(super) fn fragment(name: &str, capabilities: &[&str]) -> DescriptorFragment {
    let parsed = capabilities
        .iter()
        .map(|text| Capability::parse(text).expect("test capability should parse"));
    DescriptorFragment::new(
        name,
        parsed,
        Endpoint::in_process(name).expect("test endpoint should be valid"),
    )
    .expect("test fragment should be valid")
}
