//! Compatibility rules between requested and offered capabilities.

use crate::capability::domain::{Capability, ParameterConstraint, matches};
use rstest::rstest;

fn capability(text: &str) -> Capability {
    Capability::parse(text).expect("test capability should parse")
}

// ── Name and version ───────────────────────────────────────────────

#[rstest]
#[case("text.summarize@1.0.0", "text.summarize@1.0.0", true)]
#[case("text.summarize@1.0.0", "text.summarize@1.4.0", true)]
#[case("text.summarize@1.2.0", "text.summarize@1.2.7", true)]
#[case("text.summarize@1.4.0", "text.summarize@1.3.9", false)]
#[case("text.summarize@1.0.1", "text.summarize@1.0.0", false)]
#[case("text.summarize@1.0.0", "text.summarize@2.0.0", false)]
#[case("text.summarize@2.0.0", "text.summarize@1.9.9", false)]
#[case("text.summarize@1.0.0", "text.translate@1.0.0", false)]
#[case("text.summarize@1.0.0", "Text.Summarize@1.0.0", false)]
fn version_and_name_rules(#[case] requested: &str, #[case] offered: &str, #[case] expected: bool) {
    assert_eq!(
        matches(&capability(requested), &capability(offered)),
        expected,
        "{requested} against {offered}"
    );
}

// ── Parameters ─────────────────────────────────────────────────────

#[rstest]
#[case("image.resize@2.0.0", "image.resize@2.1.0?format=png", true)]
#[case("image.resize@2.0.0?format=png", "image.resize@2.1.0", false)]
#[case("image.resize@2.0.0?format=png", "image.resize@2.1.0?format=png", true)]
#[case("image.resize@2.0.0?format=gif", "image.resize@2.1.0?format=png", false)]
#[case("image.resize@2.0.0?format=png", "image.resize@2.1.0?format=jpeg|png", true)]
#[case("image.resize@2.0.0?format=gif|png", "image.resize@2.1.0?format=png", true)]
#[case("image.resize@2.0.0?format=gif|bmp", "image.resize@2.1.0?format=jpeg|png", false)]
#[case("image.resize@2.0.0?format=gif|png", "image.resize@2.1.0?format=png|webp", true)]
#[case("image.resize@2.0.0?width=1024", "image.resize@2.1.0?width=1..4096", true)]
#[case("image.resize@2.0.0?width=8192", "image.resize@2.1.0?width=1..4096", false)]
#[case("image.resize@2.0.0?width=wide", "image.resize@2.1.0?width=1..4096", false)]
#[case("image.resize@2.0.0?width=2000..", "image.resize@2.1.0?width=1..4096", true)]
#[case("image.resize@2.0.0?width=5000..", "image.resize@2.1.0?width=1..4096", false)]
#[case("image.resize@2.0.0?width=..10", "image.resize@2.1.0?width=10..", true)]
#[case("image.resize@2.0.0?width=..9", "image.resize@2.1.0?width=10..", false)]
#[case("image.resize@2.0.0?width=512..", "image.resize@2.1.0?width=1024", true)]
#[case("image.resize@2.0.0?width=100|5000", "image.resize@2.1.0?width=..4096", true)]
#[case(
    "image.resize@2.0.0?format=png&width=100",
    "image.resize@2.1.0?format=png",
    false
)]
#[case(
    "image.resize@2.0.0?format=png&width=100",
    "image.resize@2.1.0?dpi=300&format=png&width=1..4096",
    true
)]
fn parameter_constraint_rules(
    #[case] requested: &str,
    #[case] offered: &str,
    #[case] expected: bool,
) {
    assert_eq!(
        matches(&capability(requested), &capability(offered)),
        expected,
        "{requested} against {offered}"
    );
}

#[rstest]
fn unbounded_ranges_always_overlap() {
    let requested = ParameterConstraint::range("n", Some(5), None).expect("valid range");
    let offered = ParameterConstraint::range("n", None, Some(100)).expect("valid range");
    assert!(requested.is_satisfied_by(&offered));
}

#[rstest]
fn free_function_agrees_with_method() {
    let requested = capability("text.summarize@1.0.0?lang=en");
    let offered = capability("text.summarize@1.1.0?lang=en|fr");
    assert_eq!(
        matches(&requested, &offered),
        requested.is_satisfied_by(&offered)
    );
}
