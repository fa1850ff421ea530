//! Layering contract: inner layers never reach outward.

mod support;

use support::architecture::find_lines_containing;

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
        ],
    );
    assert!(hits.is_empty(), "forbidden imports in domain layer: {hits:#?}");
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application", "reqwest::"],
    );
    assert!(hits.is_empty(), "forbidden imports in port layer: {hits:#?}");
}

#[test]
fn application_does_not_know_adapters() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter", "crate::infrastructure", "reqwest::", "teloxide::"],
    );
    assert!(hits.is_empty(), "application reaches into adapters: {hits:#?}");
}
