//! Chapters bundled with the crate

use super::source::EmbeddedSource;
use super::ContentRegistry;
use crate::types::SectionId;
use std::sync::Arc;

/// (section, chapter slug, chapter JSON) in reading order
const BUNDLED: &[(SectionId, &str, &str)] = &[
    (
        SectionId::Language,
        "pointers-intro",
        include_str!("../../content/core-language/pointers-intro.json"),
    ),
    (
        SectionId::Language,
        "loops",
        include_str!("../../content/core-language/loops.json"),
    ),
    (
        SectionId::Projects,
        "shell",
        include_str!("../../content/projects/shell.json"),
    ),
    (
        SectionId::Practices,
        "testing",
        include_str!("../../content/best-practices/testing.json"),
    ),
    (
        SectionId::Environment,
        "compilers",
        include_str!("../../content/dev-environment/compilers.json"),
    ),
];

pub(super) fn register_bundled(registry: &mut ContentRegistry) {
    for &(section, chapter, json) in BUNDLED {
        registry.register(section, chapter, Arc::new(EmbeddedSource::new(chapter, json)));
    }
}
