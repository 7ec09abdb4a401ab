//! Relationship enrichment
//!
//! Dependencies and interaction modes can be declared in YAML, in a
//! structured `interactions` list, in a markdown table or in a bullet list.
//! [`markdown`] extracts what the body says; [`resolve`] applies precedence.

pub mod markdown;
pub mod resolve;

pub use markdown::{
    looks_like_narrative_note, parse_dependency_bullets, parse_interaction_table,
    section_lines, BulletExtraction, TableExtraction,
};
pub use resolve::{
    read_declared_modes, read_interactions, resolve_dependencies, resolve_interaction_modes,
    resolve_purpose, MarkdownRelations, ResolvedDependencies,
};
