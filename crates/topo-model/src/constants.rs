//! Shared constants: team types, markdown section headings, field names and
//! configuration file names.

/// Team Topologies team types (fixed set for the `tt` view)
pub mod team_types {
    pub const STREAM_ALIGNED: &str = "stream-aligned";
    pub const PLATFORM: &str = "platform";
    pub const ENABLING: &str = "enabling";
    pub const COMPLICATED_SUBSYSTEM: &str = "complicated-subsystem";
    pub const UNDEFINED: &str = "undefined";

    /// Team type assigned when a file omits `team_type`
    pub const DEFAULT: &str = "other";

    pub const TT_TYPES: [&str; 5] = [
        STREAM_ALIGNED,
        PLATFORM,
        ENABLING,
        COMPLICATED_SUBSYSTEM,
        UNDEFINED,
    ];

    /// Hierarchy containers accepted as team types in the baseline view
    pub const ORGANIZATION_TYPES: [&str; 5] =
        ["department", "executive", "leadership", "region", "division"];
}

/// Markdown headings the relationship enricher looks for
pub mod sections {
    pub const INTERACTIONS_HEADER: &str = "## Teams we currently interact with";
    pub const DEPENDENCIES_HEADER: &str = "## Dependencies";

    /// Column title identifying the header row of the interaction table
    pub const TEAM_NAME_COLUMN: &str = "Team Name";
}

/// Recommended team size band
pub mod team_size {
    pub const MIN_RECOMMENDED: i64 = 5;
    pub const MAX_RECOMMENDED: i64 = 9;
    pub const MIN_VALID: i64 = 1;
}

/// Field names accepted in a YAML `interactions` entry
pub mod interaction_fields {
    /// Preferred target key
    pub const TEAM_ID: &str = "team_id";
    /// Preferred mode key
    pub const INTERACTION_MODE: &str = "interaction_mode";
    /// Legacy target key
    pub const TEAM: &str = "team";
    /// Legacy mode key
    pub const MODE: &str = "mode";
    pub const PURPOSE: &str = "purpose";
}

/// Optional top-level template sections kept verbatim on a record
pub const EXTENDED_TEMPLATE_FIELDS: &[&str] = &[
    "roadmap",
    "current_work",
    "software_owned",
    "versioning",
    "testing_approach",
    "practices_principles",
    "communication_preferences",
    "glossary",
    "documentation_links",
    "platform_product_metrics",
    "customer_problems",
    "team_members",
];

/// Per-view JSON configuration files living next to the team files
pub mod config_files {
    pub const TT_TEAM_TYPES: &str = "tt-team-types.json";
    pub const BASELINE_TEAM_TYPES: &str = "baseline-team-types.json";
    pub const PRODUCTS: &str = "products.json";
    pub const BUSINESS_STREAMS: &str = "business-streams.json";
    pub const ORGANIZATION_HIERARCHY: &str = "organization-hierarchy.json";
}

/// Team file extension (without dot)
pub const TEAM_FILE_EXTENSION: &str = "md";
