//! Canonical team record

use crate::constants::team_types;
use crate::flow::FlowMetrics;
use crate::interaction::Interaction;
use crate::slug::slugify;
use crate::team_id::TeamId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;

/// Canvas coordinate of a team, presentation only
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Neither coordinate is NaN or infinite
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Extended Team API published by a team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamApi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services_provided: Option<Vec<String>>,
    /// Channel → address, e.g. `slack: "#team"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<String>,
}

/// One parsed team file
///
/// Built fresh on every parse; the file on disk stays the source of truth.
/// Fields copied out of `metadata` (size, cognitive load, ...) remain in the
/// `metadata` bag as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team_id: TeamId,
    pub name: String,
    pub team_type: String,
    /// Markdown body, trimmed
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub position: Position,

    /// `None` when no source declared any dependency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_notes: Option<Vec<String>>,
    /// Target team (name or id) → mode
    #[serde(default)]
    pub interaction_modes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<Interaction>,

    #[serde(default)]
    pub metadata: Mapping,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_api: Option<TeamApi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_stream: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_stream_inner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_grouping: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_grouping_inner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_stream: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_manager: Option<String>,

    /// `YYYY-MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established: Option<String>,
    /// low | medium | high | very-high
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_load: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_metrics: Option<FlowMetrics>,

    /// Extended template sections (`roadmap`, `software_owned`, ...), unvalidated
    #[serde(default, skip_serializing_if = "Mapping::is_empty")]
    pub extended: Mapping,
}

impl TeamRecord {
    /// Minimal record with every optional field empty
    #[must_use]
    pub fn new(team_id: TeamId, name: impl Into<String>, team_type: impl Into<String>) -> Self {
        Self {
            team_id,
            name: name.into(),
            team_type: team_type.into(),
            description: String::new(),
            position: Position::default(),
            dependencies: None,
            dependency_notes: None,
            interaction_modes: IndexMap::new(),
            interactions: Vec::new(),
            metadata: Mapping::new(),
            team_api: None,
            purpose: None,
            value_stream: None,
            value_stream_inner: None,
            platform_grouping: None,
            platform_grouping_inner: None,
            product_line: None,
            business_stream: None,
            line_manager: None,
            established: None,
            cognitive_load: None,
            size: None,
            flow_metrics: None,
            extended: Mapping::new(),
        }
    }

    /// Slug derived from the display name
    #[inline]
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Dependencies as a slice (empty when absent)
    #[inline]
    #[must_use]
    pub fn dependency_list(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or_default()
    }

    /// Mode recorded for a counterpart team
    #[inline]
    #[must_use]
    pub fn interaction_mode_with(&self, team: &str) -> Option<&str> {
        self.interaction_modes.get(team).map(String::as_str)
    }

    /// Whether the team type is one of the Team Topologies core types
    #[must_use]
    pub fn is_core_team_type(&self) -> bool {
        team_types::TT_TYPES.contains(&self.team_type.as_str())
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_interaction(mut self, team: impl Into<String>, mode: impl Into<String>) -> Self {
        self.interaction_modes.insert(team.into(), mode.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TeamRecord {
        TeamRecord::new("platform-a".parse().unwrap(), "Platform A", "platform")
    }

    #[test]
    fn new_record_has_defaults() {
        let team = record();
        assert_eq!(team.position, Position::new(0.0, 0.0));
        assert!(team.dependencies.is_none());
        assert!(team.dependency_list().is_empty());
        assert!(team.interaction_modes.is_empty());
        assert!(team.is_core_team_type());
    }

    #[test]
    fn interaction_lookup() {
        let team = record().with_interaction("Squad B", "collaboration");
        assert_eq!(team.interaction_mode_with("Squad B"), Some("collaboration"));
        assert_eq!(team.interaction_mode_with("Squad C"), None);
    }

    #[test]
    fn json_omits_absent_optionals() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["team_id"], "platform-a");
        assert!(json.get("dependencies").is_none());
        assert!(json.get("flow_metrics").is_none());
        assert_eq!(json["position"]["x"], 0.0);
    }
}
