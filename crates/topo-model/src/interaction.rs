//! Interaction modes between teams

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Team Topologies interaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// Two teams working closely together for a period of time
    Collaboration,
    /// One team consumes something another provides with minimal collaboration
    XAsAService,
    /// One team helps another to learn or adopt new practices
    Facilitating,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 3] = [
        InteractionMode::Collaboration,
        InteractionMode::XAsAService,
        InteractionMode::Facilitating,
    ];

    /// Canonical wire name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collaboration => "collaboration",
            Self::XAsAService => "x-as-a-service",
            Self::Facilitating => "facilitating",
        }
    }

    /// Classify free text, if it mentions one of the known modes
    ///
    /// Lowercases the input and checks substrings in priority order:
    /// `x-as-a-service`/`xaas`, then `collaboration`, then `facilitat`.
    #[must_use]
    pub fn classify(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();
        if lower.contains("x-as-a-service") || lower.contains("xaas") {
            Some(Self::XAsAService)
        } else if lower.contains("collaboration") {
            Some(Self::Collaboration)
        } else if lower.contains("facilitat") {
            Some(Self::Facilitating)
        } else {
            None
        }
    }
}

impl Display for InteractionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionMode {
    type Err = String;

    /// Strict parse: only the canonical names are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Normalize free-form interaction text to a canonical mode name
///
/// Unknown text passes through lowercased and trimmed, so misspelled or newer
/// modes are kept rather than rejected.
#[must_use]
pub fn normalize_interaction_mode(raw: &str) -> String {
    match InteractionMode::classify(raw) {
        Some(mode) => mode.as_str().to_string(),
        None => raw.trim().to_lowercase(),
    }
}

/// One entry of a team's structured `interactions` list
///
/// Read from either key convention (`team_id`/`interaction_mode` or the
/// legacy `team`/`mode`), always written with the preferred keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Target team (id or display name)
    pub team_id: String,
    /// Mode text as written in the file
    pub interaction_mode: String,
    /// Optional free-text reason for the interaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

impl Interaction {
    #[inline]
    #[must_use]
    pub fn new(team_id: impl Into<String>, interaction_mode: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            interaction_mode: interaction_mode.into(),
            purpose: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xaas_variants_normalize() {
        assert_eq!(normalize_interaction_mode("X-AS-A-SERVICE"), "x-as-a-service");
        assert_eq!(normalize_interaction_mode("XaaS"), "x-as-a-service");
        assert_eq!(normalize_interaction_mode(" x-as-a-service "), "x-as-a-service");
    }

    #[test]
    fn priority_prefers_xaas_over_collaboration() {
        assert_eq!(
            normalize_interaction_mode("Collaboration, moving to XaaS"),
            "x-as-a-service"
        );
    }

    #[test]
    fn facilitating_matches_stem() {
        assert_eq!(normalize_interaction_mode("Facilitation"), "facilitating");
        assert_eq!(normalize_interaction_mode("facilitating"), "facilitating");
    }

    #[test]
    fn unknown_text_passes_through_lowercased() {
        assert_eq!(normalize_interaction_mode("Pairing "), "pairing");
    }

    #[test]
    fn strict_parse_only_accepts_canonical() {
        assert_eq!(
            "x-as-a-service".parse::<InteractionMode>(),
            Ok(InteractionMode::XAsAService)
        );
        assert!("XaaS".parse::<InteractionMode>().is_err());
    }
}
