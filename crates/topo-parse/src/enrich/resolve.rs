//! Precedence resolvers
//!
//! One pure function per relationship type. Each takes the values declared in
//! YAML plus what was extracted from the markdown body, and returns the
//! winning value. Nothing here fails: heuristic ambiguity is never an error.

use super::markdown::{parse_dependency_bullets, parse_interaction_table, BulletExtraction, TableExtraction};
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use topo_model::constants::interaction_fields;
use topo_model::Interaction;

/// Everything the markdown body says about relationships
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownRelations {
    pub table: TableExtraction,
    pub bullets: BulletExtraction,
}

impl MarkdownRelations {
    /// Run both extractors over a document body
    #[must_use]
    pub fn extract(markdown: &str) -> Self {
        Self {
            table: parse_interaction_table(markdown),
            bullets: parse_dependency_bullets(markdown),
        }
    }
}

/// Resolved dependency fields; `None` means leave the record field absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    pub dependencies: Option<Vec<String>>,
    pub notes: Option<Vec<String>>,
}

/// Pick the team's purpose
///
/// A non-empty top-level `purpose` wins, then `team_api.purpose`, then
/// `metadata.purpose`.
#[must_use]
pub fn resolve_purpose(data: &Mapping) -> Option<String> {
    let nested = |parent: &str| {
        data.get(parent)
            .and_then(Value::as_mapping)
            .and_then(|map| map.get("purpose"))
    };

    [data.get("purpose"), nested("team_api"), nested("metadata")]
        .into_iter()
        .flatten()
        .find_map(non_empty_text)
}

/// Pick dependencies and notes
///
/// 1. Non-empty declared dependencies are authoritative.
/// 2. Otherwise the interaction table supplies names, falling back to the
///    bullet list when the table is empty.
/// 3. Bullet notes are attached whenever no notes were declared.
///
/// Dependencies stay `None` unless the winning list is non-empty.
#[must_use]
pub fn resolve_dependencies(
    declared: Option<Vec<String>>,
    declared_notes: Option<Vec<String>>,
    relations: &MarkdownRelations,
) -> ResolvedDependencies {
    let notes = declared_notes.or_else(|| {
        let harvested = &relations.bullets.notes;
        (!harvested.is_empty()).then(|| harvested.clone())
    });

    if let Some(list) = declared.filter(|list| !list.is_empty()) {
        return ResolvedDependencies {
            dependencies: Some(list),
            notes,
        };
    }

    let names = if relations.table.dependencies.is_empty() {
        &relations.bullets.dependencies
    } else {
        &relations.table.dependencies
    };

    ResolvedDependencies {
        dependencies: (!names.is_empty()).then(|| names.clone()),
        notes,
    }
}

/// Read a structured `interactions` list
///
/// Accepts `team_id` or `team` for the target and `interaction_mode` or
/// `mode` for the mode, preferring the former. Entries that are not mappings
/// or lack a non-empty target or mode are dropped.
#[must_use]
pub fn read_interactions(value: Option<&Value>) -> Vec<Interaction> {
    let Some(entries) = value.and_then(Value::as_sequence) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_mapping)
        .filter_map(|entry| {
            let team = first_text(entry, &[interaction_fields::TEAM_ID, interaction_fields::TEAM])?;
            let mode = first_text(
                entry,
                &[interaction_fields::INTERACTION_MODE, interaction_fields::MODE],
            )?;
            let interaction = Interaction::new(team, mode);
            Some(match entry.get(interaction_fields::PURPOSE).and_then(non_empty_text) {
                Some(purpose) => interaction.with_purpose(purpose),
                None => interaction,
            })
        })
        .collect()
}

/// Read a declared `interaction_modes` map
///
/// The canonical shape is `team → mode`. The legacy shape `mode → [teams]`
/// is inverted into it. Returns `None` when the value is not a mapping.
#[must_use]
pub fn read_declared_modes(value: &Value) -> Option<IndexMap<String, String>> {
    let map = value.as_mapping()?;
    let mut modes = IndexMap::with_capacity(map.len());

    for (key, value) in map {
        let Some(key) = scalar_text(key) else {
            continue;
        };
        match value {
            Value::Sequence(teams) => {
                for team in teams.iter().filter_map(scalar_text) {
                    modes.insert(team, key.clone());
                }
            }
            other => {
                if let Some(mode) = scalar_text(other) {
                    modes.insert(key, mode);
                }
            }
        }
    }

    Some(modes)
}

/// Pick interaction modes
///
/// A declared map is used as-is, even when empty. Otherwise a non-empty
/// result from the `interactions` list wins, then the table's mode column.
#[must_use]
pub fn resolve_interaction_modes(
    declared: Option<IndexMap<String, String>>,
    interactions: &[Interaction],
    relations: &MarkdownRelations,
) -> IndexMap<String, String> {
    if let Some(modes) = declared {
        return modes;
    }

    if !interactions.is_empty() {
        return interactions
            .iter()
            .map(|i| (i.team_id.clone(), i.interaction_mode.clone()))
            .collect();
    }

    relations.table.interaction_modes.clone()
}

fn first_text(entry: &Mapping, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find_map(non_empty_text)
}

fn non_empty_text(value: &Value) -> Option<String> {
    scalar_text(value).filter(|s| !s.trim().is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    fn mapping(src: &str) -> Mapping {
        serde_yaml::from_str(src).unwrap()
    }

    const BODY: &str = "\
## Teams we currently interact with

| Team Name | Interaction Mode | Purpose |
|-----------|------------------|---------|
| Squad B | Collaboration | pairing |

## Dependencies
- **Database Team**: schema changes
";

    #[test]
    fn purpose_precedence() {
        assert_eq!(
            resolve_purpose(&mapping("purpose: Top\nteam_api:\n  purpose: Api")),
            Some("Top".to_string())
        );
        assert_eq!(
            resolve_purpose(&mapping("purpose: ''\nteam_api:\n  purpose: Api\nmetadata:\n  purpose: Meta")),
            Some("Api".to_string())
        );
        assert_eq!(
            resolve_purpose(&mapping("metadata:\n  purpose: Meta")),
            Some("Meta".to_string())
        );
        assert_eq!(resolve_purpose(&mapping("name: A")), None);
    }

    #[test]
    fn declared_dependencies_win_but_notes_are_harvested() {
        let relations = MarkdownRelations::extract(BODY);
        let resolved = resolve_dependencies(Some(vec!["Team C".into()]), None, &relations);
        assert_eq!(resolved.dependencies, Some(vec!["Team C".to_string()]));
        assert_eq!(
            resolved.notes,
            Some(vec!["Database Team: schema changes".to_string()])
        );
    }

    #[test]
    fn declared_notes_are_kept() {
        let relations = MarkdownRelations::extract(BODY);
        let resolved = resolve_dependencies(None, Some(vec!["mine".into()]), &relations);
        assert_eq!(resolved.notes, Some(vec!["mine".to_string()]));
        assert_eq!(resolved.dependencies, Some(vec!["Squad B".to_string()]));
    }

    #[test]
    fn empty_declared_list_falls_through_to_table() {
        let relations = MarkdownRelations::extract(BODY);
        let resolved = resolve_dependencies(Some(Vec::new()), None, &relations);
        assert_eq!(resolved.dependencies, Some(vec!["Squad B".to_string()]));
    }

    #[test]
    fn bullets_used_without_table() {
        let relations = MarkdownRelations::extract("## Dependencies\n- Payments Team\n");
        let resolved = resolve_dependencies(None, None, &relations);
        assert_eq!(resolved.dependencies, Some(vec!["Payments Team".to_string()]));
        assert_eq!(resolved.notes, None);
    }

    #[test]
    fn nothing_found_leaves_dependencies_absent() {
        let resolved = resolve_dependencies(None, None, &MarkdownRelations::default());
        assert_eq!(resolved, ResolvedDependencies::default());
    }

    #[test]
    fn interactions_accept_both_conventions() {
        let value = yaml(
            "- team_id: squad-b\n  interaction_mode: collaboration\n  purpose: Build API\n\
             - team: Data Team\n  mode: x-as-a-service\n\
             - team_id: orphan\n\
             - mode: facilitating\n\
             - just a string\n",
        );
        let interactions = read_interactions(Some(&value));
        assert_eq!(
            interactions,
            vec![
                Interaction::new("squad-b", "collaboration").with_purpose("Build API"),
                Interaction::new("Data Team", "x-as-a-service"),
            ]
        );
    }

    #[test]
    fn preferred_keys_win_over_legacy() {
        let value = yaml("- team_id: a\n  team: b\n  interaction_mode: collaboration\n  mode: facilitating\n");
        assert_eq!(
            read_interactions(Some(&value)),
            vec![Interaction::new("a", "collaboration")]
        );
    }

    #[test]
    fn declared_modes_are_used_as_is() {
        let relations = MarkdownRelations::extract(BODY);
        let declared = read_declared_modes(&yaml("Team X: facilitating"));
        let modes = resolve_interaction_modes(declared, &[], &relations);
        assert_eq!(modes.len(), 1);
        assert_eq!(modes["Team X"], "facilitating");

        let empty = read_declared_modes(&yaml("{}"));
        assert!(resolve_interaction_modes(empty, &[], &relations).is_empty());
    }

    #[test]
    fn legacy_mode_map_is_inverted() {
        let modes = read_declared_modes(&yaml("collaboration: [A, B]\nfacilitating:\n  - C\n")).unwrap();
        assert_eq!(modes["A"], "collaboration");
        assert_eq!(modes["B"], "collaboration");
        assert_eq!(modes["C"], "facilitating");
    }

    #[test]
    fn interactions_beat_table() {
        let relations = MarkdownRelations::extract(BODY);
        let interactions = vec![Interaction::new("squad-c", "facilitating")];
        let modes = resolve_interaction_modes(None, &interactions, &relations);
        assert_eq!(modes.keys().collect::<Vec<_>>(), vec!["squad-c"]);
    }

    #[test]
    fn table_modes_are_the_fallback() {
        let relations = MarkdownRelations::extract(BODY);
        let modes = resolve_interaction_modes(None, &[], &relations);
        assert_eq!(modes["Squad B"], "collaboration");
    }
}
