//! Record assembly
//!
//! Runs the full pipeline for one file: split → YAML → flatten → purpose →
//! dependencies → interaction modes → typed record.

use crate::enrich::{
    read_declared_modes, read_interactions, resolve_dependencies, resolve_interaction_modes,
    resolve_purpose, MarkdownRelations,
};
use crate::error::{ParseError, ParseResult};
use crate::flatten::{check_flow_metrics, flatten};
use crate::frontmatter::{parse_metadata, split};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use topo_model::constants::{team_types, EXTENDED_TEMPLATE_FIELDS};
use topo_model::{FlowMetrics, Position, TeamApi, TeamId, TeamRecord};
use tracing::debug;

/// Parse a team file from disk
///
/// # Errors
/// [`ParseError::Io`] when the file cannot be read, otherwise any error from
/// [`parse_str`].
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<TeamRecord> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| ParseError::io_error(path, e))?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let record = parse_str(&raw, &file_name)?;
    debug!(path = %path.display(), team_id = %record.team_id, "parsed team file");
    Ok(record)
}

/// Parse team file text
///
/// `file_name` is only used in error messages.
///
/// # Errors
/// - [`ParseError::MalformedDocument`] when the front matter is missing or unclosed
/// - [`ParseError::Yaml`] when the front matter is not valid YAML
/// - [`ParseError::MissingIdentifier`] / [`ParseError::InvalidIdentifierFormat`]
/// - [`ParseError::InvalidFlowMetric`] for out-of-range flow metrics
/// - [`ParseError::InvalidField`] when a field has the wrong shape
pub fn parse_str(raw: &str, file_name: &str) -> ParseResult<TeamRecord> {
    let document = split(raw).map_err(|e| ParseError::malformed(file_name, e.to_string()))?;
    let data = parse_metadata(document.metadata, file_name)?;
    let data = flatten(data, file_name)?;

    let relations = MarkdownRelations::extract(document.body);
    let fields = FieldReader::new(&data, file_name);

    let purpose = resolve_purpose(&data);
    let resolved = resolve_dependencies(
        fields.string_list("dependencies")?,
        fields.string_list("dependency_notes")?,
        &relations,
    );

    let interactions = read_interactions(data.get("interactions"));
    let declared_modes = match data.get("interaction_modes") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            read_declared_modes(value)
                .ok_or_else(|| fields.invalid("interaction_modes", "must be a mapping"))?,
        ),
    };
    let interaction_modes = resolve_interaction_modes(declared_modes, &interactions, &relations);

    let team_id = fields.team_id()?;
    let mut record = TeamRecord::new(
        team_id,
        fields.required_string("name")?,
        fields
            .string("team_type")?
            .unwrap_or_else(|| team_types::DEFAULT.to_string()),
    );

    record.description = document.body.to_string();
    record.position = fields.position()?;
    record.dependencies = resolved.dependencies;
    record.dependency_notes = resolved.notes;
    record.interaction_modes = interaction_modes;
    record.interactions = interactions;
    record.metadata = fields.metadata()?;
    record.team_api = fields.deserialize::<TeamApi>("team_api")?;
    record.purpose = purpose;
    record.value_stream = fields.string("value_stream")?;
    record.value_stream_inner = fields.string("value_stream_inner")?;
    record.platform_grouping = fields.string("platform_grouping")?;
    record.platform_grouping_inner = fields.string("platform_grouping_inner")?;
    record.product_line = fields.string("product_line")?;
    record.business_stream = fields.string("business_stream")?;
    record.line_manager = fields.string("line_manager")?;
    record.established = fields.string("established")?;
    record.cognitive_load = fields.string("cognitive_load")?;
    record.size = fields.integer("size")?;
    record.flow_metrics = fields.flow_metrics()?;
    record.extended = fields.extended();

    Ok(record)
}

/// Typed access to front matter fields
///
/// Absent and `null` values read as `None`. A present value of the wrong
/// shape is an [`ParseError::InvalidField`] naming the key.
struct FieldReader<'a> {
    data: &'a Mapping,
    file: &'a str,
}

impl<'a> FieldReader<'a> {
    fn new(data: &'a Mapping, file: &'a str) -> Self {
        Self { data, file }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.data.get(key).filter(|v| !v.is_null())
    }

    fn invalid(&self, key: &str, reason: &str) -> ParseError {
        ParseError::invalid_field(self.file, key, reason)
    }

    fn team_id(&self) -> ParseResult<TeamId> {
        self.get("team_id")
            .and_then(Value::as_str)
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| ParseError::MissingIdentifier {
                file: self.file.to_string(),
            })
    }

    /// Strings as-is; numbers and booleans are coerced
    fn string(&self, key: &str) -> ParseResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(self.invalid(key, "must be a string")),
        }
    }

    fn required_string(&self, key: &str) -> ParseResult<String> {
        self.string(key)?
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| self.invalid(key, "missing required field"))
    }

    fn string_list(&self, key: &str) -> ParseResult<Option<Vec<String>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let Some(items) = value.as_sequence() else {
            return Err(self.invalid(key, "must be a list of strings"));
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(self.invalid(key, "must be a list of strings")),
            })
            .collect::<ParseResult<Vec<_>>>()
            .map(Some)
    }

    fn integer(&self, key: &str) -> ParseResult<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "must be an integer")),
        }
    }

    fn position(&self) -> ParseResult<Position> {
        let Some(value) = self.get("position") else {
            return Ok(Position::default());
        };
        let map = value
            .as_mapping()
            .ok_or_else(|| self.invalid("position", "must be a mapping with x and y"))?;

        let coordinate = |axis: &str| {
            map.get(axis)
                .and_then(Value::as_f64)
                .ok_or_else(|| self.invalid("position", &format!("'{axis}' must be a number")))
        };

        Ok(Position::new(coordinate("x")?, coordinate("y")?))
    }

    fn metadata(&self) -> ParseResult<Mapping> {
        match self.get("metadata") {
            None => Ok(Mapping::new()),
            Some(Value::Mapping(map)) => Ok(map.clone()),
            Some(_) => Err(self.invalid("metadata", "must be a mapping")),
        }
    }

    /// Present extended template sections, in declaration order
    fn extended(&self) -> Mapping {
        EXTENDED_TEMPLATE_FIELDS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (Value::from(*key), value.clone())))
            .collect()
    }

    fn flow_metrics(&self) -> ParseResult<Option<FlowMetrics>> {
        if let Some(value) = self.get("flow_metrics") {
            if !value.is_mapping() {
                return Err(self.invalid("flow_metrics", "must be a mapping"));
            }
            check_flow_metrics(value, self.file)?;
        }
        self.deserialize("flow_metrics")
    }

    fn deserialize<T: DeserializeOwned>(&self, key: &str) -> ParseResult<Option<T>> {
        self.get(key)
            .map(|value| {
                serde_yaml::from_value(value.clone())
                    .map_err(|e| self.invalid(key, &e.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(raw: &str) -> ParseResult<TeamRecord> {
        parse_str(raw, "test.md")
    }

    #[test]
    fn minimal_file() {
        let team = parse("---\nteam_id: a\nname: A\n---\n# A\n").unwrap();
        assert_eq!(team.team_id.as_str(), "a");
        assert_eq!(team.team_type, "other");
        assert_eq!(team.position, Position::default());
        assert_eq!(team.description, "# A");
        assert!(team.dependencies.is_none());
        assert!(team.metadata.is_empty());
    }

    #[test]
    fn extended_sections_are_kept() {
        let team = parse(
            "---\nteam_id: a\nname: A\nsoftware_owned:\n  - billing-api\nroadmap: Q3 migration\nglossary: null\nunknown: x\n---\n",
        )
        .unwrap();
        let keys: Vec<_> = team.extended.iter().filter_map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["roadmap", "software_owned"]);
        assert_eq!(team.extended.get("roadmap").and_then(Value::as_str), Some("Q3 migration"));
    }

    #[test]
    fn missing_front_matter_is_malformed() {
        let err = parse("# Just markdown\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument { .. }));
        assert!(err.to_string().contains("test.md"));

        let err = parse("---\nteam_id: a\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument { .. }));
    }

    #[test]
    fn missing_name_is_invalid_field() {
        let err = parse("---\nteam_id: a\n---\n").unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn position_must_be_numeric() {
        let team = parse("---\nteam_id: a\nname: A\nposition:\n  x: 10\n  y: 20.5\n---\n").unwrap();
        assert_eq!(team.position, Position::new(10.0, 20.5));

        let err = parse("---\nteam_id: a\nname: A\nposition:\n  x: left\n  y: 1\n---\n").unwrap_err();
        assert_eq!(err.field(), Some("position"));

        let err = parse("---\nteam_id: a\nname: A\nposition: [1, 2]\n---\n").unwrap_err();
        assert_eq!(err.field(), Some("position"));
    }

    #[test]
    fn size_must_be_integer() {
        let err = parse("---\nteam_id: a\nname: A\nsize: lots\n---\n").unwrap_err();
        assert_eq!(err.field(), Some("size"));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let team = parse("---\nteam_id: a\nname: 2024\nvalue_stream: 7\n---\n").unwrap();
        assert_eq!(team.name, "2024");
        assert_eq!(team.value_stream.as_deref(), Some("7"));
    }

    #[test]
    fn list_valued_string_field_is_rejected() {
        let err = parse("---\nteam_id: a\nname: A\nvalue_stream: [x]\n---\n").unwrap_err();
        assert_eq!(err.field(), Some("value_stream"));
    }

    #[test]
    fn top_level_flow_metrics_are_validated() {
        let err = parse("---\nteam_id: a\nname: A\nflow_metrics:\n  mttr_hours: -2\n---\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFlowMetric { field: "mttr_hours", .. }));
    }

    #[test]
    fn flattened_fields_land_on_record() {
        let team = parse(
            "---\nteam_id: a\nname: A\nmetadata:\n  size: 6\n  cognitive_load: medium\n  established: 2020-01\n  line_manager: Kim\n---\n",
        )
        .unwrap();
        assert_eq!(team.size, Some(6));
        assert_eq!(team.cognitive_load.as_deref(), Some("medium"));
        assert_eq!(team.established.as_deref(), Some("2020-01"));
        assert_eq!(team.line_manager.as_deref(), Some("Kim"));
        assert!(team.metadata.contains_key("size"));
    }

    #[test]
    fn team_api_is_typed() {
        let team = parse(
            "---\nteam_id: a\nname: A\nteam_api:\n  purpose: Serve\n  services_provided: [Auth]\n  contact:\n    slack: '#a'\n---\n",
        )
        .unwrap();
        let api = team.team_api.unwrap();
        assert_eq!(api.services_provided, Some(vec!["Auth".to_string()]));
        assert_eq!(api.contact.unwrap()["slack"], "#a");
        assert_eq!(team.purpose.as_deref(), Some("Serve"));
    }
}
