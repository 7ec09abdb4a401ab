//! Metadata flattening
//!
//! Convenience fields nested under `metadata:` are copied to the top level of
//! the front matter map. The policy is a declarative rule table: each rule
//! names a source key, whether an existing top-level value wins, the shape the
//! nested value must have, and an optional validator.

use crate::error::{ParseError, ParseResult};
use serde_yaml::{Mapping, Value};
use topo_model::{FlowMetrics, TeamId};

/// What to do when the key already exists at the top level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Nested value overwrites the top-level one
    Always,
    /// Top-level value wins
    IfAbsent,
}

/// Shape a nested value must have for the rule to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Any,
    Mapping,
}

/// Validator run on the nested value before it is copied
pub type FieldCheck = fn(&Value, &str) -> ParseResult<()>;

/// One flattening rule
#[derive(Debug, Clone, Copy)]
pub struct FlattenRule {
    pub key: &'static str,
    pub policy: CopyPolicy,
    pub shape: Shape,
    pub check: Option<FieldCheck>,
}

impl FlattenRule {
    const fn new(key: &'static str, policy: CopyPolicy) -> Self {
        Self {
            key,
            policy,
            shape: Shape::Any,
            check: None,
        }
    }

    const fn validated(key: &'static str, shape: Shape, check: FieldCheck) -> Self {
        Self {
            key,
            policy: CopyPolicy::Always,
            shape,
            check: Some(check),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self.shape {
            Shape::Any => true,
            Shape::Mapping => value.is_mapping(),
        }
    }
}

/// Rules applied in order by [`flatten`]
pub const FLATTEN_RULES: &[FlattenRule] = &[
    FlattenRule::new("established", CopyPolicy::Always),
    FlattenRule::new("cognitive_load", CopyPolicy::Always),
    FlattenRule::new("size", CopyPolicy::Always),
    FlattenRule::validated("flow_metrics", Shape::Mapping, check_flow_metrics),
    FlattenRule::new("business_stream", CopyPolicy::IfAbsent),
    FlattenRule::new("value_stream", CopyPolicy::IfAbsent),
    FlattenRule::new("platform_grouping", CopyPolicy::IfAbsent),
    FlattenRule::new("line_manager", CopyPolicy::IfAbsent),
];

/// Validate `team_id` and copy nested metadata fields to the top level
///
/// Nested values are copied, never removed from `metadata`.
///
/// # Errors
/// - [`ParseError::MissingIdentifier`] when `team_id` is absent or empty
/// - [`ParseError::InvalidIdentifierFormat`] when it is not slug-safe
/// - [`ParseError::InvalidFlowMetric`] when a nested flow metric is invalid
pub fn flatten(mut data: Mapping, file: &str) -> ParseResult<Mapping> {
    validate_identifier(&data, file)?;

    let Some(metadata) = data.get("metadata").and_then(Value::as_mapping).cloned() else {
        return Ok(data);
    };

    for rule in FLATTEN_RULES {
        let Some(value) = metadata.get(rule.key) else {
            continue;
        };
        if !rule.accepts(value) {
            continue;
        }
        if rule.policy == CopyPolicy::IfAbsent && data.contains_key(rule.key) {
            continue;
        }
        if let Some(check) = rule.check {
            check(value, file)?;
        }
        data.insert(Value::from(rule.key), value.clone());
    }

    Ok(data)
}

/// Check the `team_id` key of a front matter map
///
/// # Errors
/// See [`flatten`].
pub fn validate_identifier(data: &Mapping, file: &str) -> ParseResult<()> {
    match data.get("team_id") {
        None | Some(Value::Null) => Err(ParseError::MissingIdentifier {
            file: file.to_string(),
        }),
        Some(Value::String(id)) if id.is_empty() => Err(ParseError::MissingIdentifier {
            file: file.to_string(),
        }),
        Some(Value::String(id)) if TeamId::is_valid(id) => Ok(()),
        Some(other) => Err(ParseError::InvalidIdentifierFormat {
            value: display_value(other),
            file: file.to_string(),
        }),
    }
}

/// Validate a `flow_metrics` mapping
///
/// # Errors
/// Returns [`ParseError::InvalidFlowMetric`] naming the first bad field.
pub fn check_flow_metrics(value: &Value, file: &str) -> ParseResult<()> {
    let Some(map) = value.as_mapping() else {
        return Ok(());
    };
    FlowMetrics::validate_mapping(map).map_err(|violation| ParseError::InvalidFlowMetric {
        field: violation.field,
        file: file.to_string(),
        reason: violation.reason,
    })
}

/// Render a YAML scalar the way it appears in the file
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn missing_team_id_fails() {
        let err = flatten(data("name: A"), "a.md").unwrap_err();
        assert!(matches!(err, ParseError::MissingIdentifier { .. }));

        let err = flatten(data("team_id: ''"), "a.md").unwrap_err();
        assert!(matches!(err, ParseError::MissingIdentifier { .. }));

        let err = flatten(data("team_id:"), "a.md").unwrap_err();
        assert!(matches!(err, ParseError::MissingIdentifier { .. }));
    }

    #[test]
    fn invalid_team_id_fails_with_value() {
        let err = flatten(data("team_id: API_Gateway"), "api.md").unwrap_err();
        match err {
            ParseError::InvalidIdentifierFormat { value, file } => {
                assert_eq!(value, "API_Gateway");
                assert_eq!(file, "api.md");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn numeric_team_id_is_invalid() {
        let err = flatten(data("team_id: 42"), "n.md").unwrap_err();
        assert!(matches!(err, ParseError::InvalidIdentifierFormat { ref value, .. } if value == "42"));
    }

    #[test]
    fn copies_simple_fields_and_keeps_originals() {
        let out = flatten(
            data("team_id: a\nmetadata:\n  size: 7\n  established: 2021-03\n  cognitive_load: high\n"),
            "a.md",
        )
        .unwrap();
        assert_eq!(out.get("size").and_then(Value::as_i64), Some(7));
        assert_eq!(out.get("established").and_then(Value::as_str), Some("2021-03"));
        assert_eq!(out.get("cognitive_load").and_then(Value::as_str), Some("high"));

        let nested = out.get("metadata").and_then(Value::as_mapping).unwrap();
        assert_eq!(nested.get("size").and_then(Value::as_i64), Some(7));
    }

    #[test]
    fn top_level_grouping_wins() {
        let out = flatten(
            data("team_id: a\nvalue_stream: Top\nmetadata:\n  value_stream: Nested\n  platform_grouping: Core\n"),
            "a.md",
        )
        .unwrap();
        assert_eq!(out.get("value_stream").and_then(Value::as_str), Some("Top"));
        assert_eq!(out.get("platform_grouping").and_then(Value::as_str), Some("Core"));
    }

    #[test]
    fn nested_simple_field_overwrites_top_level() {
        let out = flatten(
            data("team_id: a\nsize: 3\nmetadata:\n  size: 8\n"),
            "a.md",
        )
        .unwrap();
        assert_eq!(out.get("size").and_then(Value::as_i64), Some(8));
    }

    #[test]
    fn invalid_flow_metric_is_fatal() {
        let err = flatten(
            data("team_id: a\nmetadata:\n  flow_metrics:\n    change_fail_rate: 1.5\n"),
            "a.md",
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("change_fail_rate"));
    }

    #[test]
    fn flow_metrics_must_be_mapping_to_copy() {
        let out = flatten(
            data("team_id: a\nmetadata:\n  flow_metrics: unknown\n"),
            "a.md",
        )
        .unwrap();
        assert!(!out.contains_key("flow_metrics"));
    }

    #[test]
    fn null_metadata_is_ignored() {
        let out = flatten(data("team_id: a\nmetadata:\n"), "a.md").unwrap();
        assert!(!out.contains_key("size"));
    }
}
