//! Individual validation rules
//!
//! Every rule takes the raw front matter map and the shared context and
//! returns its [`Findings`]. Rules never fail: a rule that does not apply
//! returns nothing. [`YAML_RULES`] is the ordered registry run by the sweep;
//! [`check_interaction_table`] inspects the markdown body instead.

use crate::context::ValidationContext;
use serde_yaml::{Mapping, Value};
use topo_model::constants::{interaction_fields, sections, team_size};
use topo_model::{slugify, FlowMetrics, InteractionMode, TeamId};
use topo_parse::enrich::section_lines;
use topo_store::View;
use tracing::trace;

/// Errors (blocking) and warnings (advisory) for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    /// Problems that make the file invalid
    pub errors: Vec<String>,
    /// Problems worth fixing that do not invalidate the file
    pub warnings: Vec<String>,
}

impl Findings {
    /// No errors, no warnings
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Add an error
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Add a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Append another rule's findings, keeping order
    pub fn merge(&mut self, other: Findings) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Neither errors nor warnings
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Signature shared by the front matter rules
pub type RuleFn = fn(&Mapping, &ValidationContext<'_>) -> Findings;

/// A named front matter rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short kebab-case name, used in trace logs
    pub name: &'static str,
    /// The check itself
    pub check: RuleFn,
}

/// Front matter rules in the order they run
pub const YAML_RULES: &[Rule] = &[
    Rule { name: "required-fields", check: check_required_fields },
    Rule { name: "team-id", check: check_team_id },
    Rule { name: "team-type", check: check_team_type },
    Rule { name: "filename", check: check_filename_matches_name },
    Rule { name: "position", check: check_position },
    Rule { name: "size", check: check_size },
    Rule { name: "flow-metrics", check: check_flow_metrics },
    Rule { name: "inner-groupings", check: check_inner_groupings },
    Rule { name: "product-line", check: check_product_line },
    Rule { name: "business-stream", check: check_business_stream },
    Rule { name: "dependencies", check: check_dependencies },
    Rule { name: "interaction-modes", check: check_interaction_modes },
    Rule { name: "interactions", check: check_interactions_list },
];

/// Run every rule of [`YAML_RULES`]
#[must_use]
pub fn run_yaml_rules(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    for rule in YAML_RULES {
        let found = (rule.check)(data, ctx);
        if !found.is_clean() {
            trace!(
                rule = rule.name,
                file = ctx.file_name,
                errors = found.errors.len(),
                warnings = found.warnings.len(),
                "rule reported"
            );
        }
        findings.merge(found);
    }
    findings
}

/// `name` and `team_type` must be present
pub fn check_required_fields(data: &Mapping, _ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    for key in ["name", "team_type"] {
        if !data.contains_key(key) {
            findings.error(format!("Missing required field: '{key}'"));
        }
    }
    findings
}

/// `team_id` must be present and slug-safe
pub fn check_team_id(data: &Mapping, _ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    match data.get("team_id") {
        None | Some(Value::Null) => findings.error("Missing required field: 'team_id'"),
        Some(Value::String(id)) if TeamId::is_valid(id) => {}
        Some(other) => findings.error(format!(
            "Invalid team_id: '{}' (must be lowercase alphanumeric with single dashes)",
            show(other)
        )),
    }
    findings
}

/// `team_type` must be in the view's vocabulary (skipped when it is empty)
pub fn check_team_type(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    let valid = &ctx.vocabulary.team_types;
    if valid.is_empty() {
        return findings;
    }
    if let Some(team_type) = data.get("team_type") {
        let team_type = show(team_type);
        if !valid.contains(&team_type) {
            findings.error(format!(
                "Invalid team_type: '{team_type}' (valid: {})",
                valid.join(", ")
            ));
        }
    }
    findings
}

/// File name should be the slug of the team name
pub fn check_filename_matches_name(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    if let Some(name) = data.get("name") {
        let expected = slugify(&show(name));
        if expected != ctx.file_stem() {
            findings.warn(format!(
                "Filename mismatch: expected '{expected}.md', got '{}'",
                ctx.file_name
            ));
        }
    }
    findings
}

/// `position` should be a mapping with numeric `x` and `y`
pub fn check_position(data: &Mapping, _ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    match data.get("position") {
        None => {}
        Some(Value::Mapping(position)) => {
            let x = position.get("x");
            let y = position.get("y");
            if x.is_none() || y.is_none() {
                findings.warn("'position' missing x or y coordinate");
            } else if [x, y].into_iter().flatten().any(|v| v.as_f64().is_none()) {
                findings.warn("'position' coordinates must be numbers");
            }
        }
        Some(_) => findings.warn("'position' should be a dict with x and y"),
    }
    findings
}

/// Team size: error below 1 or non-integer, warning outside 5-9
///
/// `metadata.size` is checked when present, otherwise top-level `size`.
pub fn check_size(data: &Mapping, _ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    let Some(size) = nested(data, "metadata", "size").or_else(|| data.get("size")) else {
        return findings;
    };

    match size.as_i64() {
        Some(n) if n < team_size::MIN_VALID => {
            findings.error(format!("Invalid team size: {n}"));
        }
        Some(n) if !(team_size::MIN_RECOMMENDED..=team_size::MAX_RECOMMENDED).contains(&n) => {
            findings.warn(format!(
                "Team size {n} outside recommended range ({}-{} people)",
                team_size::MIN_RECOMMENDED,
                team_size::MAX_RECOMMENDED
            ));
        }
        Some(_) => {}
        None => findings.error(format!("Invalid team size: {}", show(size))),
    }
    findings
}

/// Flow metrics in either location must be in range
pub fn check_flow_metrics(data: &Mapping, _ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    let sources = [nested(data, "metadata", "flow_metrics"), data.get("flow_metrics")];
    for metrics in sources.into_iter().flatten().filter_map(Value::as_mapping) {
        if let Err(violation) = FlowMetrics::validate_mapping(metrics) {
            findings.error(format!("Invalid {}: {}", violation.field, violation.reason));
        }
    }
    findings
}

/// Inner groupings need an outer grouping, and only one inner may be set (tt view)
pub fn check_inner_groupings(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    if ctx.view != View::Tt {
        return findings;
    }

    let set = |key: &str| data.get(key).is_some_and(is_truthy);
    let value_stream = set("value_stream");
    let platform_grouping = set("platform_grouping");
    let value_stream_inner = set("value_stream_inner");
    let platform_grouping_inner = set("platform_grouping_inner");
    let has_outer = value_stream || platform_grouping;

    if value_stream_inner && !has_outer {
        findings.error(
            "value_stream_inner requires either value_stream or platform_grouping to be set",
        );
    }
    if platform_grouping_inner && !has_outer {
        findings.error(
            "platform_grouping_inner requires either platform_grouping or value_stream to be set",
        );
    }
    if value_stream_inner && platform_grouping_inner {
        findings.error(
            "Cannot use both value_stream_inner and platform_grouping_inner. \
             Choose one inner grouping type.",
        );
    }
    findings
}

/// `product_line` should name a configured product (baseline view)
pub fn check_product_line(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    check_reference(
        data,
        ctx,
        "product_line",
        "Product line",
        "products.json",
        &ctx.vocabulary.product_lines,
    )
}

/// `business_stream` should name a configured stream (baseline view)
pub fn check_business_stream(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    check_reference(
        data,
        ctx,
        "business_stream",
        "Business stream",
        "business-streams.json",
        &ctx.vocabulary.business_streams,
    )
}

fn check_reference(
    data: &Mapping,
    ctx: &ValidationContext<'_>,
    key: &str,
    label: &str,
    source: &str,
    valid: &[String],
) -> Findings {
    let mut findings = Findings::none();
    if ctx.view != View::Baseline || valid.is_empty() {
        return findings;
    }
    let Some(value) = data.get(key).filter(|v| is_truthy(v)) else {
        return findings;
    };

    let raw = show(value);
    let wanted = normalize(&raw);
    if !wanted.is_empty() && !valid.iter().any(|v| normalize(v) == wanted) {
        findings.warn(format!(
            "{label} '{raw}' not found in {source}. Valid options: {}",
            valid.join(", ")
        ));
    }
    findings
}

/// Declared dependencies should name known teams
pub fn check_dependencies(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    let Some(deps) = data.get("dependencies").and_then(Value::as_sequence) else {
        return findings;
    };
    for dep in deps.iter().map(show) {
        if !ctx.knows(&dep) {
            findings.warn(format!("Dependency '{dep}' not found - team does not exist"));
        }
    }
    findings
}

/// `interaction_modes` targets should name known teams
///
/// Accepts `team → mode` and the legacy `mode → [teams]` shape.
pub fn check_interaction_modes(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    let Some(modes) = data.get("interaction_modes").and_then(Value::as_mapping) else {
        return findings;
    };

    for (key, value) in modes {
        let key = show(key);
        match value {
            Value::Sequence(teams) => {
                for team in teams.iter().map(show) {
                    if !ctx.knows(&team) {
                        findings.warn(format!(
                            "Interaction mode '{key}' references unknown team: '{team}'"
                        ));
                    }
                }
            }
            _ => {
                if !ctx.knows(&key) {
                    findings.warn(format!("Interaction mode references unknown team: '{key}'"));
                }
            }
        }
    }
    findings
}

/// Structure of the `interactions` list
///
/// Each entry needs a target (`team_id` or `team`) and a canonical mode
/// (`interaction_mode` or `mode`). Unknown targets are warnings.
pub fn check_interactions_list(data: &Mapping, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    let Some(value) = data.get("interactions").filter(|v| !v.is_null()) else {
        return findings;
    };
    let Some(entries) = value.as_sequence() else {
        findings.error("'interactions' must be a list");
        return findings;
    };

    let canonical: Vec<&str> = InteractionMode::ALL.iter().map(|m| m.as_str()).collect();

    for (idx, entry) in entries.iter().enumerate() {
        let n = idx + 1;
        let Some(entry) = entry.as_mapping() else {
            findings.error(format!(
                "Interaction #{n}: Must be a dict with '{}' and '{}' fields",
                interaction_fields::TEAM_ID,
                interaction_fields::INTERACTION_MODE
            ));
            continue;
        };

        let team = first_truthy(entry, &[interaction_fields::TEAM_ID, interaction_fields::TEAM]);
        let mode = first_truthy(
            entry,
            &[interaction_fields::INTERACTION_MODE, interaction_fields::MODE],
        );

        match &team {
            None => findings.error(format!(
                "Interaction #{n}: Missing '{}' or '{}' field",
                interaction_fields::TEAM_ID,
                interaction_fields::TEAM
            )),
            Some(team) if !ctx.knows(team) => {
                findings.warn(format!("Interaction references unknown team: '{team}'"));
            }
            Some(_) => {}
        }

        match &mode {
            None => findings.error(format!(
                "Interaction #{n}: Missing '{}' or '{}' field",
                interaction_fields::INTERACTION_MODE,
                interaction_fields::MODE
            )),
            Some(mode) if !canonical.contains(&mode.as_str()) => {
                findings.error(format!(
                    "Invalid interaction mode: '{mode}' (valid: {})",
                    canonical.join(", ")
                ));
            }
            Some(_) => {}
        }
    }
    findings
}

/// Format of the interaction table in the body (tt view)
pub fn check_interaction_table(body: &str, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();
    if ctx.view != View::Tt {
        return findings;
    }
    let Some(lines) = section_lines(body, sections::INTERACTIONS_HEADER) else {
        return findings;
    };

    let rows: Vec<&str> = lines.into_iter().filter(|l| l.contains('|')).collect();
    if rows.is_empty() {
        findings.warn("Team interaction section found but no table present");
        return findings;
    }

    let header = sections::TEAM_NAME_COLUMN.to_lowercase();
    if !rows.iter().any(|r| r.to_lowercase().contains(&header)) {
        findings.warn(format!(
            "Interaction table missing '{}' column header",
            sections::TEAM_NAME_COLUMN
        ));
        return findings;
    }

    for row in rows {
        if row.contains(sections::TEAM_NAME_COLUMN) || row.contains("---") {
            continue;
        }
        let team = row.split('|').nth(1).map(str::trim).unwrap_or_default();
        if !team.is_empty() && !ctx.knows(team) {
            findings.warn(format!("Interaction table references unknown team: '{team}'"));
        }
    }
    findings
}

fn nested<'a>(data: &'a Mapping, parent: &str, key: &str) -> Option<&'a Value> {
    data.get(parent)
        .and_then(Value::as_mapping)
        .and_then(|map| map.get(key))
}

fn first_truthy(entry: &Mapping, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find(|v| is_truthy(v))
        .map(show)
}

/// Set and not empty, zero or false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Sequence(s) => !s.is_empty(),
        Value::Mapping(m) => !m.is_empty(),
        Value::Tagged(_) => true,
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Scalar text for messages and comparisons
fn show(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
