//! Team file serialization
//!
//! [`render_record`] normalizes: keys are emitted in a fixed order, convenience
//! fields are nested back under `metadata`, and interactions are rebuilt from
//! `interaction_modes` with the preferred key names. Markdown-derived data
//! (dependency notes, table rows) lives in the body and is not duplicated.
//!
//! [`update_position_in_text`] is the exception: it patches only the
//! `position` block and leaves every other byte alone.

use crate::error::SerializeError;
use crate::frontmatter::{split, DELIMITER};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use topo_model::constants::interaction_fields;
use topo_model::{Position, TeamRecord};
use tracing::debug;

/// Result type alias for write operations
pub type SerializeResult<T> = Result<T, SerializeError>;

/// Render a record as team file text
///
/// # Errors
/// [`SerializeError::Yaml`] if a field cannot be represented,
/// [`SerializeError::NonFinitePosition`] for NaN or infinite coordinates.
pub fn render_record(record: &TeamRecord) -> SerializeResult<String> {
    let front_matter = serde_yaml::to_string(&Value::Mapping(front_matter(record)?))?;

    let mut out = String::with_capacity(front_matter.len() + record.description.len() + 16);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&front_matter);
    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out.push_str(&record.description);
    out.push('\n');
    Ok(out)
}

/// Write a record to `path`, replacing any existing file
///
/// # Errors
/// [`SerializeError::Io`] on write failure, or any error from [`render_record`].
pub fn write_record(record: &TeamRecord, path: impl AsRef<Path>) -> SerializeResult<()> {
    let path = path.as_ref();
    let text = render_record(record)?;
    std::fs::write(path, text).map_err(|e| SerializeError::io_error(path, e))?;
    debug!(path = %path.display(), team_id = %record.team_id, "wrote team file");
    Ok(())
}

/// Rewrite only the position of the team file at `path`
///
/// # Errors
/// [`SerializeError::Io`] on read/write failure, or
/// [`SerializeError::MalformedDocument`] when the file has no front matter.
pub fn update_position(path: impl AsRef<Path>, position: Position) -> SerializeResult<()> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| SerializeError::io_error(path, e))?;

    let patched = update_position_in_text(&raw, position).map_err(|e| match e {
        SerializeError::MalformedDocument { reason, .. } => SerializeError::MalformedDocument {
            file: path.display().to_string(),
            reason,
        },
        other => other,
    })?;

    std::fs::write(path, patched).map_err(|e| SerializeError::io_error(path, e))?;
    debug!(path = %path.display(), x = position.x, y = position.y, "updated position");
    Ok(())
}

/// Replace the top-level `position` block in team file text
///
/// The block is the `position:` line plus the indented lines following it.
/// When absent, a block is appended just before the closing delimiter.
///
/// # Errors
/// [`SerializeError::MalformedDocument`] when the front matter is missing or
/// unclosed, [`SerializeError::NonFinitePosition`] for NaN or infinite
/// coordinates.
pub fn update_position_in_text(raw: &str, position: Position) -> SerializeResult<String> {
    SerializeError::check_position(position)?;
    let document = split(raw).map_err(|e| SerializeError::MalformedDocument {
        file: String::new(),
        reason: e.to_string(),
    })?;
    let span = document.metadata_span.clone();

    let mut block_start = None;
    let mut block_end = span.end;
    let mut newline = "\n";
    let mut offset = span.start;

    for line in raw[span.clone()].split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        match block_start {
            None if is_position_key(line) => {
                block_start = Some(line_start);
                if line.ends_with("\r\n") {
                    newline = "\r\n";
                }
            }
            Some(_) if line.starts_with([' ', '\t']) => {}
            Some(_) => {
                block_end = line_start;
                break;
            }
            None => {}
        }
    }

    let block = format!(
        "position:{nl}  x: {x}{nl}  y: {y}{nl}",
        nl = newline,
        x = format_coordinate(position.x),
        y = format_coordinate(position.y),
    );

    let mut out = String::with_capacity(raw.len() + block.len());
    match block_start {
        Some(start) => {
            out.push_str(&raw[..start]);
            out.push_str(&block);
            out.push_str(&raw[block_end..]);
        }
        None => {
            out.push_str(&raw[..span.end]);
            if span.end > span.start && !raw[..span.end].ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&block);
            out.push_str(&raw[span.end..]);
        }
    }
    Ok(out)
}

fn is_position_key(line: &str) -> bool {
    line.strip_prefix("position")
        .is_some_and(|rest| rest.trim_start().starts_with(':'))
}

/// Integral coordinates are written without a fractional part
fn format_coordinate(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn front_matter(record: &TeamRecord) -> SerializeResult<Mapping> {
    SerializeError::check_position(record.position)?;
    let mut map = Mapping::new();
    map.insert("team_id".into(), record.team_id.as_str().into());
    map.insert("name".into(), record.name.as_str().into());
    map.insert("team_type".into(), record.team_type.as_str().into());
    map.insert("position".into(), to_value(record.position)?);
    map.insert("metadata".into(), Value::Mapping(nested_metadata(record)));

    if let Some(api) = &record.team_api {
        map.insert("team_api".into(), to_value(api)?);
    }

    let optional_text = [
        ("purpose", &record.purpose),
        ("product_line", &record.product_line),
        ("business_stream", &record.business_stream),
        ("value_stream", &record.value_stream),
        ("value_stream_inner", &record.value_stream_inner),
        ("platform_grouping", &record.platform_grouping),
        ("platform_grouping_inner", &record.platform_grouping_inner),
    ];
    for (key, value) in optional_text {
        if let Some(text) = value.as_deref().filter(|s| !s.is_empty()) {
            map.insert(key.into(), text.into());
        }
    }

    let dependencies = record.dependency_list();
    if !dependencies.is_empty() {
        map.insert("dependencies".into(), to_value(dependencies)?);
    }

    if !record.interaction_modes.is_empty() {
        map.insert("interactions".into(), Value::Sequence(rebuilt_interactions(record)));
    }

    for (key, value) in &record.extended {
        map.insert(key.clone(), value.clone());
    }

    Ok(map)
}

fn nested_metadata(record: &TeamRecord) -> Mapping {
    let mut metadata = record.metadata.clone();

    let text_fields = [
        ("established", &record.established),
        ("cognitive_load", &record.cognitive_load),
        ("line_manager", &record.line_manager),
    ];
    for (key, value) in text_fields {
        if let Some(text) = value {
            metadata.insert(key.into(), text.as_str().into());
        }
    }
    if let Some(size) = record.size {
        metadata.insert("size".into(), size.into());
    }
    if let Some(metrics) = record.flow_metrics.as_ref().filter(|m| !m.is_empty()) {
        metadata.insert("flow_metrics".into(), Value::Mapping(metrics.to_mapping()));
    }

    metadata
}

fn rebuilt_interactions(record: &TeamRecord) -> Vec<Value> {
    record
        .interaction_modes
        .iter()
        .map(|(team, mode)| {
            let mut entry = Mapping::new();
            entry.insert(interaction_fields::TEAM_ID.into(), team.as_str().into());
            entry.insert(interaction_fields::INTERACTION_MODE.into(), mode.as_str().into());
            let purpose = record
                .interactions
                .iter()
                .find(|i| &i.team_id == team)
                .and_then(|i| i.purpose.as_deref());
            if let Some(purpose) = purpose {
                entry.insert(interaction_fields::PURPOSE.into(), purpose.into());
            }
            Value::Mapping(entry)
        })
        .collect()
}

fn to_value<T: Serialize>(value: T) -> SerializeResult<Value> {
    Ok(serde_yaml::to_value(value)?)
}
