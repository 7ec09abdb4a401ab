//! Read-only validation sweep over one view
//!
//! ```text
//! pass 1: every file ──front matter──→ known names and team_ids
//! pass 2: every file ──validate_document──→ Findings ──→ Report
//! ```
//!
//! Nothing is written. Read failures become findings of the file.

use crate::context::ValidationContext;
use crate::report::Report;
use crate::rules::{check_interaction_table, run_yaml_rules, Findings};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use topo_parse::frontmatter::{parse_metadata, split, SplitError};
use topo_parse::ParseError;
use topo_store::{team_files_in, StoreConfig, StoreResult, View, ViewVocabulary};
use tracing::{debug, info};

/// Files the sweep never checks
pub const VALIDATOR_SKIP_FILES: [&str; 2] = ["README.md", "example-undefined-team.md"];

/// Validate every team file of `view`
///
/// # Errors
/// Only when the view's vocabulary config exists but cannot be read or
/// parsed. Per-file problems are reported, never returned.
pub fn validate_all(config: &StoreConfig, view: View) -> StoreResult<Report> {
    let dir = config.view_dir(view);
    let vocabulary = ViewVocabulary::load(config, view)?;
    let files = team_files_in(&dir, &VALIDATOR_SKIP_FILES);
    let known = known_teams(&files);
    debug!(view = %view, files = files.len(), known = known.len(), "validating team files");

    let mut report = Report::new(view);
    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ctx = ValidationContext::new(view, &file_name, &vocabulary, &known);

        let findings = match std::fs::read_to_string(path) {
            Ok(raw) => validate_document(&raw, &ctx),
            Err(e) => {
                let mut findings = Findings::none();
                findings.error(format!("File reading error: {e}"));
                findings
            }
        };

        report.record(relative_name(&dir, path), findings);
    }

    info!(
        view = %view,
        total = report.total_files,
        valid = report.valid_files,
        warnings = report.files_with_warnings,
        errors = report.files_with_errors,
        "validation finished"
    );
    Ok(report)
}

/// Validate the text of one team file
///
/// Structural problems (no front matter, unclosed block, bad YAML, empty
/// YAML) stop the checks that need parsed fields.
#[must_use]
pub fn validate_document(raw: &str, ctx: &ValidationContext<'_>) -> Findings {
    let mut findings = Findings::none();

    let document = match split(raw) {
        Ok(document) => document,
        Err(SplitError::MissingOpeningDelimiter) => {
            findings.error("Missing YAML front matter (must start with '---')");
            return findings;
        }
        Err(SplitError::UnclosedBlock) => {
            findings.error("Malformed YAML front matter (missing closing '---')");
            return findings;
        }
    };

    let blocks = count_front_matter_blocks(raw);
    if blocks > 1 {
        findings.error(format!(
            "Duplicate YAML front matter detected ({blocks} blocks found)"
        ));
    }

    let data = match parse_metadata(document.metadata, ctx.file_name) {
        Ok(data) => data,
        Err(ParseError::Yaml { source, .. }) => {
            findings.error(format!("YAML parsing error: {source}"));
            return findings;
        }
        Err(other) => {
            findings.error(format!("YAML parsing error: {other}"));
            return findings;
        }
    };

    if data.is_empty() {
        findings.error("Empty YAML front matter");
        return findings;
    }

    findings.merge(run_yaml_rules(&data, ctx));
    findings.merge(check_interaction_table(document.body, ctx));
    findings
}

/// Consecutive front matter blocks at the top of `raw`
///
/// A file pasted twice shows up as a body that itself starts with a
/// complete block.
#[must_use]
pub fn count_front_matter_blocks(raw: &str) -> usize {
    let mut count = 0;
    let mut rest = raw;
    while let Ok(document) = split(rest) {
        count += 1;
        rest = document.body.trim_start();
    }
    count
}

/// Display names and `team_id`s found in the front matter of `files`
///
/// Unreadable or unparsable files contribute nothing.
#[must_use]
pub fn known_teams(files: &[PathBuf]) -> BTreeSet<String> {
    let mut known = BTreeSet::new();
    for path in files {
        let Some(data) = read_front_matter(path) else {
            continue;
        };
        for key in ["name", "team_id"] {
            if let Some(text) = data.get(key).and_then(scalar_text) {
                known.insert(text);
            }
        }
    }
    known
}

fn read_front_matter(path: &Path) -> Option<Mapping> {
    let raw = std::fs::read_to_string(path).ok()?;
    let document = split(&raw).ok()?;
    parse_metadata(document.metadata, &path.display().to_string()).ok()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn relative_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
