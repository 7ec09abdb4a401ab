//! Markdown relationship extraction
//!
//! Two conventional sections carry relationship data in the body:
//!
//! ```text
//! ## Teams we currently interact with
//! | Team Name | Interaction Mode | Purpose |
//! |-----------|------------------|---------|
//! | Squad B   | Collaboration    | ...     |
//!
//! ## Dependencies
//! - **Database Team**: schema changes
//! - API Framework Team - shared API standards
//! ```
//!
//! Bullet classification is a best-effort heuristic, not a grammar.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use topo_model::constants::sections;
use topo_model::normalize_interaction_mode;

static BOLD_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*([^*]+)\*\*:\s*(.+)").expect("static regex"));

static SEPARATED_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^-:]+?)\s*[-:]\s*(.+)").expect("static regex"));

/// Lead words marking a bullet as narrative text rather than a team name
pub const NARRATIVE_LEAD_WORDS: [&str; 8] = [
    "blocks",
    "depends",
    "requires",
    "waits",
    "all teams",
    "teams we",
    "internal",
    "external",
];

/// Lead words checked for bullets without any separator
const BARE_NOTE_LEAD_WORDS: [&str; 4] = ["blocks", "depends", "requires", "waits"];

/// Candidate names with more words than this are treated as sentences
const MAX_TEAM_NAME_WORDS: usize = 5;

/// Rows of the interaction table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableExtraction {
    /// Team names in row order
    pub dependencies: Vec<String>,
    /// Team name → normalized mode
    pub interaction_modes: IndexMap<String, String>,
}

/// Names and notes from the dependency bullet list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulletExtraction {
    pub dependencies: Vec<String>,
    pub notes: Vec<String>,
}

/// Lines of the section under `heading`
///
/// The heading must be a whole line (case-insensitive, surrounding whitespace
/// ignored). The section runs until the next `## ` line or end of document.
/// Returns `None` when the heading is absent.
#[must_use]
pub fn section_lines<'a>(markdown: &'a str, heading: &str) -> Option<Vec<&'a str>> {
    let wanted = heading.to_lowercase();
    let mut lines = markdown.lines();

    lines.by_ref().find(|line| line.trim().to_lowercase() == wanted)?;

    Some(
        lines
            .take_while(|line| !line.starts_with("## "))
            .collect(),
    )
}

/// Parse the `## Teams we currently interact with` table
///
/// The header row (containing `Team Name`) and `|---` separator rows are
/// skipped. Column 1 is the team, column 2 the mode text, normalized with
/// [`normalize_interaction_mode`]. Rows with an empty team or mode are
/// ignored.
#[must_use]
pub fn parse_interaction_table(markdown: &str) -> TableExtraction {
    let mut extraction = TableExtraction::default();
    let Some(lines) = section_lines(markdown, sections::INTERACTIONS_HEADER) else {
        return extraction;
    };

    for line in lines {
        let line = line.trim();
        if !line.starts_with('|')
            || line.starts_with("|---")
            || line.contains(sections::TEAM_NAME_COLUMN)
        {
            continue;
        }

        let cells: Vec<&str> = line.split('|').collect();
        // Leading and trailing cells are outside the outer pipes
        if cells.len() < 4 {
            continue;
        }
        let team = cells[1].trim();
        let mode = cells[2].trim();
        if team.is_empty() || mode.is_empty() {
            continue;
        }

        extraction.dependencies.push(team.to_string());
        extraction
            .interaction_modes
            .insert(team.to_string(), normalize_interaction_mode(mode));
    }

    extraction
}

/// Parse the `## Dependencies` bullet list
///
/// Each `-` line is classified:
/// 1. `**Name**: description` → dependency plus note `Name: description`
/// 2. `Name - description` / `Name: description` → note only when
///    [`looks_like_narrative_note`] holds for `Name`, otherwise dependency
///    plus note
/// 3. no separator → note when it starts lowercase or with a blocking lead
///    word, otherwise a bare dependency
#[must_use]
pub fn parse_dependency_bullets(markdown: &str) -> BulletExtraction {
    let mut extraction = BulletExtraction::default();
    let Some(lines) = section_lines(markdown, sections::DEPENDENCIES_HEADER) else {
        return extraction;
    };

    for line in lines {
        let Some(text) = line.trim().strip_prefix('-') else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(caps) = BOLD_BULLET.captures(text) {
            let name = caps[1].trim();
            let description = caps[2].trim();
            extraction.dependencies.push(name.to_string());
            extraction.notes.push(format!("{name}: {description}"));
            continue;
        }

        if let Some(caps) = SEPARATED_BULLET.captures(text) {
            let name = caps[1].trim();
            let description = caps[2].trim();
            if looks_like_narrative_note(name) {
                extraction.notes.push(text.to_string());
            } else {
                extraction.dependencies.push(name.to_string());
                extraction.notes.push(format!("{name}: {description}"));
            }
            continue;
        }

        let lower = text.to_lowercase();
        let starts_lowercase = text.chars().next().is_some_and(char::is_lowercase);
        if starts_lowercase || BARE_NOTE_LEAD_WORDS.iter().any(|w| lower.starts_with(w)) {
            extraction.notes.push(text.to_string());
        } else {
            extraction.dependencies.push(text.to_string());
        }
    }

    extraction
}

/// Whether a bullet's candidate name reads like a sentence, not a team
///
/// True when the text starts with a narrative lead word (`blocks`,
/// `depends`, `requires`, `waits`, `all teams`, `teams we`, `internal`,
/// `external`), does not start with an uppercase letter, or has more than
/// five words. Long team names and short notes can be misclassified.
#[must_use]
pub fn looks_like_narrative_note(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    NARRATIVE_LEAD_WORDS.iter().any(|w| lower.starts_with(w))
        || !candidate.chars().next().is_some_and(char::is_uppercase)
        || candidate.split_whitespace().count() > MAX_TEAM_NAME_WORDS
}
