//! Testing utilities for the team topology workspace
//!
//! Shared fixtures: a builder for team file text and a temporary on-disk
//! data directory.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use topo_model::slugify;

/// Builds team file text (front matter + markdown body)
#[derive(Debug, Clone)]
pub struct TeamFileBuilder {
    name: String,
    fields: Vec<(String, String)>,
    body: Vec<String>,
}

impl TeamFileBuilder {
    /// Team with `team_id` = slug of `name`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: vec![
                ("team_id".to_string(), slugify(name)),
                ("name".to_string(), name.to_string()),
            ],
            body: vec![format!("# {name}")],
        }
    }

    /// Set or replace a raw YAML field (`value` is inserted verbatim)
    pub fn field(mut self, key: &str, value: &str) -> Self {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
        self
    }

    /// Drop a field, e.g. to produce a file without `team_id`
    pub fn without(mut self, key: &str) -> Self {
        self.fields.retain(|(k, _)| k != key);
        self
    }

    pub fn team_id(self, team_id: &str) -> Self {
        self.field("team_id", team_id)
    }

    pub fn team_type(self, team_type: &str) -> Self {
        self.field("team_type", team_type)
    }

    pub fn position(self, x: f64, y: f64) -> Self {
        self.field("position", &format!("\n  x: {x}\n  y: {y}"))
    }

    pub fn dependencies(self, teams: &[&str]) -> Self {
        let list = teams
            .iter()
            .map(|t| format!("\n  - {t}"))
            .collect::<String>();
        self.field("dependencies", &list)
    }

    /// Append an `interactions` entry using the preferred keys
    pub fn interaction(mut self, team_id: &str, mode: &str) -> Self {
        let entry = format!("\n  - team_id: {team_id}\n    interaction_mode: {mode}");
        match self.fields.iter_mut().find(|(k, _)| k == "interactions") {
            Some(existing) => existing.1.push_str(&entry),
            None => self.fields.push(("interactions".to_string(), entry)),
        }
        self
    }

    /// Add an interaction table section with `(team, mode)` rows
    pub fn interaction_table(mut self, rows: &[(&str, &str)]) -> Self {
        let mut section = String::from(
            "## Teams we currently interact with\n\n\
             | Team Name | Interaction Mode | Purpose |\n\
             |-----------|------------------|---------|",
        );
        for (team, mode) in rows {
            section.push_str(&format!("\n| {team} | {mode} | |"));
        }
        self.body.push(section);
        self
    }

    /// Add a `## Dependencies` bullet list
    pub fn dependency_bullets(mut self, bullets: &[&str]) -> Self {
        let mut section = String::from("## Dependencies\n");
        for bullet in bullets {
            section.push_str(&format!("\n- {bullet}"));
        }
        self.body.push(section);
        self
    }

    pub fn body(mut self, markdown: &str) -> Self {
        self.body.push(markdown.to_string());
        self
    }

    /// File name derived from the display name
    pub fn file_name(&self) -> String {
        format!("{}.md", slugify(&self.name))
    }

    pub fn build(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in &self.fields {
            if value.starts_with('\n') {
                out.push_str(&format!("{key}:{value}\n"));
            } else {
                out.push_str(&format!("{key}: {value}\n"));
            }
        }
        out.push_str("---\n\n");
        out.push_str(&self.body.join("\n\n"));
        out.push('\n');
        out
    }
}

/// Temporary data directory removed on drop
#[derive(Debug)]
pub struct TempCorpus {
    dir: TempDir,
}

impl TempCorpus {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` at `relative`, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a built team under `subdir` using its derived file name
    pub fn add_team(&self, subdir: &str, team: &TeamFileBuilder) -> PathBuf {
        self.write(&format!("{subdir}/{}", team.file_name()), &team.build())
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).unwrap()
    }
}

impl Default for TempCorpus {
    fn default() -> Self {
        Self::new()
    }
}
