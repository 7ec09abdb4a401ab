//! Team store: discovery, lookup and persistence for one view directory
//!
//! # Architecture
//!
//! ```text
//! view dir ──walk──→ eligible *.md ──parse_file──→ LoadedTeam ──→ TeamIndex
//!                         │                            ↑
//!                         └── per-file failure: warn!, skip
//! ```

use crate::config::{StoreConfig, View};
use crate::error::{StoreError, StoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use topo_model::constants::TEAM_FILE_EXTENSION;
use topo_model::{slugify, Position, TeamRecord};
use topo_parse::frontmatter::{parse_metadata, split};
use topo_parse::{parse_file, update_position, write_record};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Files that are never team files
pub const SKIP_FILES: [&str; 7] = [
    "README.md",
    "company-leadership.md",
    "engineering-dept.md",
    "customer-solutions-dept.md",
    "product-management-dept.md",
    "infrastructure-dept.md",
    "support-dept.md",
];

/// A parsed team and the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTeam {
    pub record: TeamRecord,
    pub path: PathBuf,
}

/// Loaded teams, sorted by `team_id`
#[derive(Debug, Clone, Default)]
pub struct TeamIndex {
    teams: Vec<LoadedTeam>,
}

impl TeamIndex {
    /// Build an index; sorting is stable so equal ids keep walk order
    #[must_use]
    pub fn new(mut teams: Vec<LoadedTeam>) -> Self {
        teams.sort_by(|a, b| a.record.team_id.as_str().cmp(b.record.team_id.as_str()));
        Self { teams }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedTeam> {
        self.teams.iter()
    }

    /// Records only, in index order
    #[must_use]
    pub fn into_records(self) -> Vec<TeamRecord> {
        self.teams.into_iter().map(|t| t.record).collect()
    }

    /// Exact `team_id` match, falling back to the slug of each name
    ///
    /// The fallback serves corpora whose ids were never set explicitly.
    #[must_use]
    pub fn find_by_id(&self, team_id: &str) -> Option<&LoadedTeam> {
        self.teams
            .iter()
            .find(|t| t.record.team_id == team_id)
            .or_else(|| self.teams.iter().find(|t| t.record.slug() == team_id))
    }

    /// Exact display name match
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&LoadedTeam> {
        self.teams.iter().find(|t| t.record.name == name)
    }

    /// Exact name, then [`Self::find_by_id`], then the slug of `identifier`
    ///
    /// Lets a `team_id` (`cicd`) or a URL-safe slug (`ci-cd-platform-team`)
    /// address names with special characters (`CI/CD Platform Team`).
    #[must_use]
    pub fn find_by_name_or_slug(&self, identifier: &str) -> Option<&LoadedTeam> {
        self.find_by_name(identifier)
            .or_else(|| self.find_by_id(identifier))
            .or_else(|| {
                let wanted = slugify(identifier);
                self.teams.iter().find(|t| t.record.slug() == wanted)
            })
    }
}

impl IntoIterator for TeamIndex {
    type Item = LoadedTeam;
    type IntoIter = std::vec::IntoIter<LoadedTeam>;

    fn into_iter(self) -> Self::IntoIter {
        self.teams.into_iter()
    }
}

/// Team files of one view
#[derive(Debug, Clone)]
pub struct TeamStore {
    config: StoreConfig,
    view: View,
    dir: PathBuf,
}

impl TeamStore {
    #[must_use]
    pub fn new(config: StoreConfig, view: View) -> Self {
        let dir = config.view_dir(view);
        Self { config, view, dir }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// Directory holding this view's team files
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Eligible team files in walk order (sorted by file name per directory)
    ///
    /// Skips hidden path components, non-`.md` files and [`SKIP_FILES`].
    /// A missing directory yields no files.
    #[must_use]
    pub fn team_files(&self) -> Vec<PathBuf> {
        team_files_in(&self.dir, &SKIP_FILES)
    }

    /// Parse every eligible file, skipping failures
    #[must_use]
    pub fn load_all(&self) -> Vec<TeamRecord> {
        self.index().into_records()
    }

    /// Parse every eligible file into an index, skipping failures
    ///
    /// Each failure is logged with the file path and error; the batch never
    /// aborts on a single bad file.
    #[must_use]
    pub fn index(&self) -> TeamIndex {
        let files = self.team_files();
        let mut teams = Vec::with_capacity(files.len());
        let mut failed = 0usize;

        for path in files {
            match parse_file(&path) {
                Ok(record) => teams.push(LoadedTeam { record, path }),
                Err(error) => {
                    failed += 1;
                    warn!(path = %path.display(), %error, "skipping team file");
                }
            }
        }

        info!(
            view = %self.view,
            loaded = teams.len(),
            failed,
            "loaded team files"
        );
        TeamIndex::new(teams)
    }

    /// See [`TeamIndex::find_by_id`]
    #[must_use]
    pub fn find_by_id(&self, team_id: &str) -> Option<LoadedTeam> {
        self.index().find_by_id(team_id).cloned()
    }

    /// See [`TeamIndex::find_by_name`]
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<LoadedTeam> {
        self.index().find_by_name(name).cloned()
    }

    /// See [`TeamIndex::find_by_name_or_slug`]
    #[must_use]
    pub fn find_by_name_or_slug(&self, identifier: &str) -> Option<LoadedTeam> {
        self.index().find_by_name_or_slug(identifier).cloned()
    }

    /// `team_id`s used by more than one file, with paths relative to [`Self::dir`]
    ///
    /// Reads only the front matter of each file. Files without a readable
    /// string `team_id` are ignored here.
    #[must_use]
    pub fn find_duplicate_ids(&self) -> BTreeMap<String, Vec<PathBuf>> {
        let mut by_id: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for path in self.team_files() {
            let Some(team_id) = read_team_id(&path) else {
                continue;
            };
            let relative = path.strip_prefix(&self.dir).unwrap_or(&path).to_path_buf();
            by_id.entry(team_id).or_default().push(relative);
        }

        by_id.retain(|_, paths| paths.len() > 1);
        if !by_id.is_empty() {
            warn!(view = %self.view, duplicates = by_id.len(), "duplicate team_ids found");
        }
        by_id
    }

    /// Write a record as `<slug(name)>.md` in the view directory
    ///
    /// Creates the directory when needed and overwrites an existing file.
    ///
    /// # Errors
    /// [`StoreError::Io`] when the directory cannot be created,
    /// [`StoreError::Serialize`] when writing fails.
    pub fn write_team(&self, record: &TeamRecord) -> StoreResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::io_error(&self.dir, e))?;
        let path = self.dir.join(format!("{}.{TEAM_FILE_EXTENSION}", record.slug()));
        write_record(record, &path)?;
        Ok(path)
    }

    /// Move a team on the canvas, touching only its `position` block
    ///
    /// `identifier` is resolved by id, then by name or slug.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] when no team matches, [`StoreError::Serialize`]
    /// when the file cannot be patched.
    pub fn update_position(&self, identifier: &str, position: Position) -> StoreResult<LoadedTeam> {
        let index = self.index();
        let team = index
            .find_by_id(identifier)
            .or_else(|| index.find_by_name_or_slug(identifier))
            .ok_or_else(|| StoreError::not_found(identifier))?;

        update_position(&team.path, position)?;
        debug!(team_id = %team.record.team_id, x = position.x, y = position.y, "moved team");

        let mut moved = team.clone();
        moved.record.position = position;
        Ok(moved)
    }
}

/// Eligible team files under `dir`, skipping hidden components and `skip`
#[must_use]
pub fn team_files_in(dir: &Path, skip: &[&str]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "view directory does not exist");
        return Vec::new();
    }

    WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path().extension().and_then(|ext| ext.to_str()) == Some(TEAM_FILE_EXTENSION)
        })
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            !skip.iter().any(|s| *s == name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn read_team_id(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let document = split(&raw).ok()?;
    let data = parse_metadata(document.metadata, &path.display().to_string()).ok()?;
    data.get("team_id")
        .and_then(|v| v.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
