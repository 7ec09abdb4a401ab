//! Per-view JSON configuration
//!
//! Each view directory may carry JSON files describing the vocabulary its
//! team files are checked against:
//!
//! | File | Contents |
//! |---|---|
//! | `tt-team-types.json` | team types of the `tt` view |
//! | `baseline-team-types.json` | team types of the `baseline` view |
//! | `products.json` | product lines (baseline) |
//! | `business-streams.json` | business streams (baseline) |
//! | `organization-hierarchy.json` | company, departments and line managers (baseline) |

use crate::config::{StoreConfig, View};
use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use topo_model::constants::{config_files, team_types};
use tracing::debug;

const MAX_ID_LEN: usize = 50;
const MAX_NAME_LEN: usize = 100;

/// A JSON config file with a known name and content rules
pub trait ConfigSchema: DeserializeOwned {
    /// File name inside the view directory
    const FILE_NAME: &'static str;

    /// Rule violations, each prefixed with its location (`products → 0 → id`)
    fn problems(&self) -> Vec<String>;
}

/// One team type definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTypeConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
}

/// `*-team-types.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTypesConfig {
    pub team_types: Vec<TeamTypeConfig>,
}

/// `tt-team-types.json` shares the schema of the baseline file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TtTeamTypesConfig(pub TeamTypesConfig);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
}

/// `products.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsConfig {
    pub products: Vec<ProductConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessStreamConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Product names belonging to the stream
    #[serde(default)]
    pub products: Vec<String>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
}

/// `business-streams.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessStreamsConfig {
    pub business_streams: Vec<BusinessStreamConfig>,
}

fn default_company_type() -> String {
    "leadership".to_string()
}

fn default_department_type() -> String {
    "department".to_string()
}

fn default_line_manager_type() -> String {
    "line-manager".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineManagerConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_line_manager_type")]
    pub kind: String,
    pub level: i64,
    /// Team names reporting to this line manager
    #[serde(default)]
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_department_type")]
    pub kind: String,
    pub level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(default)]
    pub line_managers: Vec<LineManagerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_company_type")]
    pub kind: String,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub children: Vec<DepartmentConfig>,
}

/// `organization-hierarchy.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationHierarchyConfig {
    pub company: CompanyConfig,
}

impl ConfigSchema for TeamTypesConfig {
    const FILE_NAME: &'static str = config_files::BASELINE_TEAM_TYPES;

    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        non_empty(&mut out, "team_types", self.team_types.len());
        for (idx, t) in self.team_types.iter().enumerate() {
            let at = format!("team_types → {idx}");
            check_entry(&mut out, &at, &t.id, &t.name, &t.description, &t.color);
        }
        out
    }
}

impl ConfigSchema for TtTeamTypesConfig {
    const FILE_NAME: &'static str = config_files::TT_TEAM_TYPES;

    fn problems(&self) -> Vec<String> {
        self.0.problems()
    }
}

impl ConfigSchema for ProductsConfig {
    const FILE_NAME: &'static str = config_files::PRODUCTS;

    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        non_empty(&mut out, "products", self.products.len());
        for (idx, p) in self.products.iter().enumerate() {
            let at = format!("products → {idx}");
            check_entry(&mut out, &at, &p.id, &p.name, &p.description, &p.color);
            check_order(&mut out, &at, p.display_order);
        }
        out
    }
}

impl ConfigSchema for BusinessStreamsConfig {
    const FILE_NAME: &'static str = config_files::BUSINESS_STREAMS;

    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        non_empty(&mut out, "business_streams", self.business_streams.len());
        for (idx, s) in self.business_streams.iter().enumerate() {
            let at = format!("business_streams → {idx}");
            check_entry(&mut out, &at, &s.id, &s.name, &s.description, &s.color);
            check_order(&mut out, &at, s.display_order);
        }
        out
    }
}

impl ConfigSchema for OrganizationHierarchyConfig {
    const FILE_NAME: &'static str = config_files::ORGANIZATION_HIERARCHY;

    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        let company = &self.company;
        check_node(&mut out, "company", &company.id, &company.name, company.level);
        for (d_idx, dept) in company.children.iter().enumerate() {
            let at = format!("company → children → {d_idx}");
            check_node(&mut out, &at, &dept.id, &dept.name, dept.level);
            for (m_idx, manager) in dept.line_managers.iter().enumerate() {
                let at = format!("{at} → line_managers → {m_idx}");
                check_node(&mut out, &at, &manager.id, &manager.name, manager.level);
            }
        }
        out
    }
}

fn check_node(out: &mut Vec<String>, at: &str, id: &str, name: &str, level: i64) {
    if id.is_empty() {
        out.push(format!("{at} → id: must be at least 1 character"));
    }
    if name.is_empty() {
        out.push(format!("{at} → name: must be at least 1 character"));
    }
    if level < 0 {
        out.push(format!("{at} → level: must be >= 0"));
    }
}

fn non_empty(out: &mut Vec<String>, field: &str, len: usize) {
    if len == 0 {
        out.push(format!("{field}: must contain at least 1 item"));
    }
}

fn check_entry(out: &mut Vec<String>, at: &str, id: &str, name: &str, description: &str, color: &str) {
    let id_len = id.chars().count();
    if id_len == 0 || id_len > MAX_ID_LEN {
        out.push(format!("{at} → id: must be 1-{MAX_ID_LEN} characters"));
    }
    let name_len = name.chars().count();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        out.push(format!("{at} → name: must be 1-{MAX_NAME_LEN} characters"));
    }
    if description.is_empty() {
        out.push(format!("{at} → description: must not be empty"));
    }
    if !is_hex_color(color) {
        out.push(format!("{at} → color: '{color}' is not a hex color like #3498db"));
    }
}

fn check_order(out: &mut Vec<String>, at: &str, order: Option<i64>) {
    if order.is_some_and(|o| o < 0) {
        out.push(format!("{at} → display_order: must be >= 0"));
    }
}

/// `#RRGGBB`
#[must_use]
pub fn is_hex_color(color: &str) -> bool {
    color
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Read and deserialize a config file; `Ok(None)` when it does not exist
///
/// # Errors
/// [`StoreError::Io`] when the file cannot be read, [`StoreError::ConfigJson`]
/// when it does not match the schema.
pub fn read_config<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io_error(path, e)),
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::ConfigJson {
            path: path.to_path_buf(),
            source,
        })
}

/// Vocabulary the team files of one view are checked against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewVocabulary {
    /// Accepted `team_type` values; empty disables the check
    pub team_types: Vec<String>,
    /// Product ids and names (baseline)
    pub product_lines: Vec<String>,
    /// Business stream ids and names (baseline)
    pub business_streams: Vec<String>,
}

impl ViewVocabulary {
    /// Load the vocabulary of `view`
    ///
    /// The `tt` view uses the fixed Team Topologies types. The `baseline`
    /// view reads its types from `baseline-team-types.json` (plus the
    /// organizational container types) and its product lines and business
    /// streams from `products.json` and `business-streams.json`. Missing
    /// files leave the corresponding list empty.
    ///
    /// # Errors
    /// Any error from [`read_config`].
    pub fn load(config: &StoreConfig, view: View) -> StoreResult<Self> {
        match view {
            View::Tt => Ok(Self {
                team_types: team_types::TT_TYPES.iter().map(|t| (*t).to_string()).collect(),
                ..Self::default()
            }),
            View::Baseline => {
                let mut vocabulary = Self::default();

                let types_path = config.config_path(view, TeamTypesConfig::FILE_NAME);
                if let Some(types) = read_config::<TeamTypesConfig>(&types_path)? {
                    vocabulary.team_types = types.team_types.into_iter().map(|t| t.id).collect();
                    vocabulary
                        .team_types
                        .extend(team_types::ORGANIZATION_TYPES.iter().map(|t| (*t).to_string()));
                }

                let products_path = config.config_path(view, ProductsConfig::FILE_NAME);
                if let Some(products) = read_config::<ProductsConfig>(&products_path)? {
                    vocabulary.product_lines = products
                        .products
                        .into_iter()
                        .flat_map(|p| [p.id, p.name])
                        .collect();
                }

                let streams_path = config.config_path(view, BusinessStreamsConfig::FILE_NAME);
                if let Some(streams) = read_config::<BusinessStreamsConfig>(&streams_path)? {
                    vocabulary.business_streams = streams
                        .business_streams
                        .into_iter()
                        .flat_map(|s| [s.id, s.name])
                        .collect();
                }

                debug!(
                    team_types = vocabulary.team_types.len(),
                    products = vocabulary.product_lines.len(),
                    business_streams = vocabulary.business_streams.len(),
                    "loaded baseline vocabulary"
                );
                Ok(vocabulary)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn products(json: &str) -> ProductsConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#3498db"));
        assert!(is_hex_color("#6FA8DC"));
        assert!(!is_hex_color("3498db"));
        assert!(!is_hex_color("#34"));
        assert!(!is_hex_color("#gggggg"));
    }

    #[test]
    fn valid_products_have_no_problems() {
        let config = products(
            r##"{"products": [{"id": "dispatchhub", "name": "DispatchHub", "description": "Fleet", "color": "#3498db"}]}"##,
        );
        assert!(config.problems().is_empty());
    }

    #[test]
    fn product_problems_are_located() {
        let long_id = "x".repeat(51);
        let json = format!(
            r##"{{"products": [{{"id": "{long_id}", "name": "", "description": "d", "color": "blue", "display_order": -1}}]}}"##
        );
        let problems = products(&json).problems();
        assert_eq!(problems.len(), 4);
        assert!(problems[0].starts_with("products → 0 → id"));
        assert!(problems[1].starts_with("products → 0 → name"));
        assert!(problems[2].contains("'blue'"));
        assert!(problems[3].contains("display_order"));
    }

    #[test]
    fn empty_list_is_a_problem() {
        let config: TeamTypesConfig = serde_json::from_str(r#"{"team_types": []}"#).unwrap();
        assert_eq!(config.problems(), vec!["team_types: must contain at least 1 item"]);
    }

    #[test]
    fn organization_hierarchy_defaults_and_problems() {
        let config: OrganizationHierarchyConfig = serde_json::from_str(
            r#"{"company": {"id": "acme", "name": "Acme", "children": [
                {"id": "eng", "name": "Engineering", "level": 1, "line_managers": [
                    {"id": "", "name": "Ann", "level": -2, "teams": ["Platform A"]}
                ]}
            ]}}"#,
        )
        .unwrap();

        assert_eq!(config.company.kind, "leadership");
        assert_eq!(config.company.level, 0);
        assert_eq!(config.company.children[0].kind, "department");
        assert_eq!(config.company.children[0].line_managers[0].kind, "line-manager");
        assert_eq!(
            config.problems(),
            vec![
                "company → children → 0 → line_managers → 0 → id: must be at least 1 character",
                "company → children → 0 → line_managers → 0 → level: must be >= 0",
            ]
        );
    }

    #[test]
    fn department_level_is_required() {
        let result = serde_json::from_str::<OrganizationHierarchyConfig>(
            r#"{"company": {"id": "acme", "name": "Acme", "children": [{"id": "eng", "name": "Engineering"}]}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn tt_vocabulary_is_fixed() {
        let vocabulary = ViewVocabulary::load(&StoreConfig::default(), View::Tt).unwrap();
        assert_eq!(vocabulary.team_types.len(), 5);
        assert!(vocabulary.team_types.iter().any(|t| t == "stream-aligned"));
        assert!(vocabulary.product_lines.is_empty());
    }

    #[test]
    fn baseline_vocabulary_reads_config_files() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new().with_data_root(dir.path());
        let view_dir = config.view_dir(View::Baseline);
        std::fs::create_dir_all(&view_dir).unwrap();
        std::fs::write(
            view_dir.join("baseline-team-types.json"),
            r##"{"team_types": [{"id": "feature-team", "name": "Feature Team", "description": "d", "color": "#6FA8DC"}]}"##,
        )
        .unwrap();
        std::fs::write(
            view_dir.join("business-streams.json"),
            r##"{"business_streams": [{"id": "b2b", "name": "B2B Fleet", "description": "d", "color": "#3498db"}]}"##,
        )
        .unwrap();

        let vocabulary = ViewVocabulary::load(&config, View::Baseline).unwrap();
        assert_eq!(vocabulary.team_types[0], "feature-team");
        assert!(vocabulary.team_types.iter().any(|t| t == "department"));
        assert_eq!(vocabulary.business_streams, vec!["b2b", "B2B Fleet"]);
        assert!(vocabulary.product_lines.is_empty());
    }

    #[test]
    fn baseline_without_config_has_no_types() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new().with_data_root(dir.path());
        let vocabulary = ViewVocabulary::load(&config, View::Baseline).unwrap();
        assert!(vocabulary.team_types.is_empty());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::new().with_data_root(dir.path());
        let view_dir = config.view_dir(View::Baseline);
        std::fs::create_dir_all(&view_dir).unwrap();
        std::fs::write(view_dir.join("products.json"), "{not json").unwrap();

        let err = ViewVocabulary::load(&config, View::Baseline).unwrap_err();
        assert!(matches!(err, StoreError::ConfigJson { .. }));
    }
}
