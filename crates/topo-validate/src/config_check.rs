//! Validation of the per-view JSON config files

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use topo_store::view_config::{
    read_config, BusinessStreamsConfig, OrganizationHierarchyConfig, ProductsConfig,
    TeamTypesConfig, TtTeamTypesConfig,
};
use topo_store::{ConfigSchema, StoreConfig, StoreError, View};
use tracing::{debug, warn};

/// Result of checking one config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFileResult {
    /// Config file name
    pub file: String,
    /// No errors were found
    pub valid: bool,
    /// Problems, each prefixed with its location
    pub errors: Vec<String>,
}

/// Results for every config file of a view, keyed by file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    /// View whose config files were checked
    pub view: View,
    /// Result per file name
    pub config_files: BTreeMap<String, ConfigFileResult>,
    /// Number of files that failed
    pub total_errors: usize,
}

impl ConfigReport {
    /// Whether any config file is invalid
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}

/// Deserialize `path` as `T` and collect its schema problems
///
/// A missing file, invalid JSON or a schema mismatch each yield an invalid
/// result rather than an error.
#[must_use]
pub fn validate_config_file<T: ConfigSchema>(path: &Path) -> ConfigFileResult {
    let errors = match read_config::<T>(path) {
        Ok(Some(config)) => config.problems(),
        Ok(None) => vec![format!("File not found: {}", path.display())],
        Err(StoreError::ConfigJson { source, .. }) => vec![format!("Invalid JSON: {source}")],
        Err(other) => vec![format!("Unexpected error: {other}")],
    };

    ConfigFileResult {
        file: T::FILE_NAME.to_string(),
        valid: errors.is_empty(),
        errors,
    }
}

/// Check every config file `view` relies on
///
/// Baseline: team types, products, business streams and the organization
/// hierarchy. Tt: its team types.
#[must_use]
pub fn validate_config_files(config: &StoreConfig, view: View) -> ConfigReport {
    let path = |name: &str| config.config_path(view, name);
    let results = match view {
        View::Baseline => vec![
            validate_config_file::<TeamTypesConfig>(&path(TeamTypesConfig::FILE_NAME)),
            validate_config_file::<ProductsConfig>(&path(ProductsConfig::FILE_NAME)),
            validate_config_file::<BusinessStreamsConfig>(&path(BusinessStreamsConfig::FILE_NAME)),
            validate_config_file::<OrganizationHierarchyConfig>(&path(
                OrganizationHierarchyConfig::FILE_NAME,
            )),
        ],
        View::Tt => vec![validate_config_file::<TtTeamTypesConfig>(&path(
            TtTeamTypesConfig::FILE_NAME,
        ))],
    };

    let mut report = ConfigReport {
        view,
        config_files: BTreeMap::new(),
        total_errors: 0,
    };
    for result in results {
        if result.valid {
            debug!(file = %result.file, "config file valid");
        } else {
            report.total_errors += 1;
            warn!(file = %result.file, errors = result.errors.len(), "config file invalid");
        }
        report.config_files.insert(result.file.clone(), result);
    }
    report
}
