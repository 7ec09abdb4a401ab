//! Data directory configuration

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding the data root
pub const DATA_DIR_ENV: &str = "TEAMTOPO_DATA_DIR";

/// Environment variable selecting the Team Topologies design variant
pub const TT_VARIANT_ENV: &str = "TT_DESIGN_VARIANT";

/// Directory of the baseline (current organization) view
pub const BASELINE_DIR: &str = "baseline-teams";

/// Which corpus of team files to operate on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Team Topologies design
    #[default]
    Tt,
    /// Current organization as-is
    Baseline,
}

impl View {
    pub const ALL: [View; 2] = [View::Tt, View::Baseline];

    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tt => "tt",
            Self::Baseline => "baseline",
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tt" => Ok(Self::Tt),
            "baseline" | "current" => Ok(Self::Baseline),
            other => Err(format!("unknown view '{other}' (expected 'tt' or 'baseline')")),
        }
    }
}

/// Where team files live
///
/// Injected into [`crate::TeamStore`]; nothing below the binary reads the
/// process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root holding one directory per view
    pub data_root: PathBuf,
    /// Directory name of the `tt` view under `data_root`
    pub tt_variant: String,
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `TEAMTOPO_DATA_DIR` and `TT_DESIGN_VARIANT`
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            config.data_root = PathBuf::from(root);
        }
        if let Ok(variant) = std::env::var(TT_VARIANT_ENV) {
            if !variant.trim().is_empty() {
                config.tt_variant = variant.trim().to_string();
            }
        }
        config
    }

    /// With data root
    #[inline]
    #[must_use]
    pub fn with_data_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data_root = root.into();
        self
    }

    /// With design variant directory for the `tt` view
    #[inline]
    #[must_use]
    pub fn with_tt_variant(mut self, variant: impl Into<String>) -> Self {
        self.tt_variant = variant.into();
        self
    }

    /// Directory holding the team files of `view`
    #[must_use]
    pub fn view_dir(&self, view: View) -> PathBuf {
        match view {
            View::Tt => self.data_root.join(&self.tt_variant),
            View::Baseline => self.data_root.join(BASELINE_DIR),
        }
    }

    /// Path of a config file inside the directory of `view`
    #[must_use]
    pub fn config_path(&self, view: View, file_name: impl AsRef<Path>) -> PathBuf {
        self.view_dir(view).join(file_name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            tt_variant: "tt-teams".to_string(),
        }
    }
}
