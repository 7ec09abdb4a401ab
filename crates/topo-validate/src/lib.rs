//! Validation sweep
//!
//! Re-checks every team file of a view with a superset of the parser's
//! structural rules and reports errors and warnings without touching any
//! file. Unlike the loader, it keeps going where parsing would stop, so one
//! run lists every problem of every file.
//!
//! # Architecture
//!
//! ```text
//! StoreConfig + View ──→ ViewVocabulary, known teams
//!                              │
//!   team file ──split──→ YAML ─┴─→ YAML_RULES ──┐
//!             └──body──→ interaction table rule ─┴─→ Findings ──→ Report
//! ```
//!
//! - [`rules`]: one function per check, registered in [`YAML_RULES`]
//! - [`sweep`]: the two-pass walk producing a [`Report`]
//! - [`config_check`]: schema checks of the per-view JSON config files
//!
//! # Example
//!
//! ```rust,no_run
//! use topo_store::{StoreConfig, View};
//! use topo_validate::validate_all;
//!
//! let report = validate_all(&StoreConfig::new(), View::Tt)?;
//! println!("{report}");
//! if report.has_errors() {
//!     std::process::exit(1);
//! }
//! # Ok::<(), topo_store::StoreError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config_check;
pub mod context;
pub mod report;
pub mod rules;
pub mod sweep;

pub use config_check::{validate_config_file, validate_config_files, ConfigFileResult, ConfigReport};
pub use context::ValidationContext;
pub use report::{FileIssues, Report};
pub use rules::{check_interaction_table, run_yaml_rules, Findings, Rule, YAML_RULES};
pub use sweep::{validate_all, validate_document, VALIDATOR_SKIP_FILES};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
