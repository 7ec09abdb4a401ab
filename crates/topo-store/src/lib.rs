//! Team store
//!
//! Locates the team files of a view inside a data directory, loads them in
//! bulk (tolerating bad files), answers lookups and writes changes back.
//!
//! # Example
//!
//! ```rust,no_run
//! use topo_store::{StoreConfig, TeamStore, View};
//!
//! let store = TeamStore::new(StoreConfig::new().with_data_root("data"), View::Tt);
//! for team in store.load_all() {
//!     println!("{} ({})", team.name, team.team_type);
//! }
//! if let Some(found) = store.find_by_name_or_slug("ci-cd-platform-team") {
//!     println!("{}", found.path.display());
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod store;
pub mod view_config;

pub use config::{StoreConfig, View};
pub use error::{StoreError, StoreResult};
pub use store::{team_files_in, LoadedTeam, TeamIndex, TeamStore, SKIP_FILES};
pub use view_config::{ConfigSchema, ViewVocabulary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
