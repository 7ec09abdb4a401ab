//! Team Topology data model
//!
//! Canonical in-memory representation of a team file, shared by the parser,
//! the store and the validation sweep.
//!
//! # Core Concepts
//!
//! - [`TeamRecord`]: one parsed team, rebuilt fresh on every read
//! - [`TeamId`]: slug-safe stable identifier (`api-gateway-team`)
//! - [`FlowMetrics`]: DORA-style delivery metrics with range checks
//! - [`InteractionMode`]: the three Team Topologies interaction kinds
//! - [`slugify`]: name → identifier transform used for cross-referencing
//!
//! # Example
//!
//! ```rust
//! use topo_model::{slugify, normalize_interaction_mode};
//!
//! assert_eq!(slugify("Data & Analytics Team"), "data-and-analytics-team");
//! assert_eq!(normalize_interaction_mode("XaaS"), "x-as-a-service");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod constants;
mod flow;
mod interaction;
mod record;
mod slug;
mod team_id;

pub use flow::{DeploymentFrequency, FlowMetricViolation, FlowMetrics};
pub use interaction::{normalize_interaction_mode, Interaction, InteractionMode};
pub use record::{Position, TeamApi, TeamRecord};
pub use slug::slugify;
pub use team_id::{TeamId, TeamIdError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
