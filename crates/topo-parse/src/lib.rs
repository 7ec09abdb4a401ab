//! Team file parsing
//!
//! The trusted boundary between team files on disk and [`TeamRecord`].
//!
//! # Pipeline
//!
//! ```text
//! bytes → split → YAML → flatten → enrich (purpose, dependencies, modes) → TeamRecord
//!                                                                          ↓
//!                                    file ← render / position patch ← TeamRecord
//! ```
//!
//! - **Ingress**: [`parse_file`] / [`parse_str`], fatal per file
//! - **Egress**: [`write_record`] normalizes the whole file,
//!   [`update_position`] patches only the `position` block
//!
//! # Example
//!
//! ```rust
//! use topo_parse::parse_str;
//!
//! let raw = concat!(
//!     "---\nteam_id: platform-a\nname: Platform A\n---\n",
//!     "\n## Teams we currently interact with\n",
//!     "| Team Name | Interaction Mode | Purpose |\n",
//!     "|-----------|------------------|---------|\n",
//!     "| Squad B | Collaboration | New API |\n",
//! );
//!
//! let team = parse_str(raw, "platform-a.md").unwrap();
//! assert_eq!(team.dependency_list(), ["Squad B"]);
//! assert_eq!(team.interaction_mode_with("Squad B"), Some("collaboration"));
//! ```
//!
//! [`TeamRecord`]: topo_model::TeamRecord

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod assemble;
pub mod enrich;
pub mod error;
pub mod flatten;
pub mod frontmatter;
pub mod writer;

pub use assemble::{parse_file, parse_str};
pub use enrich::looks_like_narrative_note;
pub use error::{ParseError, ParseResult, SerializeError};
pub use flatten::flatten;
pub use frontmatter::{split, FrontMatter, SplitError};
pub use writer::{render_record, update_position, update_position_in_text, write_record, SerializeResult};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
