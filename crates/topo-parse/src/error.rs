//! Error types for team file parsing
//!
//! Provides error handling for:
//! - Parse operations (file → TeamRecord)
//! - Serialize operations (TeamRecord → file)

use std::path::PathBuf;
use topo_model::Position;

/// Errors while reading a team file (ingress)
///
/// Every variant is fatal for the single file being parsed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Front matter missing or never closed
    #[error("malformed document {file}: {reason}")]
    MalformedDocument { file: String, reason: String },

    /// No `team_id` key (or an empty one)
    #[error("Missing team_id in {file}. All teams must have a unique team_id.")]
    MissingIdentifier { file: String },

    /// `team_id` present but not slug-safe
    #[error(
        "Invalid team_id '{value}' in {file}. team_id must be slug-safe: lowercase \
         alphanumeric with dashes only (e.g., 'api-gateway-team')"
    )]
    InvalidIdentifierFormat { value: String, file: String },

    /// A flow metric is out of range or mistyped
    #[error("Invalid {field} in {file}: {reason}")]
    InvalidFlowMetric {
        field: &'static str,
        file: String,
        reason: String,
    },

    /// A field has the wrong shape or type
    #[error("invalid field '{field}' in {file}: {reason}")]
    InvalidField {
        field: String,
        file: String,
        reason: String,
    },

    /// Front matter is not valid YAML
    #[error("YAML parse error in {file}: {source}")]
    Yaml {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Create malformed-document error for file
    pub fn malformed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create field error for file
    pub fn invalid_field(
        file: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Name of the offending field, for field-level failures
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidFlowMetric { field, .. } => Some(*field),
            Self::InvalidField { field, .. } => Some(field.as_str()),
            Self::MissingIdentifier { .. } | Self::InvalidIdentifierFormat { .. } => {
                Some("team_id")
            }
            _ => None,
        }
    }
}

/// Errors while writing a team file (egress)
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// YAML rendering failed
    #[error("serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Existing file cannot be patched in place
    #[error("malformed document {file}: {reason}")]
    MalformedDocument { file: String, reason: String },

    /// NaN or infinite coordinates would not read back as numbers
    #[error("position must be finite, got ({x}, {y})")]
    NonFinitePosition { x: f64, y: f64 },

    /// IO error during file write
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SerializeError {
    /// Reject `position` unless both coordinates are finite
    ///
    /// # Errors
    /// [`SerializeError::NonFinitePosition`] naming both coordinates.
    pub fn check_position(position: Position) -> Result<(), Self> {
        if position.is_finite() {
            Ok(())
        } else {
            Err(Self::NonFinitePosition {
                x: position.x,
                y: position.y,
            })
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_identifier_display() {
        let err = ParseError::MissingIdentifier {
            file: "team.md".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing team_id in team.md. All teams must have a unique team_id."
        );
    }

    #[test]
    fn invalid_identifier_mentions_value_and_file() {
        let err = ParseError::InvalidIdentifierFormat {
            value: "API_Gateway".to_string(),
            file: "api.md".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("API_Gateway"));
        assert!(msg.contains("api.md"));
    }

    #[test]
    fn flow_metric_names_field() {
        let err = ParseError::InvalidFlowMetric {
            field: "mttr_hours",
            file: "ops.md".to_string(),
            reason: "must be non-negative number".to_string(),
        };
        assert_eq!(err.field(), Some("mttr_hours"));
        assert!(err.to_string().contains("mttr_hours"));
    }

    #[test]
    fn serialize_error_from_yaml() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        let err: SerializeError = yaml_err.into();
        assert!(matches!(err, SerializeError::Yaml(_)));
    }
}
