//! Front matter splitting
//!
//! A team file starts with a line containing exactly `---`, followed by a YAML
//! block closed by a second `---` line. Everything after the closing line is
//! the markdown body.

use crate::error::{ParseError, ParseResult};
use serde_yaml::{Mapping, Value};
use std::ops::Range;

/// Front matter delimiter line
pub const DELIMITER: &str = "---";

/// A document split into its metadata block and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter<'a> {
    /// Raw YAML between the delimiters
    pub metadata: &'a str,
    /// Markdown after the closing delimiter, trimmed
    pub body: &'a str,
    /// Byte range of `metadata` within the source text
    pub metadata_span: Range<usize>,
}

/// Why a document could not be split
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("missing YAML front matter (must start with '---')")]
    MissingOpeningDelimiter,

    #[error("malformed YAML front matter (missing closing '---')")]
    UnclosedBlock,
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Split raw text into metadata block and body
///
/// Does not parse the YAML; see [`parse_metadata`].
///
/// # Errors
/// - [`SplitError::MissingOpeningDelimiter`] if the first line is not `---`
/// - [`SplitError::UnclosedBlock`] if no second `---` line exists
pub fn split(raw: &str) -> Result<FrontMatter<'_>, SplitError> {
    let mut lines = raw.split_inclusive('\n');

    let first = lines.next().ok_or(SplitError::MissingOpeningDelimiter)?;
    if !is_delimiter(first) {
        return Err(SplitError::MissingOpeningDelimiter);
    }

    let metadata_start = first.len();
    let mut offset = metadata_start;
    for line in lines {
        if is_delimiter(line) {
            let metadata_span = metadata_start..offset;
            return Ok(FrontMatter {
                metadata: &raw[metadata_span.clone()],
                body: raw[offset + line.len()..].trim(),
                metadata_span,
            });
        }
        offset += line.len();
    }

    Err(SplitError::UnclosedBlock)
}

/// Parse a metadata block into a YAML mapping
///
/// An empty block yields an empty mapping.
///
/// # Errors
/// - [`ParseError::Yaml`] on invalid YAML
/// - [`ParseError::MalformedDocument`] when the block is not a mapping
pub fn parse_metadata(block: &str, file: &str) -> ParseResult<Mapping> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(block).map_err(|source| ParseError::Yaml {
        file: file.to_string(),
        source,
    })?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        _ => Err(ParseError::malformed(
            file,
            "front matter must be a key/value mapping",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_metadata_and_body() {
        let raw = "---\nteam_id: a\nname: A\n---\n\n# A\n\nBody text.\n";
        let doc = split(raw).unwrap();
        assert_eq!(doc.metadata, "team_id: a\nname: A\n");
        assert_eq!(doc.body, "# A\n\nBody text.");
        assert_eq!(&raw[doc.metadata_span.clone()], doc.metadata);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let raw = "---\r\nteam_id: a\r\n---\r\nbody\r\n";
        let doc = split(raw).unwrap();
        assert_eq!(doc.metadata, "team_id: a\r\n");
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn missing_opening_delimiter() {
        assert_eq!(
            split("team_id: a\n---\n"),
            Err(SplitError::MissingOpeningDelimiter)
        );
        assert_eq!(split(""), Err(SplitError::MissingOpeningDelimiter));
    }

    #[test]
    fn unclosed_block() {
        assert_eq!(split("---\nteam_id: a\n"), Err(SplitError::UnclosedBlock));
        assert_eq!(split("---"), Err(SplitError::UnclosedBlock));
    }

    #[test]
    fn empty_body_is_allowed() {
        let doc = split("---\nteam_id: a\n---").unwrap();
        assert_eq!(doc.body, "");
    }

    #[test]
    fn later_delimiters_stay_in_body() {
        let doc = split("---\na: 1\n---\nintro\n---\nmore\n").unwrap();
        assert_eq!(doc.body, "intro\n---\nmore");
    }

    #[test]
    fn empty_block_parses_to_empty_mapping() {
        assert!(parse_metadata("", "t.md").unwrap().is_empty());
    }

    #[test]
    fn non_mapping_block_is_malformed() {
        let err = parse_metadata("- a\n- b\n", "t.md").unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument { .. }));
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = parse_metadata("name: [unclosed\n", "t.md").unwrap_err();
        assert!(matches!(err, ParseError::Yaml { .. }));
    }
}
