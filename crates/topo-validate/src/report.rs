//! Aggregated sweep results

use crate::rules::Findings;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use topo_store::View;

/// Errors and warnings of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileIssues {
    /// Path relative to the view directory
    pub file: String,
    /// Blocking problems
    pub errors: Vec<String>,
    /// Advisory problems
    pub warnings: Vec<String>,
}

impl FileIssues {
    /// Issues of `file` taken from its findings
    #[must_use]
    pub fn new(file: impl Into<String>, findings: Findings) -> Self {
        Self {
            file: file.into(),
            errors: findings.errors,
            warnings: findings.warnings,
        }
    }
}

/// Outcome of validating every team file of a view
///
/// Every checked file lands in exactly one of the three buckets; `issues`
/// lists only the files with at least one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// View that was swept
    pub view: View,
    /// Files checked, skip list excluded
    pub total_files: usize,
    /// Files with no findings at all
    pub valid_files: usize,
    /// Files with warnings but no errors
    pub files_with_warnings: usize,
    /// Files with at least one error
    pub files_with_errors: usize,
    /// Files with findings, in walk order
    pub issues: Vec<FileIssues>,
}

impl Report {
    /// Empty report for `view`
    #[must_use]
    pub fn new(view: View) -> Self {
        Self {
            view,
            total_files: 0,
            valid_files: 0,
            files_with_warnings: 0,
            files_with_errors: 0,
            issues: Vec::new(),
        }
    }

    /// Count one file and keep its findings when there are any
    pub fn record(&mut self, file: impl Into<String>, findings: Findings) {
        self.total_files += 1;
        if !findings.errors.is_empty() {
            self.files_with_errors += 1;
        } else if !findings.warnings.is_empty() {
            self.files_with_warnings += 1;
        } else {
            self.valid_files += 1;
            return;
        }
        self.issues.push(FileIssues::new(file, findings));
    }

    /// Whether any file has an error
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.files_with_errors > 0
    }

    /// Issues of one file, if it had any
    #[must_use]
    pub fn issues_for(&self, file: &str) -> Option<&FileIssues> {
        self.issues.iter().find(|i| i.file == file)
    }

    /// Total number of error messages across all files
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.issues.iter().map(|i| i.errors.len()).sum()
    }

    /// Total number of warning messages across all files
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.issues.iter().map(|i| i.warnings.len()).sum()
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation report ({} view)", self.view)?;
        writeln!(f, "  total files:   {}", self.total_files)?;
        writeln!(f, "  valid:         {}", self.valid_files)?;
        writeln!(f, "  warnings only: {}", self.files_with_warnings)?;
        writeln!(f, "  with errors:   {}", self.files_with_errors)?;

        for issue in &self.issues {
            writeln!(f)?;
            writeln!(f, "{}", issue.file)?;
            for error in &issue.errors {
                writeln!(f, "  error: {error}")?;
            }
            for warning in &issue.warnings {
                writeln!(f, "  warning: {warning}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings(errors: &[&str], warnings: &[&str]) -> Findings {
        Findings {
            errors: errors.iter().map(|s| (*s).to_string()).collect(),
            warnings: warnings.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn buckets_are_exclusive() {
        let mut report = Report::new(View::Tt);
        report.record("a.md", findings(&[], &[]));
        report.record("b.md", findings(&[], &["w"]));
        report.record("c.md", findings(&["e"], &["w", "w2"]));

        assert_eq!(report.total_files, 3);
        assert_eq!(report.valid_files, 1);
        assert_eq!(report.files_with_warnings, 1);
        assert_eq!(report.files_with_errors, 1);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues_for("a.md").is_none());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 3);
        assert!(report.has_errors());
    }

    #[test]
    fn serializes_view_in_lowercase() {
        let mut report = Report::new(View::Baseline);
        report.record("x.md", findings(&["bad"], &[]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["view"], "baseline");
        assert_eq!(json["files_with_errors"], 1);
        assert_eq!(json["issues"][0]["file"], "x.md");
        assert_eq!(json["issues"][0]["errors"][0], "bad");
    }

    #[test]
    fn display_lists_findings() {
        let mut report = Report::new(View::Tt);
        report.record("x.md", findings(&["bad"], &["meh"]));
        let text = report.to_string();
        assert!(text.contains("Validation report (tt view)"));
        assert!(text.contains("  error: bad"));
        assert!(text.contains("  warning: meh"));
    }
}
