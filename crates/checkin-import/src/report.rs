//! Line-addressed error reporting for CSV imports.
//!
//! Fatal issues (unreadable file, undetermined charset, missing header)
//! short-circuit the pipeline with a single entry; row-scoped issues
//! accumulate while the scan continues. Both render as plain strings for the
//! calling layer, but stay structurally distinct until then.

use std::fmt;

use thiserror::Error;

/// One entry in an import error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportIssue {
    /// A whole-file failure.
    Fatal(String),
    /// A failure scoped to one data row (1-based file line).
    Row { line: u64, message: String },
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportIssue::Fatal(message) => f.write_str(message),
            ImportIssue::Row { line, message } => write!(f, "{} 行 : {}", line, message),
        }
    }
}

/// Accumulator for issues discovered during one import call.
#[derive(Debug, Default)]
pub(crate) struct ImportReport {
    issues: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fatal(&mut self, message: impl Into<String>) {
        self.issues.push(ImportIssue::Fatal(message.into()));
    }

    pub fn push_row(&mut self, line: u64, message: impl Into<String>) {
        self.issues.push(ImportIssue::Row {
            line,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Consume the accumulated issues into the caller-facing error.
    pub fn into_error(self) -> CsvImportError {
        CsvImportError {
            issues: self.issues,
        }
    }
}

/// Aggregated, ordered, non-empty error report returned to the caller.
///
/// A returned `CsvImportError` always means zero check-ins were persisted by
/// that import call. The calling layer renders [`messages`](Self::messages)
/// verbatim to the end user.
#[derive(Debug, Error)]
#[error("CSV import failed with {} error(s)", .issues.len())]
pub struct CsvImportError {
    issues: Vec<ImportIssue>,
}

impl CsvImportError {
    /// Build a single-issue fatal report.
    pub(crate) fn fatal(message: impl Into<String>) -> Self {
        Self {
            issues: vec![ImportIssue::Fatal(message.into())],
        }
    }

    /// The structured issues, in discovery order.
    pub fn issues(&self) -> &[ImportIssue] {
        &self.issues
    }

    /// The rendered error strings, in discovery order.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}
