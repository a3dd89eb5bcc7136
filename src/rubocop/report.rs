//! Data model for `rubocop --format json` output.
//!
//! Everything here is produced by the external linter and consumed only for
//! display. Counts in `Summary` are trusted as reported.

use serde::Deserialize;

use crate::error::{Result, RubocopError};

#[derive(Debug, Clone, Deserialize)]
pub struct LintReport {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

/// Tool / runtime version strings (informational only).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub rubocop_version: String,
    pub ruby_engine: String,
    pub ruby_version: String,
    pub ruby_patchlevel: String,
    pub ruby_platform: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub offense_count: u64,
    pub target_file_count: u64,
    pub inspected_file_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileReport {
    pub path: String,
    #[serde(default)]
    pub offenses: Vec<Offense>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Offense {
    pub severity: Severity,
    pub message: String,
    pub cop_name: String,
    #[serde(default)]
    pub correctable: bool,
    #[serde(default)]
    pub corrected: bool,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Refactor,
    Convention,
    Warning,
    Error,
    Fatal,
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Error | Severity::Fatal => "❌",
            Severity::Warning => "⚠️",
            _ => "ℹ️",
        }
    }
}

/// Position of an offense. `line`/`column` are always present; the span
/// fields are only emitted by newer linter versions.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    #[serde(default)]
    pub start_line: Option<u32>,
    #[serde(default)]
    pub start_column: Option<u32>,
    #[serde(default)]
    pub last_line: Option<u32>,
    #[serde(default)]
    pub last_column: Option<u32>,
    #[serde(default)]
    pub length: Option<u32>,
}

/// Decode the linter's JSON report, keeping the raw text on failure.
pub fn parse_report(stdout: &str) -> Result<LintReport> {
    serde_json::from_str(stdout).map_err(|source| {
        tracing::debug!(raw_output = %stdout, "unparseable rubocop output");
        RubocopError::Parse {
            raw_output: stdout.to_string(),
            source,
        }
    })
}
