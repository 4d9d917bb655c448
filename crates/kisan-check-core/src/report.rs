// crates/kisan-check-core/src/report.rs
// ============================================================================
// Module: Conformance Report
// Description: Per-check results, the run accumulator, and report artifacts.
// Purpose: Fold probe outcomes into a verdict and persist optional summaries.
// Dependencies: serde, serde_jcs, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! A [`TestRun`] is an ordered mapping from [`CheckId`] to [`TestResult`].
//! The verdict is `passed == total`; warnings from soft checks are carried
//! alongside but never counted as failures. [`RunReport`] snapshots a run into
//! canonical JSON (JCS) or Markdown.
//! Invariants:
//! - Results keep checklist insertion order; recording a check twice replaces it.
//! - Warnings never change `passed`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::client::ProbeError;
use crate::client::ProbeErrorKind;
use crate::model::CheckId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while rendering or writing report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A run timestamp could not be formatted.
    #[error("failed to format timestamp: {0}")]
    Timestamp(String),
    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(String),
    /// The artifact could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Outcome of one case inside a flattened check (the validation batch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseResult {
    /// Case label.
    pub name: String,
    /// Whether the case met its expectation.
    pub passed: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Failure classification when the case failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ProbeErrorKind>,
}

impl CaseResult {
    /// Builds a passing case.
    #[must_use]
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            error_kind: None,
        }
    }

    /// Builds a failing case from a probe error.
    #[must_use]
    pub fn fail(name: impl Into<String>, error: &ProbeError) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: error.to_string(),
            error_kind: Some(error.kind()),
        }
    }
}

/// Outcome of one named check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Which check produced this result.
    pub check: CheckId,
    /// Display name of the check.
    pub name: String,
    /// Verdict.
    pub passed: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Optional structured payload (for example the stored record).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Failure classification when the check failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ProbeErrorKind>,
    /// Soft-check findings; never affect `passed`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Per-case outcomes for flattened checks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_results: Vec<CaseResult>,
    /// Wall time spent in the check.
    pub duration_ms: u64,
}

impl TestResult {
    /// Builds a passing result.
    #[must_use]
    pub fn pass(check: CheckId, message: impl Into<String>) -> Self {
        Self {
            check,
            name: check.title().to_string(),
            passed: true,
            message: message.into(),
            details: None,
            error_kind: None,
            warnings: Vec::new(),
            sub_results: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Builds a failing result with an explicit classification.
    #[must_use]
    pub fn failed(check: CheckId, kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            error_kind: Some(kind),
            ..Self::pass(check, message)
        }
    }

    /// Builds a failing result from a probe error.
    #[must_use]
    pub fn from_error(check: CheckId, error: &ProbeError) -> Self {
        Self::failed(check, error.kind(), error.to_string())
    }

    /// Attaches a structured payload.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Appends a soft-check warning.
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Replaces the per-case outcomes.
    #[must_use]
    pub fn with_sub_results(mut self, sub_results: Vec<CaseResult>) -> Self {
        self.sub_results = sub_results;
        self
    }

    /// Records the time spent in the check.
    #[must_use]
    pub fn with_duration(mut self, elapsed: Duration) -> Self {
        self.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

// ============================================================================
// SECTION: Run Accumulator
// ============================================================================

/// Pass/fail tally for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Checks that passed.
    pub passed: usize,
    /// Checks recorded.
    pub total: usize,
    /// Soft-check warnings across all checks.
    pub warnings: usize,
}

impl RunSummary {
    /// Returns true when every recorded check passed.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.passed == self.total
    }
}

/// Ordered results of a single checker execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TestRun {
    /// Registry API root the run targeted.
    api_root: String,
    /// Time the run started.
    started_at: OffsetDateTime,
    /// Time the run finished, once finished.
    finished_at: Option<OffsetDateTime>,
    /// Results in insertion order.
    results: Vec<TestResult>,
}

impl TestRun {
    /// Starts an empty run against `api_root`.
    #[must_use]
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into(),
            started_at: OffsetDateTime::now_utc(),
            finished_at: None,
            results: Vec::new(),
        }
    }

    /// Records a result, replacing any earlier result for the same check.
    pub fn record(&mut self, result: TestResult) {
        if let Some(existing) = self.results.iter_mut().find(|entry| entry.check == result.check) {
            *existing = result;
        } else {
            self.results.push(result);
        }
    }

    /// Marks the run finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(OffsetDateTime::now_utc());
    }

    /// Returns the registry API root.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Returns the start time.
    #[must_use]
    pub const fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    /// Returns the results in insertion order.
    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Returns the result recorded for `check`.
    #[must_use]
    pub fn get(&self, check: CheckId) -> Option<&TestResult> {
        self.results.iter().find(|entry| entry.check == check)
    }

    /// Tallies the recorded results.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            passed: self.results.iter().filter(|result| result.passed).count(),
            total: self.results.len(),
            warnings: self.results.iter().map(|result| result.warnings.len()).sum(),
        }
    }

    /// Returns true when every recorded check passed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.summary().succeeded()
    }

    /// Process exit status for the run: `0` on success, `1` otherwise.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        u8::from(!self.succeeded())
    }

    /// Snapshots the run into a serializable report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Timestamp`] when a run timestamp cannot be formatted.
    pub fn report(&self) -> Result<RunReport, ReportError> {
        let finished_at = self.finished_at.unwrap_or_else(OffsetDateTime::now_utc);
        Ok(RunReport {
            api_root: self.api_root.clone(),
            started_at: format_timestamp(self.started_at)?,
            finished_at: format_timestamp(finished_at)?,
            summary: self.summary(),
            succeeded: self.succeeded(),
            results: self.results.clone(),
        })
    }
}

// ============================================================================
// SECTION: Report Artifacts
// ============================================================================

/// Serializable snapshot of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Registry API root.
    pub api_root: String,
    /// RFC 3339 start time.
    pub started_at: String,
    /// RFC 3339 finish time.
    pub finished_at: String,
    /// Pass/fail tally.
    pub summary: RunSummary,
    /// Overall verdict.
    pub succeeded: bool,
    /// Results in checklist order.
    pub results: Vec<TestResult>,
}

impl RunReport {
    /// Serializes the report as canonical JSON (JCS).
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] when serialization fails.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, ReportError> {
        serde_jcs::to_vec(self).map_err(|err| ReportError::Serialize(err.to_string()))
    }

    /// Writes the canonical JSON report to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when serialization or the write fails.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let bytes = self.to_canonical_json()?;
        write_artifact(path, &bytes)
    }

    /// Writes the Markdown summary to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] when the write fails.
    pub fn write_markdown(&self, path: &Path) -> Result<(), ReportError> {
        write_artifact(path, self.render_markdown().as_bytes())
    }

    /// Renders the Markdown summary.
    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Kisan Check Conformance Report\n\n");
        out.push_str("## Status\n\n");
        out.push_str(&format!("- Target: {}\n", self.api_root));
        out.push_str(&format!(
            "- Result: {}/{} checks passed\n",
            self.summary.passed, self.summary.total
        ));
        out.push_str(&format!("- Verdict: {}\n", if self.succeeded { "pass" } else { "fail" }));
        out.push_str(&format!("- Started: {}\n", self.started_at));
        out.push_str(&format!("- Finished: {}\n", self.finished_at));
        out.push_str("\n## Checks\n\n");
        if self.results.is_empty() {
            out.push_str("- None\n");
        }
        for result in &self.results {
            out.push_str(&format!(
                "- [{}] {} (`{}`): {}\n",
                status_label(result.passed),
                result.name,
                result.check.key(),
                result.message
            ));
            for case in &result.sub_results {
                out.push_str(&format!(
                    "  - [{}] {}: {}\n",
                    status_label(case.passed),
                    case.name,
                    case.message
                ));
            }
        }
        out.push_str("\n## Warnings\n\n");
        let mut any_warning = false;
        for result in &self.results {
            for warning in &result.warnings {
                any_warning = true;
                out.push_str(&format!("- {}: {}\n", result.name, warning));
            }
        }
        if !any_warning {
            out.push_str("- None\n");
        }
        out
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Formats a timestamp as RFC 3339.
fn format_timestamp(value: OffsetDateTime) -> Result<String, ReportError> {
    value.format(&Rfc3339).map_err(|err| ReportError::Timestamp(err.to_string()))
}

/// Returns the Markdown status label.
const fn status_label(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

/// Writes artifact bytes to disk.
fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    fs::write(path, bytes).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
