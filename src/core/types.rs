//! Result and report types produced by an analysis run.
//!
//! The Rust-side types keep the full [`Outcome`] classification. Their
//! serialized form is the flat wire shape callers consume:
//!
//! ```json
//! {
//!   "success": false,
//!   "results": {
//!     "pylint": { "success": false, "issues": ["E001: bad thing"], "message": "pylint found issues" }
//!   },
//!   "message": "Analysis completed for /tmp/example.py"
//! }
//! ```

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::errors::Error;

/// Normalized classification of one analyzer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The analyzer exited with status zero
    Clean,
    /// The analyzer exited with a nonzero status and reported findings
    IssuesFound,
    /// The analyzer could not be run, crashed, timed out or was unknown
    ExecutionError,
}

impl Outcome {
    pub fn is_clean(self) -> bool {
        self == Self::Clean
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::IssuesFound => write!(f, "issues_found"),
            Self::ExecutionError => write!(f, "execution_error"),
        }
    }
}

/// Outcome of running a single analyzer against one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerResult {
    pub analyzer_name: String,
    pub outcome: Outcome,
    pub raw_output_lines: Vec<String>,
    pub message: String,
}

impl AnalyzerResult {
    pub fn clean(name: &str) -> Self {
        Self {
            analyzer_name: name.to_string(),
            outcome: Outcome::Clean,
            raw_output_lines: Vec::new(),
            message: format!("No issues found by {}", name),
        }
    }

    pub fn issues_found(name: &str, lines: Vec<String>) -> Self {
        Self {
            analyzer_name: name.to_string(),
            outcome: Outcome::IssuesFound,
            raw_output_lines: lines,
            message: format!("{} found issues", name),
        }
    }

    /// The analyzer could not produce a verdict; `detail` explains why.
    pub fn execution_error(name: &str, detail: impl fmt::Display) -> Self {
        Self {
            analyzer_name: name.to_string(),
            outcome: Outcome::ExecutionError,
            raw_output_lines: Vec::new(),
            message: format!("Error running {}: {}", name, detail),
        }
    }

    pub fn unknown_analyzer(name: &str) -> Self {
        Self {
            analyzer_name: name.to_string(),
            outcome: Outcome::ExecutionError,
            raw_output_lines: Vec::new(),
            message: format!("Unknown analyzer: {}", name),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_clean()
    }
}

impl Serialize for AnalyzerResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AnalyzerResult", 3)?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("issues", &self.raw_output_lines)?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// Aggregated result of running a set of analyzers against one artifact.
///
/// `results` is `None` when the call was aborted before any analyzer ran
/// (missing target, failed materialization).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub target: String,
    pub success: bool,
    pub results: Option<BTreeMap<String, AnalyzerResult>>,
    pub message: String,
}

impl Report {
    /// Build a completed report. Success is the conjunction of every
    /// result being clean; an empty set of results counts as success.
    pub fn completed(target: impl Into<String>, results: Vec<AnalyzerResult>) -> Self {
        let target = target.into();
        let results: BTreeMap<String, AnalyzerResult> = results
            .into_iter()
            .map(|r| (r.analyzer_name.clone(), r))
            .collect();
        let success = results.values().all(AnalyzerResult::is_success);

        Self {
            message: format!("Analysis completed for {}", target),
            target,
            success,
            results: Some(results),
        }
    }

    /// Build a report for a call that never reached the analyzers.
    pub fn aborted(target: impl Into<String>, error: &Error) -> Self {
        Self {
            target: target.into(),
            success: false,
            results: None,
            message: error.to_string(),
        }
    }

    pub fn result(&self, analyzer: &str) -> Option<&AnalyzerResult> {
        self.results.as_ref().and_then(|r| r.get(analyzer))
    }

    pub fn len(&self) -> usize {
        self.results.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of results with the given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.results
            .iter()
            .flat_map(BTreeMap::values)
            .filter(|r| r.outcome == outcome)
            .count()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.results.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("Report", fields)?;
        state.serialize_field("success", &self.success)?;
        match &self.results {
            Some(results) => state.serialize_field("results", results)?,
            None => state.skip_field("results")?,
        }
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// Confirmation returned by a successful analyzer registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    pub success: bool,
    pub message: String,
}

impl RegistrationReceipt {
    pub fn added(name: &str) -> Self {
        Self {
            success: true,
            message: format!("Added analyzer: {}", name),
        }
    }
}
