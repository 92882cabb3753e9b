use crate::report::{RunInfo, ToolInfo};
use serde::{Deserialize, Serialize};

/// Outcome of repairing a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: String,
    pub changed: bool,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

/// Stage at which a file-scoped failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Read,
    Write,
}

/// A file-scoped failure. Failures are isolated: they never abort the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: String,
    pub stage: FailureStage,
    pub message: String,
}

/// Result of the external verification step.
///
/// `unknown` covers every case where no verdict exists: verification was
/// skipped, the verifier could not be started, or it timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    Passed,
    Failed,
    #[default]
    Unknown,
}

/// Captured output of a verifier invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifierResult {
    pub verification: Verification,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,

    /// Combined stdout/stderr, captured for reporting but never parsed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl VerifierResult {
    /// Verification was not attempted at all.
    pub fn skipped() -> Self {
        Self {
            verification: Verification::Unknown,
            exit_code: None,
            output: String::new(),
            detail: Some("verification skipped: no verify command configured".to_string()),
        }
    }

    /// The verifier could not be started or did not finish in time.
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            verification: Verification::Unknown,
            exit_code: None,
            output: String::new(),
            detail: Some(detail.into()),
        }
    }
}

/// Terminal state of a repair run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    CompletedClean,
    CompletedModified,
    CompletedWithFileErrors,
}

/// Corpus-level aggregate of a repair run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_scanned: u64,
    pub files_changed: u64,
    pub files_errored: u64,
    pub verification: Verification,
    pub status: RunStatus,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self {
            files_scanned: 0,
            files_changed: 0,
            files_errored: 0,
            verification: Verification::Unknown,
            status: RunStatus::CompletedClean,
        }
    }
}

/// Full record of one repair run, serialized as `run.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrcfixRun {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,

    /// Name of the rule-set profile that was applied.
    pub profile: String,

    /// Root the run operated on.
    pub root: String,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub outcomes: Vec<FileOutcome>,

    #[serde(default)]
    pub failures: Vec<FileFailure>,

    /// Explicit paths that did not exist and were skipped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<VerifierResult>,

    pub summary: RunSummary,
}

impl SrcfixRun {
    pub fn new(tool: ToolInfo, profile: String, root: String) -> Self {
        Self {
            schema: crate::schema::SRCFIX_RUN_V1.to_string(),
            tool,
            run: RunInfo::default(),
            profile,
            root,
            dry_run: false,
            outcomes: vec![],
            failures: vec![],
            missing: vec![],
            verifier: None,
            summary: RunSummary::default(),
        }
    }
}
