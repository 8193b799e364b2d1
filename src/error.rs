//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the geodupe application.
///
/// - 0: Success (run completed, duplicates were selected)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found within the tolerances
/// - 3: Aborted before any work (no selection, or a tolerance prompt was cancelled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: duplicates were found and selected.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: the run completed without finding any.
    NoDuplicates = 2,
    /// Aborted: required input was missing.
    Aborted = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "GD000",
            Self::GeneralError => "GD001",
            Self::NoDuplicates => "GD002",
            Self::Aborted => "GD003",
        }
    }

    /// Exit code for a failed run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<DedupError>() {
            Some(e) if e.is_missing_input() => Self::Aborted,
            _ => Self::GeneralError,
        }
    }
}

/// Errors raised by the deduplication run before any geometry is processed.
///
/// Once the engine starts nothing fails: unresolvable objects are dropped and
/// incomparable pairs are treated as distinct.
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    /// The object source returned an empty selection.
    #[error("No objects selected.")]
    NoSelection,

    /// A tolerance prompt was cancelled.
    #[error("No {0} tolerance provided.")]
    Cancelled(&'static str),

    /// A tolerance value is outside its permitted range.
    #[error("Invalid {name} tolerance: {value}")]
    InvalidTolerance {
        /// Which tolerance was rejected
        name: &'static str,
        /// The rejected value
        value: f64,
    },
}

impl DedupError {
    /// True for the "missing input" class of aborts.
    #[must_use]
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::NoSelection | Self::Cancelled(_))
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "GD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the run was aborted for missing input
    pub aborted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            aborted: exit_code == ExitCode::Aborted,
        }
    }
}
