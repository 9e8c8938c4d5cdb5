//! # Errors
//!
//! Failure taxonomy shared by the store, the exporter, the scheduler and the
//! controller. Values are `Clone + PartialEq` so a failure can travel inside
//! an `Action` and be asserted on in tests.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by a `ProjectStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store never answered the readiness probe.
    Unavailable(String),
    /// The named document does not exist (deleted remotely, or never created).
    NotFound(String),
    /// Transport-level failure (DNS, connection refused, reset).
    Network(String),
    /// The store answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body could not be decoded.
    Parse(String),
    /// The call did not finish within the per-operation budget.
    Timeout(Duration),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            StoreError::NotFound(name) => write!(f, "project '{name}' not found"),
            StoreError::Network(msg) => write!(f, "network error: {msg}"),
            StoreError::Api { status, message } => {
                write!(f, "store error (HTTP {status}): {message}")
            }
            StoreError::Parse(msg) => write!(f, "parse error: {msg}"),
            StoreError::Timeout(after) => write!(f, "timed out after {}s", after.as_secs()),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors raised while writing exported variable files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    WorkingDir(String),
    CreateDir { path: PathBuf, reason: String },
    Write { path: PathBuf, reason: String },
    /// The background export task died before reporting.
    Task(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::WorkingDir(reason) => {
                write!(f, "failed to resolve working directory: {reason}")
            }
            ExportError::CreateDir { path, reason } => {
                write!(f, "failed to create {}: {reason}", path.display())
            }
            ExportError::Write { path, reason } => {
                write!(f, "failed to write {}: {reason}", path.display())
            }
            ExportError::Task(reason) => write!(f, "export task failed: {reason}"),
        }
    }
}

impl std::error::Error for ExportError {}

/// Failures as the session sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Startup readiness failed. Fatal: the interactive loop never starts.
    StoreUnavailable(StoreError),
    /// A CRUD call failed while the UI was running. Recoverable.
    OperationFailed {
        operation: &'static str,
        source: StoreError,
    },
    /// Writing a project's file failed. Recoverable, never touches the cache.
    ExportFailed(ExportError),
}

impl AppError {
    pub fn operation(operation: &'static str, source: StoreError) -> Self {
        AppError::OperationFailed { operation, source }
    }

    /// The project vanished between read and write.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::OperationFailed {
                source: StoreError::NotFound(_),
                ..
            }
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::StoreUnavailable(e) => write!(f, "{e}"),
            AppError::OperationFailed { operation, source } => {
                write!(f, "{operation} failed: {source}")
            }
            AppError::ExportFailed(e) => write!(f, "export failed: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::StoreUnavailable(e) => Some(e),
            AppError::OperationFailed { source, .. } => Some(source),
            AppError::ExportFailed(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_an_operation_failure() {
        let err = AppError::operation("update", StoreError::NotFound("web".into()));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "update failed: project 'web' not found");

        let other = AppError::operation("update", StoreError::Network("reset".into()));
        assert!(!other.is_not_found());
    }

    #[test]
    fn test_timeout_display() {
        let err = StoreError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "timed out after 10s");
    }
}
