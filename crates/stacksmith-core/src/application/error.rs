//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during generation orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Project root already exists; generation never touches existing trees.
    #[error("Project directory already exists at {path}")]
    WorkspaceExists { path: PathBuf },

    /// An external command failed and the user (or policy) chose to abort.
    #[error("Command `{command}` failed ({reason}); generation aborted")]
    CommandAborted { command: String, reason: String },

    /// Rollback could not delete the partially generated project.
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// The run was cancelled by a signal.
    #[error("Generation interrupted")]
    Interrupted,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::WorkspaceExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different project name".into(),
            ],
            Self::CommandAborted { command, .. } => vec![
                format!("Run `{command}` manually to see the full output"),
                "Check that the required toolchain (node/npm, python) is on PATH".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("Remove {} manually before retrying", path.display()),
            ],
            Self::Interrupted => vec!["Run the command again to start over".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
            Self::WorkspaceExists { .. } => ErrorCategory::Validation,
            Self::CommandAborted { .. } => ErrorCategory::External,
            Self::Interrupted => ErrorCategory::Cancelled,
        }
    }
}
