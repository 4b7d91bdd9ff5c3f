// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::compatibility::Violation;
use crate::domain::value_objects::{Backend, Database, Dimension};

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (re-prompt loops keep the last error around)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("unknown {dimension} '{value}'")]
    InvalidValue { dimension: Dimension, value: String },

    #[error("invalid {field}: {reason}")]
    InvalidUserConfig { field: &'static str, reason: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    #[error("incompatible stack: {}", join_messages(.violations))]
    IncompatibleStack { violations: Vec<Violation> },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("no generation template registered for {backend} + {database}")]
    TemplateMissing { backend: Backend, database: Database },
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidValue { dimension, .. } => vec![
                format!("Pick a supported {dimension}"),
                "Try: stacksmith list".into(),
            ],
            Self::IncompatibleStack { violations } => {
                let mut out: Vec<String> = violations
                    .iter()
                    .map(|v| format!("  • {}", v.message))
                    .collect();
                out.push("Try: stacksmith list --matrix".into());
                out
            }
            Self::TemplateMissing { backend, database } => vec![
                format!("{backend} has no generation strategy for {database}"),
                "Nothing was written to disk".into(),
                "Please report this issue; validated stacks should always resolve".into(),
            ],
            Self::InvalidUserConfig { field, reason } => vec![
                format!("Fix the {field}: {reason}"),
            ],
            Self::MissingRequiredField { field } => vec![
                format!("Provide a value for {field}"),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidValue { .. }
            | Self::InvalidUserConfig { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::IncompatibleStack { .. } => ErrorCategory::Compatibility,
            Self::TemplateMissing { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
