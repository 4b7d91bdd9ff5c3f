//! Application layer for Stacksmith.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationService, CommandRunner)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Transaction**: State shared with the interrupt handler
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;
pub mod transaction;

pub use services::{
    CommandRunner, GenerationPlan, GenerationReport, GenerationRequest, GenerationService,
    PlannedAction, PlannedStep, RecoveryPolicy, SkippedCommand, WorkspaceGuard, rollback,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    CommandExecutor, CommandFailure, ContentGenerator, Filesystem, RecoveryChoice,
    RecoveryPrompt, RenderContext,
};

pub use error::ApplicationError;
pub use transaction::{CleanupOutcome, TransactionContext};
