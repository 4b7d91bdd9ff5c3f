//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! high-level use case: "generate this stack into a new directory".

pub mod command_runner;
pub mod generation_service;

pub use command_runner::{CommandRunner, RecoveryPolicy, SkippedCommand};
pub use generation_service::{
    GenerationPlan, GenerationReport, GenerationRequest, GenerationService, PlannedAction,
    PlannedStep, WorkspaceGuard, rollback,
};
