//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stacksmith-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: Directory and file operations
//!   - `CommandExecutor`: External processes
//!   - `ContentGenerator`: Generated file bodies
//!   - `RecoveryPrompt`: Continue/abort decision after a failed command

pub mod output;

pub use output::{
    CommandExecutor, CommandFailure, ContentGenerator, Filesystem, RecoveryChoice,
    RecoveryPrompt, RenderContext,
};

#[cfg(test)]
pub use output::{MockCommandExecutor, MockContentGenerator, MockFilesystem, MockRecoveryPrompt};
