//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stacksmith-adapters` crate provides implementations; the CLI
//! provides the interactive [`RecoveryPrompt`].

use std::fmt;
use std::path::Path;

use crate::domain::{CommandSpec, ContentKind, StackSelection, Toolchain};
use crate::error::StacksmithResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stacksmith_adapters::filesystem::LocalFilesystem` (production)
/// - `stacksmith_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a single directory. Fails if it already exists.
    fn create_dir(&self, path: &Path) -> StacksmithResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StacksmithResult<()>;

    /// Write content to a file in one call, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> StacksmithResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StacksmithResult<()>;
}

/// Why an external command did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandFailure {
    /// The process could not be started at all.
    Spawn(String),
    /// The process ran and exited unsuccessfully. `None` when killed by a signal.
    ExitStatus(Option<i32>),
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(reason) => write!(f, "could not start: {reason}"),
            Self::ExitStatus(Some(code)) => write!(f, "exited with status {code}"),
            Self::ExitStatus(None) => f.write_str("terminated by signal"),
        }
    }
}

/// Port for running external generators and package managers.
///
/// Implementations block until the child exits and let it share the
/// terminal (inherited stdio).
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: &CommandSpec, working_dir: &Path) -> Result<(), CommandFailure>;
}

/// Decision after a command failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryChoice {
    /// Skip the failed step and keep generating.
    Continue,
    /// Stop and roll back.
    Abort,
}

/// Port asking what to do when a command fails.
#[cfg_attr(test, mockall::automock)]
pub trait RecoveryPrompt: Send + Sync {
    fn on_failure(&self, command: &CommandSpec, failure: &CommandFailure) -> RecoveryChoice;
}

/// Inputs available to content generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub project_name: String,
    pub selection: StackSelection,
    /// Host conventions for instructions printed into generated docs.
    pub toolchain: Toolchain,
}

/// Port producing the full body of each generated file.
#[cfg_attr(test, mockall::automock)]
pub trait ContentGenerator: Send + Sync {
    fn render(&self, kind: ContentKind, context: &RenderContext) -> String;
}
