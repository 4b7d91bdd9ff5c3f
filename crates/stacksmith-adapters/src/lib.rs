//! Infrastructure adapters for Stacksmith.
//!
//! This crate implements the ports defined in `stacksmith-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod content;
pub mod filesystem;
pub mod process;

// Re-export commonly used adapters
pub use content::BuiltinContent;
pub use filesystem::{LocalFilesystem, MemoryFilesystem, project_tree};
pub use process::SystemExecutor;
