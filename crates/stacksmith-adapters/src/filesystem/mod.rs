//! Filesystem adapters.

mod local;
mod memory;
mod tree;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;
pub use tree::project_tree;
