pub mod environment;
pub mod stack;
pub mod workspace;

pub use environment::*;
pub use stack::*;
pub use workspace::*;
