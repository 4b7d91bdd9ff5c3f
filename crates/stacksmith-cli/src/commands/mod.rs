//! Subcommand handlers. Each module exposes one `execute` entry point.

pub mod check;
pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod new;
