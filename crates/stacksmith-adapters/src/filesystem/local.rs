//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use stacksmith_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{StacksmithError, StacksmithResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir(&self, path: &Path) -> StacksmithResult<()> {
        std::fs::create_dir(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn create_dir_all(&self, path: &Path) -> StacksmithResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directories"))
    }

    fn write_file(&self, path: &Path, content: &str) -> StacksmithResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> StacksmithResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StacksmithError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_refuses_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let dir = tmp.path().join("app");

        fs.create_dir(&dir).unwrap();
        assert!(fs.create_dir(&dir).is_err());
    }

    #[test]
    fn write_file_does_not_create_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();

        let err = fs
            .write_file(&tmp.path().join("missing/file.txt"), "x")
            .unwrap_err();
        assert!(err.to_string().contains("Failed to write file"));
    }

    #[test]
    fn remove_dir_all_deletes_nested_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let root = tmp.path().join("proj");

        fs.create_dir_all(&root.join("server/config")).unwrap();
        fs.write_file(&root.join("server/config/db.js"), "x").unwrap();
        fs.remove_dir_all(&root).unwrap();
        assert!(!fs.exists(&root));
    }
}
