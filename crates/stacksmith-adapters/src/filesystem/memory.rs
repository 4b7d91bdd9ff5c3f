//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use stacksmith_core::{
    application::{ApplicationError, ports::Filesystem},
    error::StacksmithResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle while the
/// service owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    deny_removal: bool,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filesystem where `dir` (and its ancestors) already exist.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let fs = Self::new();
        fs.write().insert_ancestors(dir.as_ref());
        fs
    }

    /// Make every `remove_dir_all` fail (for rollback failure paths).
    pub fn deny_removal(&self, deny: bool) {
        self.write().deny_removal = deny;
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read().files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    /// List all directories, sorted.
    pub fn list_dirs(&self) -> Vec<PathBuf> {
        self.read().directories.iter().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryFilesystemInner {
    fn insert_ancestors(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                self.directories.contains(parent) || parent.parent().is_none()
            }
            _ => true,
        }
    }
}

fn fs_error(path: &Path, reason: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir(&self, path: &Path) -> StacksmithResult<()> {
        let mut inner = self.write();
        if inner.directories.contains(path) || inner.files.contains_key(path) {
            return Err(fs_error(path, "Already exists").into());
        }
        if !inner.parent_exists(path) {
            return Err(fs_error(path, "Parent directory does not exist").into());
        }
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> StacksmithResult<()> {
        self.write().insert_ancestors(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> StacksmithResult<()> {
        let mut inner = self.write();
        if !inner.parent_exists(path) {
            return Err(fs_error(path, "Parent directory does not exist").into());
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn remove_dir_all(&self, path: &Path) -> StacksmithResult<()> {
        let mut inner = self.write();
        if inner.deny_removal {
            return Err(fs_error(path, "Permission denied").into());
        }
        if !inner.directories.contains(path) {
            return Err(fs_error(path, "No such directory").into());
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_requires_parent_and_rejects_duplicates() {
        let fs = MemoryFilesystem::with_dir("/work");
        assert!(fs.create_dir(Path::new("/work/app/client")).is_err());

        fs.create_dir(Path::new("/work/app")).unwrap();
        assert!(fs.create_dir(Path::new("/work/app")).is_err());
        fs.create_dir(Path::new("/work/app/client")).unwrap();
    }

    #[test]
    fn remove_dir_all_removes_nested_entries_only() {
        let fs = MemoryFilesystem::with_dir("/work/app/server/config");
        fs.create_dir_all(Path::new("/work/other")).unwrap();
        fs.write_file(Path::new("/work/app/server/config/db.js"), "x")
            .unwrap();
        fs.write_file(Path::new("/work/other/keep.txt"), "y").unwrap();

        fs.remove_dir_all(Path::new("/work/app")).unwrap();

        assert!(!fs.exists(Path::new("/work/app")));
        assert!(!fs.exists(Path::new("/work/app/server/config")));
        assert_eq!(fs.list_files(), vec![PathBuf::from("/work/other/keep.txt")]);
    }

    #[test]
    fn denied_removal_leaves_tree_intact() {
        let fs = MemoryFilesystem::with_dir("/work/app");
        fs.deny_removal(true);
        assert!(fs.remove_dir_all(Path::new("/work/app")).is_err());
        assert!(fs.exists(Path::new("/work/app")));
    }
}
