//! Directory listing for the post-generation summary.

use std::path::Path;

use stacksmith_core::error::{Context, StacksmithResult};
use walkdir::{DirEntry, WalkDir};

/// Directories produced by package managers; listing them is noise.
const SKIPPED: &[&str] = &["node_modules", "venv", ".git", "__pycache__", ".next", ".svelte-kit"];

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED.contains(&name))
}

/// List `root` as indented lines, directories first, up to `max_depth`.
///
/// Paths use forward slashes. Directories end with `/`.
pub fn project_tree(root: &Path, max_depth: usize) -> StacksmithResult<Vec<String>> {
    let mut lines = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by(|a, b| {
            b.file_type()
                .is_dir()
                .cmp(&a.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|e| !is_skipped(e));

    for entry in walker {
        let entry = entry.context("directory walk error")?;
        let name = entry.file_name().to_string_lossy().replace('\\', "/");
        let indent = "  ".repeat(entry.depth() - 1);
        if entry.file_type().is_dir() {
            lines.push(format!("{indent}{name}/"));
        } else {
            lines.push(format!("{indent}{name}"));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_directories_first_and_skips_installed_packages() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("server/node_modules/express")).unwrap();
        fs::create_dir_all(root.join("client")).unwrap();
        fs::write(root.join("README.md"), "# x").unwrap();
        fs::write(root.join("server/server.js"), "").unwrap();

        let lines = project_tree(root, 3).unwrap();
        assert_eq!(
            lines,
            vec!["client/", "server/", "  server.js", "README.md"]
        );
    }
}
