use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::error::DomainError;

/// On-disk layout of a generated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectWorkspace {
    name: String,
    root: PathBuf,
    client: PathBuf,
    server: PathBuf,
}

impl ProjectWorkspace {
    pub const CLIENT_DIR: &'static str = "client";
    pub const SERVER_DIR: &'static str = "server";

    /// Lay out a workspace named `name` directly under `parent`.
    ///
    /// The name is used literally as the root directory name, so it must
    /// be a single path component.
    pub fn new(parent: impl AsRef<Path>, name: &str) -> Result<Self, DomainError> {
        validate_project_name(name)?;
        let root = parent.as_ref().join(name);
        Ok(Self {
            name: name.to_string(),
            client: root.join(Self::CLIENT_DIR),
            server: root.join(Self::SERVER_DIR),
            root,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    pub fn client(&self) -> &Path {
        &self.client
    }
    pub fn server(&self) -> &Path {
        &self.server
    }
}

/// A project name must be one non-empty path component.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.trim().is_empty() {
        "Required"
    } else if name != name.trim() {
        "must not start or end with whitespace"
    } else if name == "." || name == ".." {
        "must not be '.' or '..'"
    } else if name.contains(['/', '\\']) {
        "must not contain path separators"
    } else {
        return Ok(());
    };
    Err(DomainError::InvalidUserConfig {
        field: "project_name",
        reason: reason.into(),
    })
}

// ── Generation steps ──────────────────────────────────────────────────────────

/// The fixed, ordered phases of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationStep {
    CreateWorkspace,
    WriteEnvironment,
    Frontend,
    Backend,
    Documentation,
}

impl GenerationStep {
    pub const ALL: &'static [GenerationStep] = &[
        Self::CreateWorkspace,
        Self::WriteEnvironment,
        Self::Frontend,
        Self::Backend,
        Self::Documentation,
    ];

    /// 1-based position in the run.
    pub fn position(&self) -> usize {
        *self as usize + 1
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreateWorkspace => "Creating project directory",
            Self::WriteEnvironment => "Configuring environment",
            Self::Frontend => "Setting up frontend",
            Self::Backend => "Setting up backend",
            Self::Documentation => "Writing README",
        }
    }
}

impl fmt::Display for GenerationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {}",
            self.position(),
            Self::ALL.len(),
            self.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_paths_hang_off_root() {
        let ws = ProjectWorkspace::new("/tmp/parent", "shop").unwrap();
        assert_eq!(ws.root(), Path::new("/tmp/parent/shop"));
        assert_eq!(ws.client(), Path::new("/tmp/parent/shop/client"));
        assert_eq!(ws.server(), Path::new("/tmp/parent/shop/server"));
    }

    #[test]
    fn rejects_names_that_are_not_single_components() {
        for bad in ["", "  ", "..", "a/b", "a\\b", " padded"] {
            assert!(validate_project_name(bad).is_err(), "{bad:?} accepted");
        }
        assert!(validate_project_name("my-app_2").is_ok());
    }

    #[test]
    fn steps_are_numbered_in_order() {
        let rendered: Vec<_> = GenerationStep::ALL.iter().map(|s| s.position()).collect();
        assert_eq!(rendered, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            GenerationStep::Backend.to_string(),
            "[4/5] Setting up backend"
        );
    }
}
