//! Generation Service - main application orchestrator.
//!
//! This service drives a whole generation run:
//! 1. Validate the request (stack, template, user values) with no side effects
//! 2. Resolve the ordered plan for every step
//! 3. Mark the transaction active and execute the plan under a [`WorkspaceGuard`]
//!
//! Any fatal error after step 1 starts removes the project root. The guard
//! also covers early returns and panics.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{ContentGenerator, Filesystem, RenderContext},
        services::command_runner::{CommandRunner, SkippedCommand},
        transaction::{CleanupOutcome, TransactionContext},
    },
    domain::{
        BackendAction, CommandSpec, ContentKind, DomainError, DomainValidator,
        EnvironmentConfig, GenerationStep, ProjectWorkspace, StackSelection, Toolchain,
        UserConfig, backend_strategy, frontend_strategy,
    },
    error::StacksmithResult,
};

// ── Request / report ──────────────────────────────────────────────────────────

/// Everything a run needs, collected before generation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub project_name: String,
    pub parent_dir: PathBuf,
    pub selection: StackSelection,
    pub user_config: UserConfig,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub workspace: ProjectWorkspace,
    pub skipped_steps: Vec<SkippedCommand>,
    /// Files written by the orchestrator itself, relative to the root.
    pub files_written: Vec<PathBuf>,
}

// ── Plan ──────────────────────────────────────────────────────────────────────

/// One resolved unit of work with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    CreateDir(PathBuf),
    WriteEnvironment {
        path: PathBuf,
        env: EnvironmentConfig,
    },
    WriteFile {
        path: PathBuf,
        content: ContentKind,
    },
    Run {
        label: &'static str,
        command: CommandSpec,
        working_dir: PathBuf,
    },
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir(path) => write!(f, "mkdir   {}", path.display()),
            Self::WriteEnvironment { path, env } => {
                write!(f, "write   {}", path.display())?;
                let keys: Vec<_> = env.keys().collect();
                if !keys.is_empty() {
                    write!(f, " ({})", keys.join(", "))?;
                }
                Ok(())
            }
            Self::WriteFile { path, .. } => write!(f, "write   {}", path.display()),
            Self::Run {
                command,
                working_dir,
                ..
            } => write!(f, "run     {command}  (in {})", working_dir.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: GenerationStep,
    pub actions: Vec<PlannedAction>,
}

/// The complete, ordered generation plan for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub workspace: ProjectWorkspace,
    pub steps: Vec<PlannedStep>,
}

impl GenerationPlan {
    pub fn actions(&self) -> impl Iterator<Item = &PlannedAction> {
        self.steps.iter().flat_map(|s| s.actions.iter())
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.actions().filter_map(|a| match a {
            PlannedAction::Run { command, .. } => Some(command),
            _ => None,
        })
    }
}

// ── Workspace guard ───────────────────────────────────────────────────────────

/// Removes the project root on drop unless [`commit`](Self::commit) ran.
pub struct WorkspaceGuard<'a> {
    filesystem: &'a dyn Filesystem,
    root: PathBuf,
    armed: bool,
}

impl<'a> WorkspaceGuard<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, root: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            root: root.into(),
            armed: true,
        }
    }

    /// Keep the workspace. Disarms the guard.
    pub fn commit(mut self) {
        self.armed = false;
    }

    /// Delete the root now. Safe to call any number of times.
    ///
    /// Returns `Ok(true)` if something was removed.
    pub fn rollback(&mut self) -> Result<bool, ApplicationError> {
        self.armed = false;
        rollback(self.filesystem, &self.root)
    }
}

impl Drop for WorkspaceGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(root = %self.root.display(), "generation did not complete, rolling back");
            // Errors are already logged by `rollback`.
            let _ = self.rollback();
        }
    }
}

/// Idempotent recursive removal of a workspace root.
///
/// An absent root is not an error. Returns `Ok(true)` if something was removed.
pub fn rollback(filesystem: &dyn Filesystem, root: &Path) -> Result<bool, ApplicationError> {
    if !filesystem.exists(root) {
        return Ok(false);
    }
    match filesystem.remove_dir_all(root) {
        Ok(()) => {
            info!(root = %root.display(), "rollback complete");
            Ok(true)
        }
        Err(e) => {
            warn!(root = %root.display(), error = %e, "rollback failed, remove the directory manually");
            Err(ApplicationError::RollbackFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

// ── Service ───────────────────────────────────────────────────────────────────

type ProgressFn = Box<dyn Fn(GenerationStep) + Send + Sync>;

pub struct GenerationService {
    filesystem: Arc<dyn Filesystem>,
    content: Arc<dyn ContentGenerator>,
    runner: CommandRunner,
    transaction: Arc<TransactionContext>,
    toolchain: Toolchain,
    progress: Option<ProgressFn>,
}

impl GenerationService {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        content: Arc<dyn ContentGenerator>,
        runner: CommandRunner,
        transaction: Arc<TransactionContext>,
    ) -> Self {
        Self {
            filesystem,
            content,
            runner: runner.with_transaction(Arc::clone(&transaction)),
            transaction,
            toolchain: Toolchain::default(),
            progress: None,
        }
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Called with each step right before it starts.
    pub fn with_progress(mut self, progress: impl Fn(GenerationStep) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Resolve the full plan without touching the filesystem.
    ///
    /// Runs every pre-generation check, so a plan is only returned for a
    /// request that `generate` would start.
    pub fn plan(&self, request: &GenerationRequest) -> StacksmithResult<GenerationPlan> {
        let selection = &request.selection;
        DomainValidator::validate_request(selection, &request.user_config)?;

        let workspace = ProjectWorkspace::new(&request.parent_dir, &request.project_name)?;
        let strategy = backend_strategy(selection.backend(), selection.database()).ok_or(
            DomainError::TemplateMissing {
                backend: selection.backend(),
                database: selection.database(),
            },
        )?;

        let root = workspace.root();
        let server = workspace.server();

        let create = vec![
            PlannedAction::CreateDir(root.to_path_buf()),
            PlannedAction::CreateDir(workspace.client().to_path_buf()),
            PlannedAction::CreateDir(server.to_path_buf()),
        ];

        let environment = vec![PlannedAction::WriteEnvironment {
            path: root.join(EnvironmentConfig::FILE_NAME),
            env: EnvironmentConfig::from_selection(selection, &request.user_config),
        }];

        let frontend = vec![PlannedAction::Run {
            label: "Generating frontend",
            command: frontend_strategy(selection.frontend()).command(workspace.name()),
            working_dir: workspace.client().to_path_buf(),
        }];

        let backend = strategy
            .plan(selection, &self.toolchain)
            .into_iter()
            .map(|action| match action {
                BackendAction::Run { label, command } => PlannedAction::Run {
                    label,
                    command,
                    working_dir: server.to_path_buf(),
                },
                BackendAction::CreateDir(dir) => PlannedAction::CreateDir(server.join(dir)),
                BackendAction::WriteFile { path, content } => PlannedAction::WriteFile {
                    path: server.join(path),
                    content,
                },
            })
            .collect();

        let documentation = vec![PlannedAction::WriteFile {
            path: root.join("README.md"),
            content: ContentKind::ProjectReadme,
        }];

        let steps = [create, environment, frontend, backend, documentation]
            .into_iter()
            .zip(GenerationStep::ALL.iter().copied())
            .map(|(actions, step)| PlannedStep { step, actions })
            .collect();

        Ok(GenerationPlan { workspace, steps })
    }

    /// Generate a project.
    ///
    /// All-or-nothing: on any fatal error the project root is removed before
    /// the error is returned.
    #[instrument(
        skip_all,
        fields(
            project = %request.project_name,
            stack = %request.selection,
        )
    )]
    pub fn generate(&self, request: &GenerationRequest) -> StacksmithResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!("generation", %run_id);
        let _enter = span.enter();

        let plan = self.plan(request)?;
        let root = plan.workspace.root().to_path_buf();

        if self.filesystem.exists(&root) {
            return Err(ApplicationError::WorkspaceExists { path: root }.into());
        }

        info!(root = %root.display(), "starting generation");
        self.transaction.begin(&root);
        let mut guard = WorkspaceGuard::new(self.filesystem.as_ref(), &root);

        let context = RenderContext {
            project_name: request.project_name.clone(),
            selection: request.selection,
            toolchain: self.toolchain.clone(),
        };

        match self
            .execute(&plan, &context)
            .and_then(|files| self.transaction.commit().map(|()| files))
        {
            Ok(files_written) => {
                guard.commit();
                let skipped_steps = self.runner.take_skipped();
                info!(
                    files = files_written.len(),
                    skipped = skipped_steps.len(),
                    "generation complete"
                );
                Ok(GenerationReport {
                    run_id,
                    workspace: plan.workspace,
                    skipped_steps,
                    files_written,
                })
            }
            Err(e) => {
                warn!(error = %e, "generation failed");
                for skipped in self.runner.take_skipped() {
                    warn!(
                        command = %skipped.command,
                        cwd = %skipped.working_dir.display(),
                        reason = %skipped.reason,
                        "step was skipped before the failure"
                    );
                }
                let removed = guard.rollback();
                self.transaction
                    .record_cleanup(CleanupOutcome::from_rollback(&root, &removed));
                // A failed rollback replaces the original error so the user
                // learns a directory was left behind.
                removed?;
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        plan: &GenerationPlan,
        context: &RenderContext,
    ) -> StacksmithResult<Vec<PathBuf>> {
        let root = plan.workspace.root();
        let mut files_written = Vec::new();

        for planned in &plan.steps {
            let span = info_span!("step", step = %planned.step);
            let _enter = span.enter();
            if let Some(progress) = &self.progress {
                progress(planned.step);
            }

            for action in &planned.actions {
                match action {
                    PlannedAction::CreateDir(path) => self
                        .transaction
                        .mutate(|| self.filesystem.create_dir(path))?,
                    PlannedAction::WriteEnvironment { path, env } => {
                        self.transaction
                            .mutate(|| self.filesystem.write_file(path, &env.render()))?;
                        files_written.push(relative_to(root, path));
                    }
                    PlannedAction::WriteFile { path, content } => {
                        let body = self.content.render(*content, context);
                        self.transaction
                            .mutate(|| self.filesystem.write_file(path, &body))?;
                        files_written.push(relative_to(root, path));
                    }
                    PlannedAction::Run {
                        label,
                        command,
                        working_dir,
                    } => {
                        info!(label, "external step");
                        self.runner.run(command, working_dir)?;
                    }
                }
            }
        }

        Ok(files_written)
    }
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
