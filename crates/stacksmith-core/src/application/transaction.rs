//! Shared state between the generation run and the interrupt handler.
//!
//! One `TransactionContext` is created per process and handed (behind an
//! `Arc`) to both the [`GenerationService`](super::GenerationService) and
//! the signal thread. The orchestrator marks it active right before the
//! first mutation and performs every mutation through [`TransactionContext::mutate`]
//! or [`TransactionContext::run_command`]; the signal thread calls
//! [`TransactionContext::interrupt`].
//!
//! The step lock serialises the two threads. While an external command is
//! running the lock is released, and an interrupt only marks the run: the
//! orchestrator rolls back once the child has returned, so nothing the
//! child writes late survives the cleanup.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::application::{ApplicationError, ports::Filesystem};
use crate::error::StacksmithResult;

/// What a cleanup did (or, for `Deferred`, who will do it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Generation had not begun; nothing to clean.
    NotStarted,
    /// An external command is still running; the orchestrator removes the
    /// root after it returns.
    Deferred(PathBuf),
    /// The partially generated project was deleted.
    RolledBack(PathBuf),
    /// Generation was active but the root did not exist (yet or any more).
    NothingToRemove(PathBuf),
    /// Deletion failed. Reported, never retried.
    CleanupFailed { path: PathBuf, reason: String },
}

impl CleanupOutcome {
    /// Map the result of a [`rollback`](super::rollback) call.
    pub fn from_rollback(root: &Path, result: &Result<bool, ApplicationError>) -> Self {
        match result {
            Ok(true) => Self::RolledBack(root.to_path_buf()),
            Ok(false) => Self::NothingToRemove(root.to_path_buf()),
            Err(e) => Self::CleanupFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Default)]
struct Step {
    command_running: bool,
}

pub struct TransactionContext {
    filesystem: Arc<dyn Filesystem>,
    active: AtomicBool,
    interrupted: AtomicBool,
    workspace: Mutex<Option<PathBuf>>,
    step: Mutex<Step>,
    cleanup: Mutex<Option<CleanupOutcome>>,
}

impl TransactionContext {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            active: AtomicBool::new(false),
            interrupted: AtomicBool::new(false),
            workspace: Mutex::new(None),
            step: Mutex::new(Step::default()),
            cleanup: Mutex::new(None),
        }
    }

    /// Record the workspace root and mark generation in flight.
    pub fn begin(&self, root: &Path) {
        *self
            .workspace
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(root.to_path_buf());
        self.active.store(true, Ordering::SeqCst);
        debug!(root = %root.display(), "transaction started");
    }

    /// Mark generation finished. A later interrupt leaves the project alone.
    pub fn commit(&self) -> StacksmithResult<()> {
        let _step = self.lock_step();
        self.ensure_not_interrupted()?;
        self.active.store(false, Ordering::SeqCst);
        debug!("transaction committed");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    pub fn workspace(&self) -> Option<PathBuf> {
        self.workspace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run one filesystem mutation under the step lock.
    ///
    /// Refuses to start once an interrupt was requested.
    pub fn mutate<T>(&self, f: impl FnOnce() -> StacksmithResult<T>) -> StacksmithResult<T> {
        let _step = self.lock_step();
        self.ensure_not_interrupted()?;
        f()
    }

    /// Run an external command without holding the step lock.
    ///
    /// Returns [`ApplicationError::Interrupted`] if an interrupt arrived
    /// before the command started or while it ran; the command's own
    /// result is discarded in the latter case.
    pub fn run_command<T>(&self, f: impl FnOnce() -> T) -> StacksmithResult<T> {
        {
            let mut step = self.lock_step();
            self.ensure_not_interrupted()?;
            step.command_running = true;
        }

        let result = f();

        let mut step = self.lock_step();
        step.command_running = false;
        if self.is_interrupted() {
            info!("command returned after an interrupt");
            return Err(ApplicationError::Interrupted.into());
        }
        Ok(result)
    }

    /// Handle an external interrupt.
    ///
    /// Removes the workspace right away unless a command is running, in
    /// which case the removal is left to the orchestrator. Swallows
    /// deletion errors; the caller only reports the outcome.
    pub fn interrupt(&self) -> CleanupOutcome {
        let step = self.lock_step();
        self.interrupted.store(true, Ordering::SeqCst);

        if !self.is_active() {
            return CleanupOutcome::NotStarted;
        }
        let Some(root) = self.workspace() else {
            return CleanupOutcome::NotStarted;
        };
        if step.command_running {
            debug!(root = %root.display(), "interrupt deferred until the command returns");
            return CleanupOutcome::Deferred(root);
        }

        // `rollback` logs its own failure.
        let result = super::rollback(self.filesystem.as_ref(), &root);
        let outcome = CleanupOutcome::from_rollback(&root, &result);
        self.record_cleanup(outcome.clone());
        outcome
    }

    /// Remember the first cleanup performed for this run.
    pub fn record_cleanup(&self, outcome: CleanupOutcome) {
        self.cleanup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(outcome);
    }

    /// What the rollback of this run did, if one happened.
    pub fn cleanup(&self) -> Option<CleanupOutcome> {
        self.cleanup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn ensure_not_interrupted(&self) -> StacksmithResult<()> {
        if self.is_interrupted() {
            return Err(ApplicationError::Interrupted.into());
        }
        Ok(())
    }

    fn lock_step(&self) -> MutexGuard<'_, Step> {
        self.step.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::error::StacksmithError;

    #[test]
    fn interrupt_before_begin_does_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        fs.expect_remove_dir_all().never();

        let ctx = TransactionContext::new(Arc::new(fs));
        assert_eq!(ctx.interrupt(), CleanupOutcome::NotStarted);
        assert!(ctx.is_interrupted());
        assert_eq!(ctx.cleanup(), None);
    }

    #[test]
    fn interrupt_removes_active_workspace() {
        let root = PathBuf::from("/work/shop");
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new("/work/shop"))
            .return_const(true);
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new("/work/shop"))
            .times(1)
            .returning(|_| Ok(()));

        let ctx = TransactionContext::new(Arc::new(fs));
        ctx.begin(&root);
        assert_eq!(ctx.interrupt(), CleanupOutcome::RolledBack(root.clone()));
        assert_eq!(ctx.cleanup(), Some(CleanupOutcome::RolledBack(root)));
    }

    #[test]
    fn interrupt_swallows_cleanup_errors() {
        let root = PathBuf::from("/work/locked");
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_remove_dir_all().returning(|p| {
            Err(ApplicationError::FilesystemError {
                path: p.to_path_buf(),
                reason: "permission denied".into(),
            }
            .into())
        });

        let ctx = TransactionContext::new(Arc::new(fs));
        ctx.begin(&root);
        assert!(matches!(
            ctx.interrupt(),
            CleanupOutcome::CleanupFailed { ref path, .. } if *path == root
        ));
    }

    #[test]
    fn interrupt_with_missing_root_reports_nothing_removed() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_remove_dir_all().never();

        let ctx = TransactionContext::new(Arc::new(fs));
        ctx.begin(Path::new("/work/gone"));
        assert_eq!(
            ctx.interrupt(),
            CleanupOutcome::NothingToRemove(PathBuf::from("/work/gone"))
        );
    }

    #[test]
    fn interrupt_during_command_leaves_removal_to_the_run() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        fs.expect_remove_dir_all().never();

        let ctx = Arc::new(TransactionContext::new(Arc::new(fs)));
        ctx.begin(Path::new("/work/shop"));

        let handler = Arc::clone(&ctx);
        let result = ctx.run_command(|| handler.interrupt());

        assert_eq!(
            result,
            Err(StacksmithError::Application(ApplicationError::Interrupted))
        );
        assert!(ctx.is_interrupted());
        assert_eq!(ctx.cleanup(), None);
    }

    #[test]
    fn deferred_outcome_names_the_root() {
        let ctx = Arc::new(TransactionContext::new(Arc::new(MockFilesystem::new())));
        ctx.begin(Path::new("/work/shop"));

        let handler = Arc::clone(&ctx);
        let mut outcome = None;
        let _ = ctx.run_command(|| outcome = Some(handler.interrupt()));
        assert_eq!(
            outcome,
            Some(CleanupOutcome::Deferred(PathBuf::from("/work/shop")))
        );

        let mut started = false;
        assert!(ctx.run_command(|| started = true).is_err());
        assert!(!started);
    }

    #[test]
    fn mutations_stop_after_an_interrupt() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);

        let ctx = TransactionContext::new(Arc::new(fs));
        ctx.begin(Path::new("/work/shop"));
        assert_eq!(ctx.mutate(|| Ok(1)), Ok(1));

        ctx.interrupt();
        let mut ran = false;
        assert!(ctx.mutate(|| {
            ran = true;
            Ok(())
        })
        .is_err());
        assert!(!ran);
    }

    #[test]
    fn interrupt_after_commit_keeps_the_project() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        fs.expect_remove_dir_all().never();

        let ctx = TransactionContext::new(Arc::new(fs));
        ctx.begin(Path::new("/work/shop"));
        ctx.commit().unwrap();
        assert_eq!(ctx.interrupt(), CleanupOutcome::NotStarted);
    }

    #[test]
    fn first_recorded_cleanup_wins() {
        let ctx = TransactionContext::new(Arc::new(MockFilesystem::new()));
        ctx.record_cleanup(CleanupOutcome::RolledBack(PathBuf::from("/w")));
        ctx.record_cleanup(CleanupOutcome::NothingToRemove(PathBuf::from("/w")));
        assert_eq!(ctx.cleanup(), Some(CleanupOutcome::RolledBack(PathBuf::from("/w"))));
    }
}
