//! Resilient command runner.
//!
//! The single recovery point of a generation run: a failed external
//! command either becomes a recorded skip or a fatal abort.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandExecutor, CommandFailure, RecoveryChoice, RecoveryPrompt},
        transaction::TransactionContext,
    },
    domain::CommandSpec,
    error::StacksmithResult,
};

/// How command failures are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryPolicy {
    /// Ask through the [`RecoveryPrompt`] port.
    #[default]
    Prompt,
    /// Always skip the failed step.
    Continue,
    /// Always abort the run.
    Abort,
}

impl fmt::Display for RecoveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prompt => "prompt",
            Self::Continue => "continue",
            Self::Abort => "abort",
        })
    }
}

impl FromStr for RecoveryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "unknown recovery policy '{other}' (expected prompt, continue or abort)"
            )),
        }
    }
}

/// A command the user chose to skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCommand {
    pub command: String,
    pub working_dir: PathBuf,
    pub reason: String,
}

pub struct CommandRunner {
    executor: Arc<dyn CommandExecutor>,
    prompt: Arc<dyn RecoveryPrompt>,
    policy: RecoveryPolicy,
    transaction: Option<Arc<TransactionContext>>,
    skipped: Mutex<Vec<SkippedCommand>>,
}

impl CommandRunner {
    pub fn new(executor: Arc<dyn CommandExecutor>, prompt: Arc<dyn RecoveryPrompt>) -> Self {
        Self {
            executor,
            prompt,
            policy: RecoveryPolicy::Prompt,
            transaction: None,
            skipped: Mutex::new(Vec::new()),
        }
    }

    pub fn with_policy(mut self, policy: RecoveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Report running commands to `transaction`, so an interrupt waits for
    /// them instead of cleaning up underneath a live child.
    pub fn with_transaction(mut self, transaction: Arc<TransactionContext>) -> Self {
        self.transaction = Some(transaction);
        self
    }

    /// Run one external command.
    ///
    /// `Ok(true)` on success, `Ok(false)` when it failed and was skipped.
    /// An abort decision is returned as [`ApplicationError::CommandAborted`],
    /// an interrupt during the command as [`ApplicationError::Interrupted`].
    #[instrument(skip_all, fields(command = %command, cwd = %working_dir.display()))]
    pub fn run(&self, command: &CommandSpec, working_dir: &Path) -> StacksmithResult<bool> {
        info!("running command");
        let result = match &self.transaction {
            Some(tx) => tx.run_command(|| self.executor.execute(command, working_dir))?,
            None => self.executor.execute(command, working_dir),
        };
        let failure = match result {
            Ok(()) => return Ok(true),
            Err(failure) => failure,
        };
        error!(%failure, "command failed");

        match self.decide(command, &failure) {
            RecoveryChoice::Continue => {
                warn!("continuing without this step");
                self.skipped
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(SkippedCommand {
                        command: command.to_string(),
                        working_dir: working_dir.to_path_buf(),
                        reason: failure.to_string(),
                    });
                Ok(false)
            }
            RecoveryChoice::Abort => Err(ApplicationError::CommandAborted {
                command: command.to_string(),
                reason: failure.to_string(),
            }
            .into()),
        }
    }

    fn decide(&self, command: &CommandSpec, failure: &CommandFailure) -> RecoveryChoice {
        match self.policy {
            RecoveryPolicy::Prompt => self.prompt.on_failure(command, failure),
            RecoveryPolicy::Continue => RecoveryChoice::Continue,
            RecoveryPolicy::Abort => RecoveryChoice::Abort,
        }
    }

    /// Drain the commands skipped since the last call.
    pub fn take_skipped(&self) -> Vec<SkippedCommand> {
        std::mem::take(
            &mut *self
                .skipped
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockCommandExecutor, MockFilesystem, MockRecoveryPrompt};
    use crate::error::StacksmithError;

    fn npm_install() -> CommandSpec {
        CommandSpec::new("npm").args(["install", "express"])
    }

    fn failing_executor() -> MockCommandExecutor {
        let mut exec = MockCommandExecutor::new();
        exec.expect_execute()
            .returning(|_, _| Err(CommandFailure::ExitStatus(Some(1))));
        exec
    }

    #[test]
    fn success_does_not_consult_prompt() {
        let mut exec = MockCommandExecutor::new();
        exec.expect_execute().times(1).returning(|_, _| Ok(()));
        let mut prompt = MockRecoveryPrompt::new();
        prompt.expect_on_failure().never();

        let runner = CommandRunner::new(Arc::new(exec), Arc::new(prompt));
        assert!(runner.run(&npm_install(), Path::new("/p/server")).unwrap());
        assert!(runner.take_skipped().is_empty());
    }

    #[test]
    fn continue_records_skip_and_returns_false() {
        let mut prompt = MockRecoveryPrompt::new();
        prompt
            .expect_on_failure()
            .times(1)
            .return_const(RecoveryChoice::Continue);

        let runner = CommandRunner::new(Arc::new(failing_executor()), Arc::new(prompt));
        assert!(!runner.run(&npm_install(), Path::new("/p/server")).unwrap());

        let skipped = runner.take_skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].command, "npm install express");
        assert_eq!(skipped[0].reason, "exited with status 1");
        assert!(runner.take_skipped().is_empty());
    }

    #[test]
    fn abort_is_fatal() {
        let mut prompt = MockRecoveryPrompt::new();
        prompt
            .expect_on_failure()
            .return_const(RecoveryChoice::Abort);

        let runner = CommandRunner::new(Arc::new(failing_executor()), Arc::new(prompt));
        let err = runner
            .run(&npm_install(), Path::new("/p/server"))
            .unwrap_err();
        assert!(matches!(
            err,
            StacksmithError::Application(ApplicationError::CommandAborted { .. })
        ));
    }

    #[test]
    fn spawn_errors_are_recoverable_too() {
        let mut exec = MockCommandExecutor::new();
        exec.expect_execute()
            .returning(|_, _| Err(CommandFailure::Spawn("No such file or directory".into())));

        let runner = CommandRunner::new(Arc::new(exec), Arc::new(MockRecoveryPrompt::new()))
            .with_policy(RecoveryPolicy::Continue);
        assert!(!runner.run(&npm_install(), Path::new("/p")).unwrap());
        assert!(runner.take_skipped()[0].reason.contains("could not start"));
    }

    #[test]
    fn abort_policy_bypasses_prompt() {
        let mut prompt = MockRecoveryPrompt::new();
        prompt.expect_on_failure().never();

        let runner = CommandRunner::new(Arc::new(failing_executor()), Arc::new(prompt))
            .with_policy(RecoveryPolicy::Abort);
        assert!(runner.run(&npm_install(), Path::new("/p")).is_err());
    }

    #[test]
    fn interrupt_during_command_skips_recovery() {
        let tx = Arc::new(TransactionContext::new(Arc::new(MockFilesystem::new())));
        tx.begin(Path::new("/p"));

        let handler = Arc::clone(&tx);
        let mut exec = MockCommandExecutor::new();
        exec.expect_execute().times(1).returning(move |_, _| {
            handler.interrupt();
            Err(CommandFailure::ExitStatus(None))
        });
        let mut prompt = MockRecoveryPrompt::new();
        prompt.expect_on_failure().never();

        let runner = CommandRunner::new(Arc::new(exec), Arc::new(prompt))
            .with_transaction(Arc::clone(&tx));
        let err = runner.run(&npm_install(), Path::new("/p/server")).unwrap_err();

        assert_eq!(err, StacksmithError::Application(ApplicationError::Interrupted));
        assert!(runner.take_skipped().is_empty());
    }

    #[test]
    fn no_command_starts_after_an_interrupt() {
        let tx = Arc::new(TransactionContext::new(Arc::new(MockFilesystem::new())));
        tx.interrupt();
        let mut exec = MockCommandExecutor::new();
        exec.expect_execute().never();

        let runner = CommandRunner::new(Arc::new(exec), Arc::new(MockRecoveryPrompt::new()))
            .with_transaction(tx);
        assert!(runner.run(&npm_install(), Path::new("/p")).is_err());
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Continue".parse::<RecoveryPolicy>().unwrap(), RecoveryPolicy::Continue);
        assert!("retry".parse::<RecoveryPolicy>().is_err());
    }
}
