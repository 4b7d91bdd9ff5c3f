//! External process adapter.

use std::path::Path;
use std::process::{Command, Stdio};

use stacksmith_core::{
    application::ports::{CommandExecutor, CommandFailure},
    domain::CommandSpec,
};
use tracing::debug;

/// Runs commands with `std::process::Command`, sharing the terminal.
///
/// On Windows, npm/npx are `.cmd` shims that `CreateProcess` cannot start
/// directly, so those programs go through `cmd /C`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }

    fn build(command: &CommandSpec) -> Command {
        if cfg!(windows) && matches!(command.program(), "npm" | "npx") {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command.program()).args(command.arguments());
            cmd
        } else {
            let mut cmd = Command::new(command.program());
            cmd.args(command.arguments());
            cmd
        }
    }
}

impl CommandExecutor for SystemExecutor {
    fn execute(&self, command: &CommandSpec, working_dir: &Path) -> Result<(), CommandFailure> {
        debug!(%command, cwd = %working_dir.display(), "spawning");
        let status = Self::build(command)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| CommandFailure::Spawn(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandFailure::ExitStatus(status.code()))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn reports_exit_status() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = SystemExecutor::new();

        exec.execute(&CommandSpec::new("true"), tmp.path()).unwrap();
        assert_eq!(
            exec.execute(&CommandSpec::new("sh").args(["-c", "exit 3"]), tmp.path()),
            Err(CommandFailure::ExitStatus(Some(3)))
        );
    }

    #[test]
    fn runs_in_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        SystemExecutor::new()
            .execute(&CommandSpec::new("touch").arg("marker"), tmp.path())
            .unwrap();
        assert!(tmp.path().join("marker").exists());
    }

    #[test]
    fn missing_program_is_a_spawn_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let result = SystemExecutor::new().execute(
            &CommandSpec::new("stacksmith-definitely-not-installed"),
            tmp.path(),
        );
        assert!(matches!(result, Err(CommandFailure::Spawn(_))));
    }
}
