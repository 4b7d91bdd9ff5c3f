//! Interactive prompts.
//!
//! Every text prompt validates with the same pure validators the core uses,
//! so a value that leaves a prompt is already well-formed. A dismissed
//! prompt becomes [`CliError::Cancelled`].
//!
//! Without the `interactive` feature every prompt fails with
//! [`CliError::FeatureNotAvailable`] and command failures abort.

use std::path::Path;

use stacksmith_core::{
    application::{CommandFailure, RecoveryChoice, RecoveryPrompt},
    domain::{Auth, Backend, CommandSpec, Database, Frontend},
};

use crate::error::{CliError, CliResult};

/// What to do with an existing project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Overwrite,
    Rename,
    Exit,
}

#[cfg(feature = "interactive")]
pub use terminal::{Prompter, TerminalRecovery};

#[cfg(not(feature = "interactive"))]
pub use unavailable::{Prompter, TerminalRecovery};

#[cfg(feature = "interactive")]
mod terminal {
    use super::*;

    use std::io;

    use console::Term;
    use dialoguer::{Input, Password, Select, theme::ColorfulTheme};
    use owo_colors::OwoColorize;

    use stacksmith_core::domain::{
        Violation, compatible_auths, compatible_databases, validate, validate_connection_string,
        validate_database, validate_project_name, validate_required,
    };

    pub struct Prompter {
        theme: ColorfulTheme,
    }

    impl Prompter {
        pub fn new() -> Self {
            Self {
                theme: ColorfulTheme::default(),
            }
        }

        pub fn project_name(&self) -> CliResult<String> {
            Input::<String>::with_theme(&self.theme)
                .with_prompt("Project name")
                .validate_with(|input: &String| -> Result<(), String> {
                    validate_project_name(input).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_error)
        }

        pub fn frontend(&self, default: Option<Frontend>) -> CliResult<Frontend> {
            let labels = Frontend::ALL.iter().map(ToString::to_string).collect();
            self.choose("Frontend", Frontend::ALL, labels, default)
        }

        pub fn backend(&self, default: Option<Backend>) -> CliResult<Backend> {
            let labels = Backend::ALL.iter().map(ToString::to_string).collect();
            self.choose("Backend", Backend::ALL, labels, default)
        }

        /// Ask until the database fits the backend. Auth is not asked here.
        pub fn database(&self, backend: Backend, default: Option<Database>) -> CliResult<Database> {
            let supported = compatible_databases(backend);
            let labels: Vec<String> = Database::ALL
                .iter()
                .map(|db| annotate(db, supported.contains(db), backend))
                .collect();
            loop {
                let database = self.choose("Database", Database::ALL, labels.clone(), default)?;
                let violations = validate_database(backend, database);
                if violations.is_empty() {
                    return Ok(database);
                }
                report(&violations);
            }
        }

        /// Ask until the full stack is valid, keeping backend and database.
        pub fn auth(
            &self,
            backend: Backend,
            database: Database,
            default: Option<Auth>,
        ) -> CliResult<Auth> {
            let supported = compatible_auths(backend, database);
            let labels: Vec<String> = Auth::ALL
                .iter()
                .map(|auth| annotate(auth, supported.contains(auth), database))
                .collect();
            loop {
                let auth = self.choose("Authentication", Auth::ALL, labels.clone(), default)?;
                let violations = validate(backend, database, auth);
                if violations.is_empty() {
                    return Ok(auth);
                }
                report(&violations);
            }
        }

        pub fn connection_string(&self, database: Database) -> CliResult<String> {
            let prompt = format!(
                "{database} connection string ({})",
                database.connection_prefixes().join(" or ")
            );
            Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .validate_with(move |input: &String| -> Result<(), String> {
                    validate_connection_string(database, input).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_error)
        }

        pub fn firebase_project(&self) -> CliResult<String> {
            Input::<String>::with_theme(&self.theme)
                .with_prompt("Firebase project id")
                .validate_with(|input: &String| -> Result<(), String> {
                    validate_required("firebase_project", input).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_error)
        }

        pub fn jwt_secret(&self) -> CliResult<String> {
            loop {
                let secret = Password::with_theme(&self.theme)
                    .with_prompt("JWT secret")
                    .interact()
                    .map_err(prompt_error)?;
                match validate_required("jwt_secret", &secret) {
                    Ok(()) => return Ok(secret),
                    Err(e) => report_line(&e.to_string()),
                }
            }
        }

        pub fn collision(&self, path: &Path) -> CliResult<super::Collision> {
            use super::Collision;

            let choices = [Collision::Overwrite, Collision::Rename, Collision::Exit];
            let labels = vec![
                "Overwrite (delete the existing directory)".to_string(),
                "Choose another name".to_string(),
                "Exit".to_string(),
            ];
            let prompt = format!("{} already exists", path.display());
            self.choose(&prompt, &choices, labels, Some(Collision::Rename))
        }

        fn choose<T: Copy + PartialEq>(
            &self,
            prompt: &str,
            items: &[T],
            labels: Vec<String>,
            default: Option<T>,
        ) -> CliResult<T> {
            let preselected = default
                .and_then(|d| items.iter().position(|&item| item == d))
                .unwrap_or(0);
            let index = Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(&labels)
                .default(preselected)
                .interact_opt()
                .map_err(prompt_error)?
                .ok_or(CliError::Cancelled)?;
            items.get(index).copied().ok_or(CliError::Cancelled)
        }
    }

    fn annotate(item: &impl std::fmt::Display, supported: bool, with: impl std::fmt::Display) -> String {
        if supported {
            item.to_string()
        } else {
            format!("{item}  (not compatible with {with})")
        }
    }

    fn report(violations: &[Violation]) {
        for violation in violations {
            report_line(&violation.message);
        }
    }

    fn report_line(message: &str) {
        let _ = Term::stderr().write_line(&format!("  {} {}", "\u{2717}".red(), message));
    }

    fn prompt_error(err: dialoguer::Error) -> CliError {
        match err {
            dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => CliError::Cancelled,
            dialoguer::Error::IO(e) => CliError::IoError {
                message: "prompt failed".into(),
                source: e,
            },
        }
    }

    /// Asks on the terminal whether to skip or abort after a failed command.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TerminalRecovery;

    impl RecoveryPrompt for TerminalRecovery {
        fn on_failure(&self, command: &CommandSpec, failure: &CommandFailure) -> RecoveryChoice {
            report_line(&format!("`{command}` {failure}"));
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Continue without this step, or abort and roll back?")
                .items(&["Continue (skip this step)", "Abort generation"])
                .default(1)
                .interact_opt();
            match choice {
                Ok(Some(0)) => RecoveryChoice::Continue,
                // Dismissed or unreadable prompts abort.
                _ => RecoveryChoice::Abort,
            }
        }
    }
}

#[cfg(not(feature = "interactive"))]
mod unavailable {
    use super::*;

    const FEATURE: &str = "interactive";

    fn unavailable<T>() -> CliResult<T> {
        Err(CliError::FeatureNotAvailable { feature: FEATURE })
    }

    pub struct Prompter;

    impl Prompter {
        pub fn new() -> Self {
            Self
        }

        pub fn project_name(&self) -> CliResult<String> {
            unavailable()
        }

        pub fn frontend(&self, _: Option<Frontend>) -> CliResult<Frontend> {
            unavailable()
        }

        pub fn backend(&self, _: Option<Backend>) -> CliResult<Backend> {
            unavailable()
        }

        pub fn database(&self, _: Backend, _: Option<Database>) -> CliResult<Database> {
            unavailable()
        }

        pub fn auth(&self, _: Backend, _: Database, _: Option<Auth>) -> CliResult<Auth> {
            unavailable()
        }

        pub fn connection_string(&self, _: Database) -> CliResult<String> {
            unavailable()
        }

        pub fn firebase_project(&self) -> CliResult<String> {
            unavailable()
        }

        pub fn jwt_secret(&self) -> CliResult<String> {
            unavailable()
        }

        pub fn collision(&self, _: &Path) -> CliResult<super::Collision> {
            unavailable()
        }
    }

    #[derive(Debug, Clone, Copy, Default)]
    pub struct TerminalRecovery;

    impl RecoveryPrompt for TerminalRecovery {
        fn on_failure(&self, command: &CommandSpec, failure: &CommandFailure) -> RecoveryChoice {
            tracing::warn!(%command, %failure, "no terminal prompt in this build, aborting");
            RecoveryChoice::Abort
        }
    }
}
