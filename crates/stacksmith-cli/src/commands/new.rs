//! Implementation of the `stacksmith new` command.
//!
//! Responsibility: collect a complete request (flags first, prompts for
//! whatever is missing), settle directory collisions, then hand off to the
//! core generation service and report the result. Compatibility rules and
//! generation steps live in `stacksmith-core`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use stacksmith_adapters::{BuiltinContent, LocalFilesystem, SystemExecutor, project_tree};
use stacksmith_core::{
    application::{
        CleanupOutcome, CommandRunner, GenerationPlan, GenerationReport, GenerationRequest,
        GenerationService, RecoveryPolicy, TransactionContext,
    },
    domain::{
        Database, DomainError, StackSelection, Toolchain, UserConfig, validate_connection_string,
        validate_project_name, validate_required,
    },
};

use crate::{
    cli::{NewArgs, PolicyArg},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    prompt::{Collision, Prompter, TerminalRecovery},
};

/// Depth of the directory tree printed after a successful run.
const SUMMARY_DEPTH: usize = 2;

/// Execute the `stacksmith new` command.
///
/// 1. Resolve and validate the project name
/// 2. Settle an existing directory (`--force`, prompt, or fail)
/// 3. Resolve the stack, validating each dimension as it is chosen
/// 4. Collect the credentials the stack needs
/// 5. Print the plan on `--dry-run`, otherwise generate
/// 6. Print the summary, or the rollback outcome on failure
#[instrument(skip_all, fields(project = args.name.as_deref().unwrap_or("<prompt>")))]
pub fn execute(
    args: NewArgs,
    config: &AppConfig,
    output: &OutputManager,
    transaction: Arc<TransactionContext>,
) -> CliResult<()> {
    let prompter = Prompter::new();
    let interactive = !args.yes;
    let parent_dir = std::env::current_dir().with_cli_context(|| "cannot read the working directory")?;

    // 1. Name
    let name = match &args.name {
        Some(name) => check_name(name)?,
        None if interactive => prompter.project_name()?,
        None => return Err(missing("a project NAME")),
    };

    // 2. Collisions
    let project_name = settle_collision(name, &parent_dir, &args, &prompter, output)?;

    // 3. Stack
    let selection = resolve_selection(&args, config, &prompter)?;
    debug!(stack = %selection, "stack resolved");

    // 4. Credentials
    let user_config = resolve_user_config(&args, &selection, &prompter)?;

    let request = GenerationRequest {
        project_name,
        parent_dir,
        selection,
        user_config,
    };

    let policy = resolve_policy(args.on_failure, config.generation.on_command_failure, args.yes);
    let progress = output.clone();
    let service = GenerationService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(BuiltinContent::new()),
        CommandRunner::new(Arc::new(SystemExecutor::new()), Arc::new(TerminalRecovery))
            .with_policy(policy),
        Arc::clone(&transaction),
    )
    .with_toolchain(Toolchain {
        python: config.generation.python.clone(),
        windows: cfg!(windows),
    })
    .with_progress(move |step| {
        let _ = progress.step(step);
    });

    // 5. Dry run or generate
    if args.dry_run {
        let plan = service.plan(&request)?;
        return print_plan(&plan, &request.parent_dir, output);
    }

    output.header(&format!(
        "Creating '{}' ({})",
        request.project_name, request.selection
    ))?;
    info!(policy = %policy, "generation requested");

    match service.generate(&request) {
        Ok(report) => print_summary(&report, output),
        Err(err) => {
            report_rollback(&transaction, output)?;
            Err(err.into())
        }
    }
}

// ── Name and collisions ───────────────────────────────────────────────────────

fn check_name(name: &str) -> CliResult<String> {
    validate_project_name(name).map_err(|e| CliError::InvalidProjectName {
        name: name.to_string(),
        reason: match e {
            DomainError::InvalidUserConfig { reason, .. } => reason,
            other => other.to_string(),
        },
    })?;
    Ok(name.to_string())
}

/// Return a name whose directory does not exist yet, or one the user agreed
/// to replace. Replacement happens here, before generation begins, so the
/// orchestrator never deletes anything it did not create.
fn settle_collision(
    mut name: String,
    parent_dir: &Path,
    args: &NewArgs,
    prompter: &Prompter,
    output: &OutputManager,
) -> CliResult<String> {
    loop {
        let root = parent_dir.join(&name);
        if !root.exists() {
            return Ok(name);
        }
        if args.dry_run {
            output.warning(&format!(
                "{} already exists; a real run would need --force or another name",
                root.display()
            ))?;
            return Ok(name);
        }

        let choice = if args.force {
            Collision::Overwrite
        } else if args.yes {
            return Err(CliError::ProjectExists { path: root });
        } else {
            prompter.collision(&root)?
        };

        match choice {
            Collision::Overwrite => {
                std::fs::remove_dir_all(&root)
                    .with_cli_context(|| format!("failed to remove '{}'", root.display()))?;
                info!(path = %root.display(), "existing directory removed");
                output.warning(&format!("Removed existing {}", root.display()))?;
                return Ok(name);
            }
            Collision::Rename => name = prompter.project_name()?,
            Collision::Exit => return Err(CliError::Cancelled),
        }
    }
}

// ── Stack ─────────────────────────────────────────────────────────────────────

/// Flags win, then prompts (preselecting config defaults), then under `--yes`
/// the config defaults alone. The builder rejects an incompatible database as
/// soon as it is set, so a bad pair never reaches the auth question.
fn resolve_selection(
    args: &NewArgs,
    config: &AppConfig,
    prompter: &Prompter,
) -> CliResult<StackSelection> {
    let interactive = !args.yes;
    let stack = &args.stack;

    let frontend = match stack.frontend {
        Some(frontend) => frontend.into(),
        None if interactive => prompter.frontend(config.default_frontend()?)?,
        None => config
            .default_frontend()?
            .ok_or_else(|| missing("--frontend"))?,
    };
    let backend = match stack.backend {
        Some(backend) => backend.into(),
        None if interactive => prompter.backend(config.default_backend()?)?,
        None => config.default_backend()?.ok_or_else(|| missing("--backend"))?,
    };
    let database = match stack.database {
        Some(database) => database.into(),
        None if interactive => prompter.database(backend, config.default_database()?)?,
        None => config
            .default_database()?
            .ok_or_else(|| missing("--database"))?,
    };

    let builder = StackSelection::builder()
        .frontend(frontend)
        .backend(backend)
        .database(database)?;

    let auth = match stack.auth {
        Some(auth) => auth.into(),
        None if interactive => prompter.auth(backend, database, config.default_auth()?)?,
        None => config.default_auth()?.ok_or_else(|| missing("--auth"))?,
    };

    Ok(builder.auth(auth)?.build()?)
}

// ── Credentials ───────────────────────────────────────────────────────────────

fn resolve_user_config(
    args: &NewArgs,
    selection: &StackSelection,
    prompter: &Prompter,
) -> CliResult<UserConfig> {
    let interactive = !args.yes;
    let needs = UserConfig::requirements(selection);
    let database = selection.database();

    let db_connection = if needs.db_connection {
        Some(match &args.db_url {
            Some(url) => {
                validate_connection_string(database, url)?;
                url.clone()
            }
            None if interactive => prompter.connection_string(database)?,
            None => return Err(missing_for("--db-url", database)),
        })
    } else {
        None
    };

    let firebase_project = if needs.firebase_project {
        Some(match &args.firebase_project {
            Some(id) => {
                validate_required("firebase_project", id)?;
                id.clone()
            }
            None if interactive => prompter.firebase_project()?,
            None => return Err(missing("--firebase-project")),
        })
    } else {
        None
    };

    let jwt_secret = if needs.jwt_secret {
        Some(match &args.jwt_secret {
            Some(secret) => {
                validate_required("jwt_secret", secret)?;
                secret.clone()
            }
            None if interactive => prompter.jwt_secret()?,
            None => return Err(missing("--jwt-secret")),
        })
    } else {
        None
    };

    let user_config = UserConfig {
        db_connection,
        firebase_project,
        jwt_secret,
    };
    user_config.validate_for(selection)?;
    Ok(user_config)
}

/// `--yes` has nobody to ask, so `prompt` falls back to skipping.
fn resolve_policy(flag: Option<PolicyArg>, configured: RecoveryPolicy, yes: bool) -> RecoveryPolicy {
    match flag {
        Some(policy) => policy.into(),
        None if yes && configured == RecoveryPolicy::Prompt => RecoveryPolicy::Continue,
        None => configured,
    }
}

fn missing(what: &str) -> CliError {
    CliError::InvalidInput {
        message: format!("{what} is required when --yes disables prompts"),
    }
}

fn missing_for(flag: &str, database: Database) -> CliError {
    CliError::InvalidInput {
        message: format!(
            "{flag} is required for {database} when --yes disables prompts (expected {})",
            database.connection_prefixes().join(" or ")
        ),
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_plan(plan: &GenerationPlan, parent_dir: &Path, output: &OutputManager) -> CliResult<()> {
    output.info(&format!(
        "Dry run: would create '{}' at {}",
        plan.workspace.name(),
        plan.workspace.root().display()
    ))?;
    for planned in &plan.steps {
        output.step(planned.step)?;
        for action in &planned.actions {
            output.print(&format!("      {}", relative_action(&action.to_string(), parent_dir)))?;
        }
    }
    output.print("")?;
    output.info(&format!(
        "{} actions, {} external commands. Nothing was written.",
        plan.actions().count(),
        plan.commands().count()
    ))?;
    Ok(())
}

/// Shorten absolute paths in an action line to paths under the parent dir.
fn relative_action(line: &str, parent_dir: &Path) -> String {
    let prefix = format!("{}{}", parent_dir.display(), std::path::MAIN_SEPARATOR);
    line.replace(&prefix, "")
}

fn print_summary(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    let root = report.workspace.root();
    output.success(&format!(
        "Project '{}' created at {}",
        report.workspace.name(),
        root.display()
    ))?;

    if output.is_quiet() {
        return Ok(());
    }

    output.print("")?;
    output.print(&format!("{}/", report.workspace.name()))?;
    for line in project_tree(root, SUMMARY_DEPTH)? {
        output.print(&format!("  {line}"))?;
    }

    if !report.skipped_steps.is_empty() {
        output.print("")?;
        output.warning(&format!(
            "{} command(s) were skipped; run them yourself:",
            report.skipped_steps.len()
        ))?;
        for skipped in &report.skipped_steps {
            output.print(&format!(
                "  {}  (in {}; {})",
                skipped.command,
                relative_dir(&skipped.working_dir, root).display(),
                skipped.reason
            ))?;
        }
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", report.workspace.name()))?;
    output.print("  See README.md to start the client and the server")?;
    Ok(())
}

fn relative_dir(path: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Tell the user what the rollback did to the partial project.
fn report_rollback(transaction: &TransactionContext, output: &OutputManager) -> CliResult<()> {
    match transaction.cleanup() {
        Some(outcome @ CleanupOutcome::NothingToRemove(_)) => {
            output.info(&rollback_message(&outcome))?;
        }
        Some(outcome @ (CleanupOutcome::RolledBack(_) | CleanupOutcome::CleanupFailed { .. })) => {
            output.warning(&rollback_message(&outcome))?;
        }
        _ => {}
    }
    Ok(())
}

fn rollback_message(outcome: &CleanupOutcome) -> String {
    match outcome {
        CleanupOutcome::RolledBack(root) => format!("Rolled back: removed {}", root.display()),
        CleanupOutcome::NothingToRemove(root) => {
            format!("Rolled back: nothing was left at {}", root.display())
        }
        CleanupOutcome::CleanupFailed { path, reason } => format!(
            "Could not remove the partial project at {} ({reason}); delete it manually",
            path.display()
        ),
        CleanupOutcome::NotStarted | CleanupOutcome::Deferred(_) => String::new(),
    }
}
