//! # Stacksmith CLI
//!
//! Interactive full-stack project generator.
//!
//! ## Startup sequence
//!
//! 1. Load `.env` from the working directory.
//! 2. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 3. Load configuration (defaults, files, environment).
//! 4. Initialise the tracing subscriber.
//! 5. Install the SIGINT/SIGTERM handler.
//! 6. Dispatch to the command handler.
//! 7. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! |  0   | Success                                   |
//! |  1   | Rejected stack, failed run, cancellation  |
//! |  2   | Invalid arguments                         |

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info, instrument};

use stacksmith_adapters::LocalFilesystem;
use stacksmith_core::application::TransactionContext;

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;
mod signals;

fn main() -> ExitCode {
    // Before anything reads the environment, clap included.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(if e.use_stderr() { 2 } else { 0 });
        }
    };

    // `init --config FILE` creates FILE, so it cannot be required yet.
    let explicit = match cli.command {
        Commands::Init(_) => None,
        _ => cli.global.config.as_ref(),
    };
    let config = match AppConfig::load(explicit) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::from(1);
        }
    };

    let log_file = cli.global.log_file.as_deref().or(config.log_file());
    let _log_guard = match init_logging(&cli.global, log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    let transaction = Arc::new(TransactionContext::new(Arc::new(LocalFilesystem::new())));
    if let Err(e) = signals::install(Arc::clone(&transaction)) {
        tracing::warn!("Ctrl-C will not roll back: {e:#}");
    }

    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;

    match run(cli, &config, &output, transaction) {
        Ok(()) => {
            info!("stacksmith completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(
    cli: Cli,
    config: &AppConfig,
    output: &OutputManager,
    transaction: Arc<TransactionContext>,
) -> CliResult<()> {
    match cli.command {
        Commands::New(args) => commands::new::execute(args, config, output, transaction),
        Commands::Check(args) => commands::check::execute(args, config, output),
        Commands::List(args) => commands::list::execute(args, config, output),
        Commands::Init(args) => commands::init::execute(args, &cli.global, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, &cli.global, config, output),
    }
}

/// Translate a `CliError` into a user message and exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // stderr, so the message survives a redirected stdout.
    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}
