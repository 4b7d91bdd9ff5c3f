//! `stacksmith config`: inspect the loaded configuration.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.data(&config.get(&key)?)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.data(&config.to_toml()?)?;
        }

        // Lowest priority first, as `AppConfig::load` reads them.
        ConfigCommands::Path => {
            for (path, required) in AppConfig::sources(global.config.as_ref()) {
                let state = match (path.exists(), required) {
                    (true, _) => "found",
                    (false, true) => "missing, required",
                    (false, false) => "not present",
                };
                output.data(&format!("{}  ({state})", path.display()))?;
            }
            output.data("environment: STACKSMITH__<SECTION>__<KEY>")?;
        }
    }

    Ok(())
}
