//! `stacksmith init`: write a default configuration file.

use std::path::PathBuf;

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{AppConfig, LOCAL_FILE},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Write the default configuration to the selected location.
///
/// `--local` wins over `--config`, which wins over the per-user location.
pub fn execute(args: InitArgs, global: &GlobalArgs, output: &OutputManager) -> CliResult<()> {
    let path = target_path(&args, global);

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            path.display(),
        ))?;
        return Ok(());
    }

    let toml = AppConfig::default().to_toml()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }

    std::fs::write(&path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;

    tracing::info!(path = %path.display(), "configuration written");
    output.success(&format!("Configuration created at {}", path.display()))?;
    Ok(())
}

fn target_path(args: &InitArgs, global: &GlobalArgs) -> PathBuf {
    if args.local {
        PathBuf::from(LOCAL_FILE)
    } else if let Some(explicit) = &global.config {
        explicit.clone()
    } else {
        AppConfig::config_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config,
            log_file: None,
        }
    }

    #[test]
    fn local_flag_targets_working_directory() {
        let args = InitArgs {
            local: true,
            force: false,
        };
        let path = target_path(&args, &global(Some(PathBuf::from("/etc/x.toml"))));
        assert_eq!(path, PathBuf::from(LOCAL_FILE));
    }

    #[test]
    fn explicit_config_path_is_used() {
        let args = InitArgs {
            local: false,
            force: false,
        };
        let path = target_path(&args, &global(Some(PathBuf::from("/tmp/s.toml"))));
        assert_eq!(path, PathBuf::from("/tmp/s.toml"));
        assert_eq!(target_path(&args, &global(None)), AppConfig::config_path());
    }
}
