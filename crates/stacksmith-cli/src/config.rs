//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STACKSMITH__GENERATION__ON_COMMAND_FAILURE=abort`
//! 3. `--config FILE` (must exist when given)
//! 4. `./stacksmith.toml`, then the user config file (both optional)
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use stacksmith_core::{
    application::RecoveryPolicy,
    domain::{Auth, Backend, Database, Frontend},
};

use crate::error::{CliError, CliResult};

/// File name used for project-local configuration.
pub const LOCAL_FILE: &str = "stacksmith.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Preselected answers for the stack prompts.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Generation behaviour.
    pub generation: GenerationConfig,
    /// Log file settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub frontend: Option<String>,
    pub backend: Option<String>,
    pub database: Option<String>,
    pub auth: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `human` or `json`; used by `check` and `list` when `--format` is absent.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub on_command_failure: RecoveryPolicy,
    /// Interpreter used to create Python virtual environments.
    pub python: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            on_command_failure: RecoveryPolicy::Prompt,
            python: "python".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from every source, lowest priority first.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        for (path, required) in Self::sources(config_file) {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            );
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("STACKSMITH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Files read by [`load`](Self::load), in order, with whether each must exist.
    pub fn sources(config_file: Option<&PathBuf>) -> Vec<(PathBuf, bool)> {
        let mut files = vec![(Self::config_path(), false), (PathBuf::from(LOCAL_FILE), false)];
        if let Some(explicit) = config_file {
            files.push((explicit.clone(), true));
        }
        files
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `stacksmith.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stacksmith", "stacksmith")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_FILE))
    }

    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }

    // ── Typed views over `defaults` ───────────────────────────────────────

    pub fn default_frontend(&self) -> CliResult<Option<Frontend>> {
        parse_default("defaults.frontend", self.defaults.frontend.as_deref())
    }

    pub fn default_backend(&self) -> CliResult<Option<Backend>> {
        parse_default("defaults.backend", self.defaults.backend.as_deref())
    }

    pub fn default_database(&self) -> CliResult<Option<Database>> {
        parse_default("defaults.database", self.defaults.database.as_deref())
    }

    pub fn default_auth(&self) -> CliResult<Option<Auth>> {
        parse_default("defaults.auth", self.defaults.auth.as_deref())
    }

    /// Whether `output.format` asks for JSON.
    pub fn prefers_json(&self) -> bool {
        self.output.format.eq_ignore_ascii_case("json")
    }

    /// Look up a dotted key for `stacksmith config get`.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        match key {
            "defaults.frontend" => Ok(opt(&self.defaults.frontend)),
            "defaults.backend" => Ok(opt(&self.defaults.backend)),
            "defaults.database" => Ok(opt(&self.defaults.database)),
            "defaults.auth" => Ok(opt(&self.defaults.auth)),
            "output.no_color" => Ok(self.output.no_color.to_string()),
            "output.format" => Ok(self.output.format.clone()),
            "generation.on_command_failure" => Ok(self.generation.on_command_failure.to_string()),
            "generation.python" => Ok(self.generation.python.clone()),
            "logging.file" => Ok(self
                .logging
                .file
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            _ => Err(CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            }),
        }
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.logging.file.as_deref()
    }
}

fn parse_default<T>(key: &str, value: Option<&str>) -> CliResult<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| CliError::ConfigError {
                message: format!("{key}: {e}"),
                source: Some(Box::new(e)),
            })
        })
        .transpose()
}
