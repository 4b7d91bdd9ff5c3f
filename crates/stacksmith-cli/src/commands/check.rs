//! Implementation of the `stacksmith check` command.
//!
//! Runs the same compatibility rules and template lookup as `new`, without
//! prompting or touching the filesystem. Exits 1 when the stack is rejected.

use serde::Serialize;
use tracing::instrument;

use stacksmith_core::{
    domain::{Auth, Backend, Database, DomainError, Violation, has_template, validate, validate_database},
    error::StacksmithError,
};

use crate::{
    cli::{CheckArgs, ReportFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    backend: &'static str,
    database: &'static str,
    auth: Option<&'static str>,
    compatible: bool,
    template: bool,
    violations: &'a [Violation],
}

#[instrument(skip_all)]
pub fn execute(args: CheckArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let backend: Backend = args.backend.into();
    let database: Database = args.database.into();
    let auth: Option<Auth> = args.auth.map(Into::into);

    let violations = match auth {
        Some(auth) => validate(backend, database, auth),
        None => validate_database(backend, database),
    };
    let template = has_template(backend, database);

    let json = match args.format {
        Some(format) => format == ReportFormat::Json,
        None => config.prefers_json(),
    };

    if json {
        let report = CheckReport {
            backend: backend.as_str(),
            database: database.as_str(),
            auth: auth.map(|auth| auth.as_str()),
            compatible: violations.is_empty(),
            template,
            violations: &violations,
        };
        let payload = serde_json::to_string_pretty(&report).map_err(|e| StacksmithError::Internal {
            message: format!("failed to serialise check report: {e}"),
        })?;
        output.data(&payload)?;
    }

    if !violations.is_empty() {
        return Err(DomainError::IncompatibleStack { violations }.into());
    }
    if !template {
        return Err(DomainError::TemplateMissing { backend, database }.into());
    }

    if !json {
        let stack = match auth {
            Some(auth) => format!("{backend} + {database} + {auth}"),
            None => format!("{backend} + {database}"),
        };
        output.success(&format!("{stack} is a supported stack"))?;
        if auth.is_none() {
            output.info("Pass --auth to check the authentication method as well")?;
        }
    }
    Ok(())
}
