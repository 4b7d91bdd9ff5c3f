//! Implementation of the `stacksmith list` command.

use serde_json::{Value, json};

use stacksmith_core::{
    domain::{Auth, Backend, Database, Frontend, compatible_auths, compatible_databases, has_template},
    error::StacksmithError,
};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let format = args.format.unwrap_or(if config.prefers_json() {
        ListFormat::Json
    } else {
        ListFormat::Table
    });

    match (format, args.matrix) {
        (ListFormat::Table, false) => print_catalog(output),
        (ListFormat::Table, true) => print_matrix(output),
        (ListFormat::Json, matrix) => {
            let document = if matrix { matrix_json() } else { catalog_json() };
            let payload = serde_json::to_string_pretty(&document).map_err(|e| {
                StacksmithError::Internal {
                    message: format!("failed to serialise catalog: {e}"),
                }
            })?;
            output.data(&payload)?;
            Ok(())
        }
    }
}

fn print_catalog(output: &OutputManager) -> CliResult<()> {
    section(output, "Frontends", Frontend::ALL.iter().map(|v| (v.as_str(), v.label())))?;
    section(output, "Backends", Backend::ALL.iter().map(|v| (v.as_str(), v.label())))?;
    section(output, "Databases", Database::ALL.iter().map(|v| (v.as_str(), v.label())))?;
    section(output, "Authentication", Auth::ALL.iter().map(|v| (v.as_str(), v.label())))?;
    output.print("Run 'stacksmith list --matrix' to see which combinations work together.")?;
    Ok(())
}

fn section<'a>(
    output: &OutputManager,
    title: &str,
    rows: impl Iterator<Item = (&'a str, &'a str)>,
) -> CliResult<()> {
    output.header(&format!("{title}:"))?;
    for (value, label) in rows {
        output.print(&format!("  {value:<12} {label}"))?;
    }
    output.print("")?;
    Ok(())
}

fn print_matrix(output: &OutputManager) -> CliResult<()> {
    output.header("Compatibility matrix:")?;
    for &backend in Backend::ALL {
        output.print("")?;
        output.print(&format!("  {backend}"))?;
        for database in compatible_databases(backend) {
            let auths: Vec<&str> = compatible_auths(backend, database)
                .iter()
                .map(|auth| auth.label())
                .collect();
            let marker = if has_template(backend, database) {
                ""
            } else {
                "  (no template)"
            };
            output.print(&format!(
                "    {:<12} auth: {}{marker}",
                database.label(),
                auths.join(", ")
            ))?;
        }
    }
    Ok(())
}

fn catalog_json() -> Value {
    json!({
        "frontends": Frontend::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
        "backends": Backend::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
        "databases": Database::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
        "auth": Auth::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
    })
}

fn matrix_json() -> Value {
    let backends: serde_json::Map<String, Value> = Backend::ALL
        .iter()
        .map(|&backend| {
            let databases: serde_json::Map<String, Value> = compatible_databases(backend)
                .into_iter()
                .map(|database| {
                    let auths: Vec<&str> = compatible_auths(backend, database)
                        .iter()
                        .map(|auth| auth.as_str())
                        .collect();
                    (database.as_str().to_string(), json!(auths))
                })
                .collect();
            (backend.as_str().to_string(), Value::Object(databases))
        })
        .collect();
    Value::Object(backends)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_excludes_mongodb_for_python_backends() {
        let matrix = matrix_json();
        assert!(matrix["flask"].get("mongodb").is_none());
        assert!(matrix["django"].get("postgresql").is_some());
        assert!(matrix["express"].get("mongodb").is_some());
    }

    #[test]
    fn catalog_lists_every_value() {
        let catalog = catalog_json();
        assert_eq!(
            catalog["databases"].as_array().map(Vec::len),
            Some(Database::ALL.len())
        );
    }
}
