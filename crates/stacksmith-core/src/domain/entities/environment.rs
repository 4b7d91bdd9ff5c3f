//! User-supplied secrets and the `.env` file built from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::stack::StackSelection,
    error::DomainError,
    value_objects::{Auth, Database},
};

// ── UserConfig ────────────────────────────────────────────────────────────────

/// Values collected from prompts or flags after the stack is chosen.
///
/// Which fields are required depends on the selection; see
/// [`UserConfig::requirements`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub db_connection: Option<String>,
    pub firebase_project: Option<String>,
    pub jwt_secret: Option<String>,
}

/// Which [`UserConfig`] fields a selection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRequirements {
    pub db_connection: bool,
    pub firebase_project: bool,
    pub jwt_secret: bool,
}

impl UserConfig {
    pub fn requirements(selection: &StackSelection) -> ConfigRequirements {
        ConfigRequirements {
            db_connection: !selection.database().is_managed(),
            firebase_project: selection.database().is_managed() || selection.auth().is_managed(),
            jwt_secret: selection.auth() == Auth::Jwt,
        }
    }

    /// Check every required field is present and well-formed.
    ///
    /// Values for fields the selection does not need are ignored.
    pub fn validate_for(&self, selection: &StackSelection) -> Result<(), DomainError> {
        let needs = Self::requirements(selection);

        if needs.db_connection {
            let url = self
                .db_connection
                .as_deref()
                .ok_or(DomainError::MissingRequiredField {
                    field: "db_connection",
                })?;
            validate_connection_string(selection.database(), url)?;
        }
        if needs.firebase_project {
            let project = self
                .firebase_project
                .as_deref()
                .ok_or(DomainError::MissingRequiredField {
                    field: "firebase_project",
                })?;
            validate_required("firebase_project", project)?;
        }
        if needs.jwt_secret {
            let secret = self
                .jwt_secret
                .as_deref()
                .ok_or(DomainError::MissingRequiredField {
                    field: "jwt_secret",
                })?;
            validate_required("jwt_secret", secret)?;
        }
        Ok(())
    }
}

/// Non-empty after trimming.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidUserConfig {
            field,
            reason: "Required".into(),
        });
    }
    Ok(())
}

/// Non-empty and starting with one of the database's accepted URL schemes.
pub fn validate_connection_string(database: Database, value: &str) -> Result<(), DomainError> {
    validate_required("db_connection", value)?;

    let prefixes = database.connection_prefixes();
    let value = value.trim();
    if prefixes.is_empty() || prefixes.iter().any(|p| value.starts_with(p)) {
        return Ok(());
    }
    Err(DomainError::InvalidUserConfig {
        field: "db_connection",
        reason: format!("Must start with {}", prefixes.join(" or ")),
    })
}

// ── EnvironmentConfig ─────────────────────────────────────────────────────────

/// Ordered `KEY=VALUE` entries for the project's `.env`.
///
/// Built completely in memory, then written in a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentConfig {
    entries: Vec<(&'static str, String)>,
}

impl EnvironmentConfig {
    pub const FILE_NAME: &'static str = ".env";

    /// Derive the environment from the selection and collected values.
    ///
    /// Absent values produce no line. MongoDB additionally gets `MONGO_URI`
    /// mirroring the connection string.
    pub fn from_selection(selection: &StackSelection, config: &UserConfig) -> Self {
        let mut env = Self::default();

        if let Some(secret) = non_empty(&config.jwt_secret) {
            env.push("JWT_SECRET", secret);
        }
        if let Some(url) = non_empty(&config.db_connection) {
            env.push("DB_CONNECTION_STRING", url);
            if selection.database() == Database::MongoDb {
                env.push("MONGO_URI", url);
            }
        }
        if let Some(project) = non_empty(&config.firebase_project) {
            env.push("FIREBASE_PROJECT_ID", project);
        }
        env
    }

    fn push(&mut self, key: &'static str, value: &str) {
        self.entries.push((key, value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// File body, one `KEY=VALUE` line per entry.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
