//! The `StackSelection` aggregate and its typestate builder.
//!
//! A `StackSelection` is the final, validated answer to the four stack
//! questions. Once it exists the `(backend, database, auth)` triple is
//! guaranteed to produce zero violations.
//!
//! # Typestate builder
//!
//! `NoBackend` / `HasBackend` markers enforce at compile time that the
//! backend is chosen before the database and auth, mirroring the prompt
//! order. The `database` and `auth` setters validate incrementally so a
//! bad answer is rejected at the question that caused it; `build()`
//! re-validates the whole triple.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use crate::domain::{
    compatibility,
    error::DomainError,
    value_objects::{Auth, Backend, Database, Frontend},
};

// ── Aggregate root ────────────────────────────────────────────────────────────

/// A fully-validated stack selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StackSelection {
    frontend: Frontend,
    backend: Backend,
    database: Database,
    auth: Auth,
}

impl StackSelection {
    pub fn builder() -> StackSelectionBuilder<NoBackend> {
        StackSelectionBuilder::new()
    }

    pub const fn frontend(&self) -> Frontend {
        self.frontend
    }
    pub const fn backend(&self) -> Backend {
        self.backend
    }
    pub const fn database(&self) -> Database {
        self.database
    }
    pub const fn auth(&self) -> Auth {
        self.auth
    }

    /// Re-check the triple against every compatibility rule.
    pub fn validate(&self) -> Result<(), DomainError> {
        let violations = compatibility::validate(self.backend, self.database, self.auth);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::IncompatibleStack { violations })
        }
    }
}

impl fmt::Display for StackSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.frontend, self.backend, self.database, self.auth
        )
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: backend has not been chosen yet.
#[derive(Debug, Clone, Copy)]
pub struct NoBackend;
/// Marker: backend is known; database and auth may now be set.
#[derive(Debug, Clone, Copy)]
pub struct HasBackend;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Cloneable so a prompt loop can retry a rejected answer from the same state.
#[derive(Debug, Clone)]
pub struct StackSelectionBuilder<B> {
    frontend: Option<Frontend>,
    backend: Option<Backend>,
    database: Option<Database>,
    auth: Option<Auth>,
    _marker: PhantomData<B>,
}

impl<B> StackSelectionBuilder<B> {
    /// The frontend has no cross-dimension constraints and can be set at any time.
    pub fn frontend(mut self, frontend: Frontend) -> Self {
        self.frontend = Some(frontend);
        self
    }
}

impl StackSelectionBuilder<NoBackend> {
    pub fn new() -> Self {
        Self {
            frontend: None,
            backend: None,
            database: None,
            auth: None,
            _marker: PhantomData,
        }
    }

    pub fn backend(self, backend: Backend) -> StackSelectionBuilder<HasBackend> {
        StackSelectionBuilder {
            frontend: self.frontend,
            backend: Some(backend),
            database: None,
            auth: None,
            _marker: PhantomData,
        }
    }
}

impl Default for StackSelectionBuilder<NoBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl StackSelectionBuilder<HasBackend> {
    fn chosen_backend(&self) -> Result<Backend, DomainError> {
        self.backend
            .ok_or(DomainError::MissingRequiredField { field: "backend" })
    }

    /// Set the database.
    ///
    /// Rejected when the backend/database pair alone is invalid. Rules that
    /// also involve auth are deferred to [`auth`](Self::auth).
    pub fn database(mut self, database: Database) -> Result<Self, DomainError> {
        let backend = self.chosen_backend()?;
        let violations = compatibility::validate_database(backend, database);
        if !violations.is_empty() {
            return Err(DomainError::IncompatibleStack { violations });
        }
        self.database = Some(database);
        Ok(self)
    }

    /// Set the auth mechanism.
    ///
    /// Validates the full triple when the database is already known.
    pub fn auth(mut self, auth: Auth) -> Result<Self, DomainError> {
        if let Some(database) = self.database {
            let violations = compatibility::validate(self.chosen_backend()?, database, auth);
            if !violations.is_empty() {
                return Err(DomainError::IncompatibleStack { violations });
            }
        }
        self.auth = Some(auth);
        Ok(self)
    }

    pub fn build(self) -> Result<StackSelection, DomainError> {
        let selection = StackSelection {
            frontend: self
                .frontend
                .ok_or(DomainError::MissingRequiredField { field: "frontend" })?,
            backend: self.chosen_backend()?,
            database: self
                .database
                .ok_or(DomainError::MissingRequiredField { field: "database" })?,
            auth: self
                .auth
                .ok_or(DomainError::MissingRequiredField { field: "auth" })?,
        };
        selection.validate()?;
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_valid_selection() {
        let sel = StackSelection::builder()
            .frontend(Frontend::React)
            .backend(Backend::NodeExpress)
            .database(Database::MongoDb)
            .unwrap()
            .auth(Auth::Jwt)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(sel.backend(), Backend::NodeExpress);
        assert_eq!(sel.to_string(), "React / Node + Express / MongoDB / JWT");
    }

    #[test]
    fn database_setter_rejects_pair_violations() {
        let err = StackSelection::builder()
            .backend(Backend::Flask)
            .database(Database::MongoDb)
            .err()
            .unwrap();

        match err {
            DomainError::IncompatibleStack { violations } => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].message.contains("Flask + MongoDB"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn database_setter_defers_auth_rules() {
        // Firestore is fine for Node until JWT is picked.
        let builder = StackSelection::builder()
            .backend(Backend::NodeFastify)
            .database(Database::Firestore)
            .unwrap();

        let err = builder.auth(Auth::Jwt).err().unwrap();
        assert!(matches!(err, DomainError::IncompatibleStack { ref violations } if violations.len() == 2));
    }

    #[test]
    fn auth_can_be_retried_without_resetting_database() {
        let builder = StackSelection::builder()
            .frontend(Frontend::Vue)
            .backend(Backend::NodeExpress)
            .database(Database::Firestore)
            .unwrap();

        assert!(builder.clone().auth(Auth::Jwt).is_err());
        let sel = builder
            .auth(Auth::FirebaseAuth)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(sel.database(), Database::Firestore);
    }

    #[test]
    fn build_reports_missing_fields() {
        let err = StackSelection::builder()
            .backend(Backend::Django)
            .database(Database::PostgreSql)
            .unwrap()
            .auth(Auth::Jwt)
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::MissingRequiredField { field: "frontend" });
    }

    #[test]
    fn build_revalidates_when_auth_set_before_database() {
        let err = StackSelection::builder()
            .frontend(Frontend::Svelte)
            .backend(Backend::Django)
            .auth(Auth::FirebaseAuth)
            .unwrap()
            .database(Database::PostgreSql)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::IncompatibleStack { .. }));
    }
}
