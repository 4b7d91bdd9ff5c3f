//! Stack compatibility rule registry.
//!
//! Every cross-dimension constraint is described exactly once by a
//! [`ValidationRule`] in [`RULES`]. Validation evaluates the whole table
//! and collects every violation; rules are independent of each other and
//! of their order in the table.
//!
//! Rules are tagged with the [`Dimension`]s they concern. Callers that only
//! know part of the stack (the database prompt runs before auth is chosen)
//! filter on those tags, never on message text.
//!
//! # Adding a New Rule
//!
//! 1. Write a `violated_by` predicate and a `message` builder
//! 2. Add one [`ValidationRule`] entry to [`RULES`]
//! 3. `assert_rules_integrity` checks the entry in tests

use serde::Serialize;

use crate::domain::value_objects::{Auth, Backend, Database, Dimension};

// ── Violation ────────────────────────────────────────────────────────────────

/// A structured description of why stack values are mutually incompatible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Identifier of the rule that produced this violation.
    pub rule: &'static str,
    /// Dimensions the violation concerns. Always two or more.
    pub dimensions: &'static [Dimension],
    /// Self-describing message naming the offending values.
    pub message: String,
}

impl Violation {
    pub fn concerns(&self, dimension: Dimension) -> bool {
        self.dimensions.contains(&dimension)
    }
}

// ── Rules ────────────────────────────────────────────────────────────────────

/// Backend and database known; auth may still be unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackView {
    pub backend: Backend,
    pub database: Database,
    pub auth: Option<Auth>,
}

/// One static compatibility constraint.
#[derive(Clone, Copy)]
pub struct ValidationRule {
    pub id: &'static str,
    pub dimensions: &'static [Dimension],
    /// Returns `true` when the stack breaks this rule. Rules that concern
    /// auth must return `false` while auth is unanswered.
    pub violated_by: fn(&StackView) -> bool,
    pub message: fn(&StackView) -> String,
}

impl ValidationRule {
    fn check(&self, view: &StackView) -> Option<Violation> {
        (self.violated_by)(view).then(|| Violation {
            rule: self.id,
            dimensions: self.dimensions,
            message: (self.message)(view),
        })
    }
}

/// Single source of truth for stack compatibility.
///
/// The table is not auto-symmetric: the Firestore/auth constraint is stated
/// from both sides and both entries are checked.
pub static RULES: &[ValidationRule] = &[
    ValidationRule {
        id: "relational-backend-document-db",
        dimensions: &[Dimension::Backend, Dimension::Database],
        violated_by: relational_backend_with_document_db,
        message: relational_backend_with_document_db_message,
    },
    ValidationRule {
        id: "relational-backend-managed-store",
        dimensions: &[Dimension::Backend, Dimension::Database],
        violated_by: relational_backend_with_managed_store,
        message: relational_backend_with_managed_store_message,
    },
    ValidationRule {
        id: "relational-backend-managed-identity",
        dimensions: &[Dimension::Backend, Dimension::Auth],
        violated_by: relational_backend_with_managed_identity,
        message: relational_backend_with_managed_identity_message,
    },
    ValidationRule {
        id: "managed-store-requires-managed-identity",
        dimensions: &[Dimension::Database, Dimension::Auth],
        violated_by: managed_store_without_managed_identity,
        message: |_| "Firestore requires Firebase Auth.".to_string(),
    },
    ValidationRule {
        id: "token-auth-excludes-managed-store",
        dimensions: &[Dimension::Auth, Dimension::Database],
        violated_by: token_auth_with_managed_store,
        message: |_| "JWT cannot be used with Firestore. Use Firebase Auth.".to_string(),
    },
];

fn relational_backend_with_document_db(v: &StackView) -> bool {
    v.backend.is_relational_only() && v.database == Database::MongoDb
}

fn relational_backend_with_document_db_message(v: &StackView) -> String {
    format!(
        "{backend} + {db} is invalid. {backend} only supports SQL (PostgreSQL/MySQL).",
        backend = v.backend,
        db = v.database.short_label()
    )
}

fn relational_backend_with_managed_store(v: &StackView) -> bool {
    v.backend.is_relational_only() && v.database == Database::Firestore
}

fn relational_backend_with_managed_store_message(v: &StackView) -> String {
    format!(
        "{} + {} is invalid.",
        v.backend,
        v.database.short_label()
    )
}

fn relational_backend_with_managed_identity(v: &StackView) -> bool {
    v.backend.is_relational_only() && v.auth == Some(Auth::FirebaseAuth)
}

fn relational_backend_with_managed_identity_message(v: &StackView) -> String {
    format!("{} cannot use Firebase Auth. Use JWT.", v.backend)
}

fn managed_store_without_managed_identity(v: &StackView) -> bool {
    v.database == Database::Firestore && v.auth.is_some_and(|a| a != Auth::FirebaseAuth)
}

fn token_auth_with_managed_store(v: &StackView) -> bool {
    v.auth == Some(Auth::Jwt) && v.database == Database::Firestore
}

// ── Validation API ───────────────────────────────────────────────────────────

/// Validate a complete `(backend, database, auth)` triple.
///
/// Pure and deterministic. Returns every violated rule, in table order.
pub fn validate(backend: Backend, database: Database, auth: Auth) -> Vec<Violation> {
    evaluate(&StackView {
        backend,
        database,
        auth: Some(auth),
    })
}

/// Validate a database choice before auth has been asked.
///
/// Only violations attributable to the backend/database pair are returned;
/// anything tagged with [`Dimension::Auth`] is left for [`validate`].
pub fn validate_database(backend: Backend, database: Database) -> Vec<Violation> {
    evaluate(&StackView {
        backend,
        database,
        auth: None,
    })
    .into_iter()
    .filter(|v| !v.concerns(Dimension::Auth))
    .collect()
}

fn evaluate(view: &StackView) -> Vec<Violation> {
    RULES.iter().filter_map(|rule| rule.check(view)).collect()
}

/// Databases that pass [`validate_database`] for this backend.
pub fn compatible_databases(backend: Backend) -> Vec<Database> {
    Database::ALL
        .iter()
        .copied()
        .filter(|&db| validate_database(backend, db).is_empty())
        .collect()
}

/// Auth variants that produce zero violations for this backend/database.
pub fn compatible_auths(backend: Backend, database: Database) -> Vec<Auth> {
    Auth::ALL
        .iter()
        .copied()
        .filter(|&auth| validate(backend, database, auth).is_empty())
        .collect()
}

// ── Registry integrity (checked in tests) ────────────────────────────────────

/// Assert that the rule table is internally consistent.
///
/// Call this in a test; it panics with a clear message on any violation.
#[doc(hidden)]
pub fn assert_rules_integrity() {
    for (i, rule) in RULES.iter().enumerate() {
        assert!(
            rule.dimensions.len() >= 2,
            "Rule {} must concern at least two dimensions",
            rule.id
        );
        assert!(
            !rule.dimensions.contains(&Dimension::Frontend),
            "Rule {} references the frontend, which has no constraints",
            rule.id
        );
        assert!(
            RULES[i + 1..].iter().all(|other| other.id != rule.id),
            "Duplicate rule id {}",
            rule.id
        );

        // Rules that do not concern auth must not depend on it.
        if !rule.dimensions.contains(&Dimension::Auth) {
            for &backend in Backend::ALL {
                for &database in Database::ALL {
                    let unanswered = (rule.violated_by)(&StackView {
                        backend,
                        database,
                        auth: None,
                    });
                    for &auth in Auth::ALL {
                        let answered = (rule.violated_by)(&StackView {
                            backend,
                            database,
                            auth: Some(auth),
                        });
                        assert_eq!(
                            unanswered, answered,
                            "Rule {} depends on auth but is not tagged with it",
                            rule.id
                        );
                    }
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
