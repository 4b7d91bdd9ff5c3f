//! Domain value objects: Frontend, Backend, Database, Auth.
//!
//! # Design
//!
//! These are pure `Copy` value types with equality by value.
//! They hold NO compatibility logic. All rules live in `compatibility.rs`
//! and all generation strategies live in `strategies.rs`. This file's only
//! job is to define the closed catalog, its string representations, and
//! its `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here (and to its `ALL` slice)
//! 2. Add the `as_str`, `label` and `FromStr` arms here
//! 3. The compiler then points at every strategy table that needs an arm

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Dimension ────────────────────────────────────────────────────────────────

/// One of the four independent user choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Frontend,
    Backend,
    Database,
    Auth,
}

impl Dimension {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Database => "database",
            Self::Auth => "auth",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Frontend ─────────────────────────────────────────────────────────────────

/// Frontend framework generated into `client/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frontend {
    React,
    NextJs,
    Vue,
    Angular,
    Svelte,
}

impl Frontend {
    pub const ALL: &'static [Frontend] = &[
        Self::React,
        Self::NextJs,
        Self::Vue,
        Self::Angular,
        Self::Svelte,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::NextJs => "nextjs",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Svelte => "svelte",
        }
    }

    /// Human-readable name shown in prompts and the generated README.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::React => "React",
            Self::NextJs => "Next.js",
            Self::Vue => "Vue",
            Self::Angular => "Angular",
            Self::Svelte => "Svelte",
        }
    }
}

impl fmt::Display for Frontend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frontend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "react" => Ok(Self::React),
            "nextjs" | "next.js" | "next" => Ok(Self::NextJs),
            "vue" => Ok(Self::Vue),
            "angular" => Ok(Self::Angular),
            "svelte" => Ok(Self::Svelte),
            other => Err(DomainError::InvalidValue {
                dimension: Dimension::Frontend,
                value: other.to_string(),
            }),
        }
    }
}

// ── Backend ──────────────────────────────────────────────────────────────────

/// Backend framework generated into `server/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    NodeExpress,
    NodeFastify,
    Flask,
    Django,
}

/// Runtime family of a backend. Decides the generation sub-sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendFamily {
    /// npm-managed JavaScript server.
    Node,
    /// venv + pip managed Python server, restricted to relational databases.
    Python,
}

impl Backend {
    pub const ALL: &'static [Backend] = &[
        Self::NodeExpress,
        Self::NodeFastify,
        Self::Flask,
        Self::Django,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NodeExpress => "express",
            Self::NodeFastify => "fastify",
            Self::Flask => "flask",
            Self::Django => "django",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::NodeExpress => "Node + Express",
            Self::NodeFastify => "Node + Fastify",
            Self::Flask => "Flask",
            Self::Django => "Django",
        }
    }

    pub const fn family(&self) -> BackendFamily {
        match self {
            Self::NodeExpress | Self::NodeFastify => BackendFamily::Node,
            Self::Flask | Self::Django => BackendFamily::Python,
        }
    }

    /// Whether this backend only supports relational data access.
    pub const fn is_relational_only(&self) -> bool {
        matches!(self.family(), BackendFamily::Python)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Backend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "express" | "node-express" | "node + express" => Ok(Self::NodeExpress),
            "fastify" | "node-fastify" | "node + fastify" => Ok(Self::NodeFastify),
            "flask" => Ok(Self::Flask),
            "django" => Ok(Self::Django),
            other => Err(DomainError::InvalidValue {
                dimension: Dimension::Backend,
                value: other.to_string(),
            }),
        }
    }
}

// ── Database ─────────────────────────────────────────────────────────────────

/// Database the backend connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Database {
    MongoDb,
    PostgreSql,
    MySql,
    Firestore,
}

impl Database {
    pub const ALL: &'static [Database] = &[
        Self::MongoDb,
        Self::PostgreSql,
        Self::MySql,
        Self::Firestore,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MongoDb => "mongodb",
            Self::PostgreSql => "postgresql",
            Self::MySql => "mysql",
            Self::Firestore => "firestore",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::MongoDb => "MongoDB",
            Self::PostgreSql => "PostgreSQL",
            Self::MySql => "MySQL",
            Self::Firestore => "Firebase Firestore",
        }
    }

    /// Short name used in violation messages.
    pub const fn short_label(&self) -> &'static str {
        match self {
            Self::Firestore => "Firestore",
            other => other.label(),
        }
    }

    pub const fn is_relational(&self) -> bool {
        matches!(self, Self::PostgreSql | Self::MySql)
    }

    /// Managed document store: identity and connection come from the vendor,
    /// so there is no connection string to collect.
    pub const fn is_managed(&self) -> bool {
        matches!(self, Self::Firestore)
    }

    /// Accepted connection-string prefixes, empty for managed stores.
    pub const fn connection_prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::MongoDb => &["mongodb://", "mongodb+srv://"],
            Self::PostgreSql => &["postgresql://", "postgres://"],
            Self::MySql => &["mysql://"],
            Self::Firestore => &[],
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Database {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "postgresql" | "postgres" | "pg" => Ok(Self::PostgreSql),
            "mysql" => Ok(Self::MySql),
            "firestore" | "firebase-firestore" | "firebase firestore" => Ok(Self::Firestore),
            other => Err(DomainError::InvalidValue {
                dimension: Dimension::Database,
                value: other.to_string(),
            }),
        }
    }
}

// ── Auth ─────────────────────────────────────────────────────────────────────

/// Authentication mechanism wired into the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Auth {
    /// Token-based auth signed with a local secret.
    Jwt,
    /// Managed identity provider.
    FirebaseAuth,
}

impl Auth {
    pub const ALL: &'static [Auth] = &[Self::Jwt, Self::FirebaseAuth];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jwt => "jwt",
            Self::FirebaseAuth => "firebase-auth",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Jwt => "JWT",
            Self::FirebaseAuth => "Firebase Auth",
        }
    }

    pub const fn is_managed(&self) -> bool {
        matches!(self, Self::FirebaseAuth)
    }
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Auth {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jwt" => Ok(Self::Jwt),
            "firebase-auth" | "firebase" | "firebase auth" => Ok(Self::FirebaseAuth),
            other => Err(DomainError::InvalidValue {
                dimension: Dimension::Auth,
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_catalog_names() {
        assert_eq!(Frontend::NextJs.to_string(), "Next.js");
        assert_eq!(Backend::NodeExpress.to_string(), "Node + Express");
        assert_eq!(Database::Firestore.to_string(), "Firebase Firestore");
        assert_eq!(Auth::FirebaseAuth.to_string(), "Firebase Auth");
    }

    #[test]
    fn from_str_accepts_ids_and_aliases() {
        assert_eq!("next.js".parse::<Frontend>().unwrap(), Frontend::NextJs);
        assert_eq!("Express".parse::<Backend>().unwrap(), Backend::NodeExpress);
        assert_eq!("postgres".parse::<Database>().unwrap(), Database::PostgreSql);
        assert_eq!("mongo".parse::<Database>().unwrap(), Database::MongoDb);
        assert_eq!("firebase".parse::<Auth>().unwrap(), Auth::FirebaseAuth);
    }

    #[test]
    fn from_str_round_trips_as_str() {
        for fe in Frontend::ALL {
            assert_eq!(fe.as_str().parse::<Frontend>().unwrap(), *fe);
        }
        for be in Backend::ALL {
            assert_eq!(be.as_str().parse::<Backend>().unwrap(), *be);
        }
        for db in Database::ALL {
            assert_eq!(db.as_str().parse::<Database>().unwrap(), *db);
        }
        for auth in Auth::ALL {
            assert_eq!(auth.as_str().parse::<Auth>().unwrap(), *auth);
        }
    }

    #[test]
    fn unknown_values_report_their_dimension() {
        let err = "cassandra".parse::<Database>().unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidValue {
                dimension: Dimension::Database,
                value: "cassandra".into()
            }
        );
    }

    #[test]
    fn python_backends_are_relational_only() {
        assert!(Backend::Flask.is_relational_only());
        assert!(Backend::Django.is_relational_only());
        assert!(!Backend::NodeExpress.is_relational_only());
        assert!(!Backend::NodeFastify.is_relational_only());
    }

    #[test]
    fn managed_store_has_no_connection_prefixes() {
        assert!(Database::Firestore.connection_prefixes().is_empty());
        assert!(Database::MongoDb.connection_prefixes().contains(&"mongodb+srv://"));
    }
}
