// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stacksmith.
//!
//! This module contains pure business logic: the stack catalog, the
//! compatibility rule registry, the generation strategy tables and the
//! entities a run is built from. Executing anything is delegated to ports
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, process, or network calls
//! - **No logging**: Observability belongs to the application and CLI layers
//! - **Immutable entities**: `StackSelection` is only produced by its builder
//!
pub mod compatibility;
pub mod entities;
pub mod error;
pub mod strategies;
pub mod value_objects;

mod validation;

pub use compatibility::{
    RULES, ValidationRule, Violation, compatible_auths, compatible_databases, validate,
    validate_database,
};

pub use entities::{
    ConfigRequirements, EnvironmentConfig, GenerationStep, HasBackend, NoBackend,
    ProjectWorkspace, StackSelection, StackSelectionBuilder, UserConfig,
    validate_connection_string, validate_project_name, validate_required,
};

pub use error::{DomainError, ErrorCategory};

pub use strategies::{
    BackendAction, BackendStrategy, CommandSpec, ContentKind, FrontendStrategy, NodeFlavor,
    Toolchain, backend_strategy, frontend_strategy, has_template,
};

pub use value_objects::{Auth, Backend, BackendFamily, Database, Dimension, Frontend};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Cross-module properties
    // ========================================================================

    #[test]
    fn validated_stacks_always_resolve_a_template() {
        for &backend in Backend::ALL {
            for &database in Database::ALL {
                for &auth in Auth::ALL {
                    if validate(backend, database, auth).is_empty() {
                        let sel = StackSelection::builder()
                            .frontend(Frontend::Angular)
                            .backend(backend)
                            .database(database)
                            .unwrap()
                            .auth(auth)
                            .unwrap()
                            .build()
                            .unwrap();
                        DomainValidator::validate_template(&sel).unwrap();
                    }
                }
            }
        }
    }

    #[test]
    fn every_invalid_triple_is_rejected_by_the_builder() {
        for &backend in Backend::ALL {
            for &database in Database::ALL {
                for &auth in Auth::ALL {
                    let expected_ok = validate(backend, database, auth).is_empty();
                    let built = StackSelection::builder()
                        .frontend(Frontend::React)
                        .backend(backend)
                        .database(database)
                        .and_then(|b| b.auth(auth))
                        .and_then(|b| b.build());
                    assert_eq!(
                        built.is_ok(),
                        expected_ok,
                        "{backend} + {database} + {auth}"
                    );
                }
            }
        }
    }

    #[test]
    fn request_validation_checks_user_config_last() {
        let sel = StackSelection::builder()
            .frontend(Frontend::React)
            .backend(Backend::Django)
            .database(Database::PostgreSql)
            .unwrap()
            .auth(Auth::Jwt)
            .unwrap()
            .build()
            .unwrap();

        let err = DomainValidator::validate_request(&sel, &UserConfig::default()).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredField {
                field: "db_connection"
            }
        );

        let cfg = UserConfig {
            db_connection: Some("postgresql://localhost/app".into()),
            jwt_secret: Some("secret".into()),
            firebase_project: None,
        };
        DomainValidator::validate_request(&sel, &cfg).unwrap();
    }
}
