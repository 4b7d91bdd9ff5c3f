//! Integration tests for stacksmith-core's public API.

use stacksmith_core::domain::{
    Dimension, DomainError, RULES, compatible_auths, compatible_databases, validate_database,
};
use stacksmith_core::prelude::*;

#[test]
fn flask_mongodb_is_rejected_before_anything_is_built() {
    let result = StackSelection::builder()
        .frontend(Frontend::React)
        .backend(Backend::Flask)
        .database(Database::MongoDb);

    let Err(DomainError::IncompatibleStack { violations }) = result else {
        panic!("Flask + MongoDB must be rejected at the database question");
    };
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("Flask"));
    assert!(violations[0].message.contains("MongoDB"));
}

#[test]
fn incremental_database_check_matches_full_validation_minus_auth_rules() {
    for &backend in Backend::ALL {
        for &database in Database::ALL {
            let partial = validate_database(backend, database);
            for &auth in Auth::ALL {
                let full: Vec<_> = validate(backend, database, auth)
                    .into_iter()
                    .filter(|v| !v.concerns(Dimension::Auth))
                    .collect();
                assert_eq!(partial, full, "{backend} + {database} + {auth}");
            }
        }
    }
}

#[test]
fn every_rule_names_at_least_two_dimensions() {
    assert!(RULES.len() >= 5);
    for rule in RULES {
        assert!(rule.dimensions.len() >= 2, "{}", rule.id);
    }
}

#[test]
fn matrix_helpers_agree_with_validation() {
    for &backend in Backend::ALL {
        for database in compatible_databases(backend) {
            for auth in compatible_auths(backend, database) {
                assert!(validate(backend, database, auth).is_empty());
                assert!(has_template(backend, database));
            }
        }
    }
}

#[test]
fn violations_serialize_with_rule_ids() {
    let violations = validate(Backend::Django, Database::PostgreSql, Auth::FirebaseAuth);
    let json = serde_json::to_value(&violations).unwrap();
    assert_eq!(json[0]["rule"], "relational-backend-managed-identity");
    assert_eq!(json[0]["dimensions"], serde_json::json!(["backend", "auth"]));
}
