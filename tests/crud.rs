//! Orchestrator guard tests.
//!
//! Statement text is built before any connection is opened, so every guard
//! here fails fast without a database. Outcome mapping against a live store
//! is exercised by the grammar tests plus the driver's own behaviour.

mod common;

use common::{User, ann};
use pg_crud::{Config, Crud, Error, WhereBuilder};

fn crud() -> Crud {
    // Points at an environment variable that is never set; any test that
    // reaches the connection step fails with MissingConnString instead.
    Crud::new(Config::new("PG_CRUD_TEST_UNSET"))
}

#[tokio::test]
async fn delete_where_without_clause_is_refused() {
    let err = crud().delete_where::<User>(None, false, None).await.unwrap_err();
    assert!(matches!(err, Error::UnscopedDelete));
}

#[tokio::test]
async fn update_where_with_empty_builder_is_refused() {
    let mut wb = WhereBuilder::new();
    let err = crud()
        .update_where(&mut wb, &ann(), None, false, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnscopedUpdate));
}

#[tokio::test]
async fn unknown_allowlist_field_fails_before_connecting() {
    let err = crud()
        .read::<User>(Some(&["nope"]), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownField { .. }));
}

#[tokio::test]
async fn batch_configuration_error_fails_before_any_transaction() {
    let batch = vec![ann(), ann()];
    let err = crud()
        .create_many(&batch, Some(&["nope"]), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnknownField { .. }));
}

#[tokio::test]
async fn missing_connection_string_is_fatal() {
    let err = crud().count::<User>(None, None).await.unwrap_err();
    assert!(matches!(err, Error::MissingConnString(var) if var == "PG_CRUD_TEST_UNSET"));
}
