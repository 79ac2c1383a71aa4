//! Statement-grammar tests: generated SQL is asserted verbatim, spacing and
//! clause order included.

mod common;

use common::{LogLine, User, account, ann};
use pg_crud::{Entity, Error, WhereBuilder, query};
use pretty_assertions::assert_eq;

// SELECT

#[test]
fn select_lists_read_columns() {
    let sql = query::select::<User>(None, None).unwrap();
    assert_eq!(sql, "SELECT id, name, age FROM user");
}

#[test]
fn select_applies_read_tags() {
    let sql = query::select::<common::UserAccount>(None, None).unwrap();
    assert_eq!(
        sql,
        "SELECT id, user_email, created_at, coalesce(group_id::int, 0) AS group_id, status \
         FROM user_account"
    );
}

#[test]
fn select_appends_where_clause() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("id", 5, "=", None, true);
    let sql = query::select::<User>(Some(&mut wb), None).unwrap();
    assert_eq!(sql, "SELECT id, name, age FROM user WHERE ((id = '5'))");
}

#[test]
fn select_honors_allowlist_in_either_convention() {
    let sql = query::select::<User>(None, Some(&["name"])).unwrap();
    assert_eq!(sql, "SELECT name FROM user");

    let sql = query::select::<common::UserAccount>(None, Some(&["UserEmail"])).unwrap();
    assert_eq!(sql, "SELECT user_email FROM user_account");
}

#[test]
fn select_unknown_allowlist_field_is_fatal() {
    let err = query::select::<User>(None, Some(&["nope"])).unwrap_err();
    assert!(matches!(err, Error::UnknownField { entity: "User", .. }));
}

// INSERT

#[test]
fn insert_omits_id_and_returns_it() {
    let sql = query::insert(&ann(), None).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO user (name, age) VALUES ('Ann', '30') RETURNING id"
    );
}

#[test]
fn insert_returns_id_even_when_allowlist_excludes_it() {
    let sql = query::insert(&ann(), Some(&["name"])).unwrap();
    assert_eq!(sql, "INSERT INTO user (name) VALUES ('Ann') RETURNING id");
}

#[test]
fn insert_without_id_field_returns_zero() {
    let line = LogLine {
        message: "boot".to_string(),
    };
    let sql = query::insert(&line, None).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO log_line (message) VALUES ('boot') RETURNING 0"
    );
}

#[test]
fn insert_escapes_embedded_quotes() {
    let mut user = ann();
    user.name = "O'Hara".to_string();
    let sql = query::insert(&user, None).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO user (name, age) VALUES ('O''Hara', '30') RETURNING id"
    );
}

#[test]
fn insert_omits_zero_optional_fk_and_casts_enum() {
    // Write-mode tags: password_hash is internal, created_at ignored on
    // write, search_rank still written; group_id of 0 omitted.
    let sql = query::insert(&account(0), None).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO user_account (user_email, search_rank, status) \
         VALUES ('ann@example.com', '0.5', '1') RETURNING id"
    );
}

#[test]
fn insert_keeps_nonzero_optional_fk() {
    let sql = query::insert(&account(7), None).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO user_account (user_email, search_rank, group_id, status) \
         VALUES ('ann@example.com', '0.5', '7', '1') RETURNING id"
    );
}

// UPDATE

#[test]
fn update_by_id_sets_write_columns() {
    let sql = query::update_by_id(9, &ann(), None).unwrap();
    assert_eq!(sql, "UPDATE user SET name = 'Ann', age = '30' WHERE (id = 9)");
}

#[test]
fn update_where_renders_the_clause() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("age", 18, ">", None, true);
    let sql = query::update_where(&mut wb, &ann(), None, false).unwrap();
    assert_eq!(
        sql,
        "UPDATE user SET name = 'Ann', age = '30' WHERE ((age > '18'))"
    );
}

#[test]
fn update_where_empty_builder_requires_force() {
    let mut wb = WhereBuilder::new();
    let err = query::update_where(&mut wb, &ann(), None, false).unwrap_err();
    assert!(matches!(err, Error::UnscopedUpdate));

    let mut wb = WhereBuilder::new();
    let sql = query::update_where(&mut wb, &ann(), None, true).unwrap();
    assert_eq!(sql, "UPDATE user SET name = 'Ann', age = '30'");
}

// DELETE

#[test]
fn delete_by_id_targets_one_row() {
    assert_eq!(query::delete_by_id::<User>(3), "DELETE FROM user WHERE (id = 3)");
}

#[test]
fn delete_where_requires_force_without_a_clause() {
    let err = query::delete_where::<User>(None, false).unwrap_err();
    assert!(matches!(err, Error::UnscopedDelete));

    let sql = query::delete_where::<User>(None, true).unwrap();
    assert_eq!(sql, "DELETE FROM user");
}

#[test]
fn delete_where_renders_the_clause() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("age", 99, "<", None, true);
    let sql = query::delete_where::<User>(Some(&mut wb), false).unwrap();
    assert_eq!(sql, "DELETE FROM user WHERE ((age < '99'))");
}

// COUNT

#[test]
fn count_with_and_without_clause() {
    assert_eq!(query::count::<User>(None), "SELECT COUNT(id) FROM user");

    let mut wb = WhereBuilder::new();
    wb.add_clause("age", 18, ">=", None, true);
    assert_eq!(
        query::count::<User>(Some(&mut wb)),
        "SELECT COUNT(id) FROM user WHERE ((age >= '18'))"
    );
}

// Table naming

#[test]
fn table_names_derive_from_type_names() {
    assert_eq!(User::table(), "user");
    assert_eq!(common::UserAccount::table(), "user_account");
    assert_eq!(LogLine::table(), "log_line");
}
