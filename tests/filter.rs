//! Where-clause builder tests.

use pg_crud::{Conj, Value, WhereBuilder};
use pretty_assertions::assert_eq;

#[test]
fn single_clause_is_scoped() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("id", 5, "=", None, true);
    assert_eq!(wb.render(), "WHERE ((id = '5'))");
}

#[test]
fn unscoped_clause_has_no_inner_parentheses() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("id", 5, "=", None, false);
    assert_eq!(wb.render(), "WHERE (id = '5')");
}

#[test]
fn and_or_conjoin_fragments() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("id", 5, "=", None, true);
    wb.and("age", 30);
    wb.or("name", "Ann");
    assert_eq!(
        wb.render(),
        "WHERE ((id = '5') AND (age = '30') OR (name = 'Ann'))"
    );
}

#[test]
fn column_names_run_through_the_converter() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("UserEmail", "ann@example.com", "=", None, true);
    assert_eq!(wb.render(), "WHERE ((user_email = 'ann@example.com'))");
}

#[test]
fn in_renders_a_raw_list() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("status", vec![1, 2, 3], "IN", None, true);
    assert_eq!(wb.render(), "WHERE ((status IN 1, 2, 3))");
}

#[test]
fn not_in_takes_the_same_path() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("status", vec![4, 5], "NOT IN", None, true);
    assert_eq!(wb.render(), "WHERE ((status NOT IN 4, 5))");
}

#[test]
fn and_between_renders_the_pair() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("id", 1, "=", None, true);
    wb.and_between("age", 18, 30);
    assert_eq!(
        wb.render(),
        "WHERE ((id = '1') AND (age BETWEEN '18' AND '30'))"
    );
}

#[test]
fn between_values_are_not_reescaped() {
    // A re-escape would double the pair's interior quotes into ''.
    let mut wb = WhereBuilder::new();
    wb.add_clause("id", 1, "=", None, true);
    wb.and_between("label", "a", "b");
    assert_eq!(
        wb.render(),
        "WHERE ((id = '1') AND (label BETWEEN 'a' AND 'b'))"
    );
}

#[test]
fn explicit_conjunction_on_add_clause() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("id", 1, "=", None, true);
    wb.add_clause("age", 21, ">", Some(Conj::And), true);
    assert_eq!(wb.render(), "WHERE ((id = '1') AND (age > '21'))");
}

#[test]
fn null_renders_unquoted() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("parent_id", Value::Null, "=", None, true);
    assert_eq!(wb.render(), "WHERE ((parent_id = NULL))");
}

#[test]
fn text_values_are_escaped() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("name", "O'Hara", "=", None, true);
    assert_eq!(wb.render(), "WHERE ((name = 'O''Hara'))");
}

#[test]
fn suffix_lands_after_the_closing_parenthesis() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("age", 18, ">", None, true);
    wb.set_suffix("ORDER BY id DESC LIMIT 10");
    assert_eq!(wb.render(), "WHERE ((age > '18')) ORDER BY id DESC LIMIT 10");
}

#[test]
fn empty_builder_still_emits_where() {
    let mut wb = WhereBuilder::new();
    assert!(wb.is_empty());
    assert_eq!(wb.render(), "WHERE ()");
}

#[test]
fn render_is_idempotent() {
    let mut wb = WhereBuilder::new();
    wb.add_clause("id", 5, "=", None, true);
    let first = wb.render();
    let second = wb.render();
    assert_eq!(first, second);
    assert_eq!(second, "WHERE ((id = '5'))");
}
