//! Pure SQL text builders.
//!
//! Every function here is a pure function of its inputs: no I/O, no logging.
//! The orchestrator owns both. Generated statements follow a fixed grammar —
//! single spaces, clause order as written — so they can be asserted verbatim
//! in tests.

use crate::entity::{Entity, EntityValues};
use crate::error::{Error, Result};
use crate::fields::{Op, ResolvedField, resolve};
use crate::filter::WhereBuilder;

/// Builds `SELECT c1, c2 FROM t [WHERE …]`.
///
/// Read-mode tags apply; when resolution leaves no columns the statement
/// selects `*`.
///
/// # Errors
///
/// Returns [`Error::UnknownField`] for an allowlist entry the entity does not
/// declare.
pub fn select<E: Entity>(
    wb: Option<&mut WhereBuilder>,
    only_fields: Option<&[&str]>,
) -> Result<String> {
    let resolved = resolve::<E>(Op::Read, only_fields, None)?;
    let columns = if resolved.is_empty() {
        "*".to_string()
    } else {
        column_list(&resolved)
    };

    let mut sql = format!("SELECT {columns} FROM {}", E::table());
    if let Some(wb) = wb {
        sql.push(' ');
        sql.push_str(&wb.render());
    }
    Ok(sql)
}

/// Builds `INSERT INTO t (c1, c2) VALUES ('v1', 'v2') RETURNING …`.
///
/// Write-mode tags apply and the `id` field is always omitted from the
/// column/value lists. The statement ends in `RETURNING id` whenever the type
/// declares an `id` field at all — even when an allowlist excluded it — and
/// in `RETURNING 0` otherwise.
///
/// # Errors
///
/// Returns [`Error::UnknownField`] for an allowlist entry the entity does not
/// declare.
pub fn insert<E: Entity + EntityValues>(
    instance: &E,
    only_fields: Option<&[&str]>,
) -> Result<String> {
    let fields = E::fields();
    let values = instance.values();
    let resolved = resolve::<E>(Op::Write, only_fields, Some(&values))?;

    let mut columns = Vec::with_capacity(resolved.len());
    let mut literals = Vec::with_capacity(resolved.len());
    for field in &resolved {
        if fields[field.index].name == "id" {
            continue;
        }
        columns.push(field.column.clone());
        literals.push(values[field.index].render(fields[field.index].enum_cast()));
    }

    let returning = if fields.iter().any(|f| f.name == "id") {
        "RETURNING id"
    } else {
        "RETURNING 0"
    };

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}) {returning}",
        E::table(),
        columns.join(", "),
        literals.join(", "),
    ))
}

/// Builds `UPDATE t SET c1 = 'v1', c2 = 'v2' WHERE (id = <n>)`.
///
/// # Errors
///
/// Returns [`Error::UnknownField`] for an allowlist entry the entity does not
/// declare.
pub fn update_by_id<E: Entity + EntityValues>(
    id: i64,
    instance: &E,
    only_fields: Option<&[&str]>,
) -> Result<String> {
    let sets = set_clause(instance, only_fields)?;
    Ok(format!("UPDATE {} SET {sets} WHERE (id = {id})", E::table()))
}

/// Builds the predicate form of UPDATE.
///
/// An empty builder is a configuration error unless `force` is set; the
/// forced unconditional form omits the WHERE clause entirely, mirroring the
/// delete safeguard.
///
/// # Errors
///
/// Returns [`Error::UnscopedUpdate`] for an empty builder without `force`,
/// and [`Error::UnknownField`] for an allowlist entry the entity does not
/// declare.
pub fn update_where<E: Entity + EntityValues>(
    wb: &mut WhereBuilder,
    instance: &E,
    only_fields: Option<&[&str]>,
    force: bool,
) -> Result<String> {
    if wb.is_empty() && !force {
        return Err(Error::UnscopedUpdate);
    }

    let sets = set_clause(instance, only_fields)?;
    if wb.is_empty() {
        return Ok(format!("UPDATE {} SET {sets}", E::table()));
    }
    Ok(format!("UPDATE {} SET {sets} {}", E::table(), wb.render()))
}

/// Builds `DELETE FROM t WHERE (id = <n>)`.
#[must_use]
pub fn delete_by_id<E: Entity>(id: i64) -> String {
    format!("DELETE FROM {} WHERE (id = {id})", E::table())
}

/// Builds the predicate form of DELETE.
///
/// A missing clause is a configuration error unless `force` is set; the
/// forced form deletes unconditionally and omits the WHERE clause.
///
/// # Errors
///
/// Returns [`Error::UnscopedDelete`] when no clause is given without `force`.
pub fn delete_where<E: Entity>(
    wb: Option<&mut WhereBuilder>,
    force: bool,
) -> Result<String> {
    match wb {
        Some(wb) => Ok(format!("DELETE FROM {} {}", E::table(), wb.render())),
        None if force => Ok(format!("DELETE FROM {}", E::table())),
        None => Err(Error::UnscopedDelete),
    }
}

/// Builds `SELECT COUNT(id) FROM t [WHERE …]`.
#[must_use]
pub fn count<E: Entity>(wb: Option<&mut WhereBuilder>) -> String {
    match wb {
        Some(wb) => format!("SELECT COUNT(id) FROM {} {}", E::table(), wb.render()),
        None => format!("SELECT COUNT(id) FROM {}", E::table()),
    }
}

fn column_list(resolved: &[ResolvedField]) -> String {
    resolved
        .iter()
        .map(|f| f.column.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn set_clause<E: Entity + EntityValues>(
    instance: &E,
    only_fields: Option<&[&str]>,
) -> Result<String> {
    let fields = E::fields();
    let values = instance.values();
    let resolved = resolve::<E>(Op::Write, only_fields, Some(&values))?;

    let sets: Vec<String> = resolved
        .iter()
        .filter(|field| fields[field.index].name != "id")
        .map(|field| {
            let literal = values[field.index].render(fields[field.index].enum_cast());
            format!("{} = {literal}", field.column)
        })
        .collect();

    Ok(sets.join(", "))
}
