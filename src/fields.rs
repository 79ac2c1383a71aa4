//! Field metadata resolution: which declared fields participate in an
//! operation, and under which column expression.

use crate::casing::{to_column_name, to_field_name};
use crate::entity::{Entity, Tag};
use crate::error::{Error, Result};
use crate::value::Value;

/// Gates which field tags apply during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// SELECT column lists.
    Read,
    /// INSERT/UPDATE column lists.
    Write,
}

/// One participating field: its rendered column expression and the index of
/// its descriptor in declaration order.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// The column expression as it appears in the statement.
    pub column: String,
    /// Index into [`Entity::fields`] (and the parallel value list).
    pub index: usize,
}

/// Resolves the ordered participating fields of `E` for `op`.
///
/// Allowlist entries are normalized to the field-name convention before
/// matching, so both `UserEmail` and `user_email` select the same field. For
/// writes, `values` (declaration-order, parallel to the descriptors) drives
/// the `optional_fk` zero-omission check; reads rewrite `optional_fk` columns
/// to coalesce a database NULL back to zero, aliased to the original name.
///
/// The resolver is stateless and allocates fresh output per call.
///
/// # Errors
///
/// Returns [`Error::UnknownField`] when an allowlist entry names a field the
/// entity does not declare.
pub fn resolve<E: Entity>(
    op: Op,
    allowlist: Option<&[&str]>,
    values: Option<&[Value]>,
) -> Result<Vec<ResolvedField>> {
    let fields = E::fields();

    let allowlist: Option<Vec<String>> = match allowlist {
        None => None,
        Some(names) => {
            let mut normalized = Vec::with_capacity(names.len());
            for name in names {
                let field_name = to_field_name(&to_column_name(name));
                if !fields.iter().any(|f| to_field_name(f.name) == field_name) {
                    return Err(Error::UnknownField {
                        entity: E::NAME,
                        field: (*name).to_string(),
                    });
                }
                normalized.push(field_name);
            }
            Some(normalized)
        }
    };

    let mut resolved = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        if let Some(allow) = &allowlist {
            if !allow.iter().any(|name| *name == to_field_name(field.name)) {
                continue;
            }
        }
        if field.has(Tag::Internal) {
            continue;
        }

        let column = match op {
            Op::Read => {
                if field.has(Tag::IgnoreRead) {
                    continue;
                }
                if field.has(Tag::OptionalFk) {
                    format!("coalesce({0}::int, 0) AS {0}", field.name)
                } else {
                    field.name.to_string()
                }
            }
            Op::Write => {
                if field.has(Tag::IgnoreWrite) {
                    continue;
                }
                let zero = values
                    .is_some_and(|values| values.get(index).is_some_and(Value::is_zero));
                if field.has(Tag::OptionalFk) && zero {
                    continue;
                }
                field.name.to_string()
            }
        };

        resolved.push(ResolvedField { column, index });
    }

    Ok(resolved)
}
