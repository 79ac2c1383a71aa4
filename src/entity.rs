//! Registered record metadata: the [`Entity`] trait, field descriptors and
//! tags, row extraction, and the [`entity!`] / [`sql_enum!`] declaration
//! macros.
//!
//! Field metadata is plain data registered at declaration time — there is no
//! runtime reflection. Each record type carries an ordered list of
//! [`FieldDescriptor`]s; the resolver and the statement builders are pure
//! functions over that list.

use chrono::{DateTime, NaiveDate, Utc};
use tokio_postgres::Row;

use crate::error::{Error, Result};
use crate::value::Value;

/// Field annotations applied by the metadata resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Excluded from INSERT/UPDATE column lists.
    IgnoreWrite,
    /// Excluded from SELECT column lists.
    IgnoreRead,
    /// Excluded from every operation.
    Internal,
    /// Omitted from writes while the value is zero; reads coalesce a
    /// database NULL back to zero.
    OptionalFk,
    /// The enum value is cast to the target type before rendering on writes.
    EnumCast(Cast),
}

/// Numeric target of an [`Tag::EnumCast`] annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    /// 16-bit integer column.
    SmallInt,
    /// 32-bit integer column.
    Int,
    /// 64-bit integer column.
    BigInt,
}

/// One declared field: its column-convention name and its tag set.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// The snake_case field identifier, which doubles as the column name.
    pub name: &'static str,
    /// The field's annotations, order-independent.
    pub tags: Vec<Tag>,
}

impl FieldDescriptor {
    /// Creates a descriptor with no tags.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name, tags: Vec::new() }
    }

    /// True when the field carries `tag`.
    #[must_use]
    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// The enum cast target, when an [`Tag::EnumCast`] tag is present.
    #[must_use]
    pub fn enum_cast(&self) -> Option<Cast> {
        self.tags.iter().find_map(|tag| match tag {
            Tag::EnumCast(cast) => Some(*cast),
            _ => None,
        })
    }
}

/// Trait for record types with registered field metadata.
///
/// Typically implemented via the [`entity!`] macro rather than manually.
pub trait Entity: Sized {
    /// The PascalCase type name; the table name derives from it.
    const NAME: &'static str;

    /// Ordered descriptors for every declared field. A fresh list is
    /// allocated per call; nothing is cached or shared.
    fn fields() -> Vec<FieldDescriptor>;

    /// Materializes an instance from a result row. Declared fields absent
    /// from the result set take their [`FetchValue::missing`] value.
    ///
    /// # Errors
    ///
    /// Returns an error if a returned column cannot be converted into the
    /// field's type.
    fn from_row(row: &Row) -> Result<Self>;

    /// The snake_case table name.
    #[must_use]
    fn table() -> String {
        crate::casing::to_column_name(Self::NAME)
    }
}

/// Declaration-order values for write operations, parallel to
/// [`Entity::fields`]. Implemented by the [`entity!`] macro.
pub trait EntityValues {
    /// One value per declared field, in declaration order.
    fn values(&self) -> Vec<Value>;
}

/// Extraction of one typed value from a result row.
///
/// Implemented for the standard column types; [`sql_enum!`] implements it for
/// database-backed enums.
pub trait FetchValue: Sized {
    /// Fetches the column `col` from the row.
    ///
    /// # Errors
    ///
    /// Returns an error if the column exists but cannot be converted to the
    /// target type.
    fn fetch(row: &Row, col: &str) -> Result<Self>;

    /// The value used when the column is not part of the result set.
    fn missing() -> Self;
}

fn get<'a, T: tokio_postgres::types::FromSql<'a>>(row: &'a Row, col: &str) -> Result<T> {
    row.try_get(col).map_err(|e| Error::Decode { column: col.to_string(), source: e })
}

macro_rules! fetch_impl {
    ($ty:ty, $missing:expr) => {
        impl FetchValue for $ty {
            fn fetch(row: &Row, col: &str) -> Result<Self> {
                get(row, col)
            }

            fn missing() -> Self {
                $missing
            }
        }
    };
}

fetch_impl!(bool, false);
fetch_impl!(i16, 0);
fetch_impl!(i32, 0);
fetch_impl!(i64, 0);
fetch_impl!(f32, 0.0);
fetch_impl!(f64, 0.0);
fetch_impl!(String, String::new());
fetch_impl!(DateTime<Utc>, DateTime::UNIX_EPOCH);
fetch_impl!(NaiveDate, NaiveDate::default());
fetch_impl!(serde_json::Value, serde_json::Value::Null);

impl<T> FetchValue for Option<T>
where
    T: for<'a> tokio_postgres::types::FromSql<'a>,
{
    fn fetch(row: &Row, col: &str) -> Result<Self> {
        get(row, col)
    }

    fn missing() -> Self {
        None
    }
}

/// True when the row's result set contains a column named `col`.
#[doc(hidden)]
#[must_use]
pub fn row_has_column(row: &Row, col: &str) -> bool {
    row.columns().iter().any(|column| column.name() == col)
}

/// Either representation a database may hand back for an enum column.
#[doc(hidden)]
#[derive(Debug)]
pub enum EnumRepr {
    Code(i64),
    Label(String),
}

/// Fetches an enum column as either an integer code or a text label.
#[doc(hidden)]
pub fn fetch_enum_repr(row: &Row, col: &str) -> Result<EnumRepr> {
    if let Ok(code) = row.try_get::<_, i64>(col) {
        return Ok(EnumRepr::Code(code));
    }
    if let Ok(code) = row.try_get::<_, i32>(col) {
        return Ok(EnumRepr::Code(i64::from(code)));
    }
    if let Ok(code) = row.try_get::<_, i16>(col) {
        return Ok(EnumRepr::Code(i64::from(code)));
    }
    row.try_get::<_, String>(col)
        .map(EnumRepr::Label)
        .map_err(|e| Error::Decode { column: col.to_string(), source: e })
}

/// Declares a record type with registered field descriptors.
///
/// The optional `tags` header attaches annotations to named fields; the
/// [`Tag`] and [`Cast`] variants are written out as ordinary expressions.
///
/// # Examples
///
/// ```ignore
/// use pg_crud::{Cast, Tag, entity};
///
/// entity! {
///     tags = [
///         (password_hash, [Tag::Internal]),
///         (created_at, [Tag::IgnoreWrite]),
///         (group_id, [Tag::OptionalFk]),
///         (status, [Tag::EnumCast(Cast::Int)]),
///     ],
///     #[derive(Debug, Clone)]
///     pub struct UserAccount {
///         pub id: i64,
///         pub user_email: String,
///         pub password_hash: String,
///         pub created_at: chrono::DateTime<chrono::Utc>,
///         pub group_id: i32,
///         pub status: Status,
///     }
/// }
/// ```
///
/// The struct's field types must implement `Clone`, `Into<Value>`, and
/// [`FetchValue`]; the table name derives from the type name
/// (`UserAccount` → `user_account`).
#[macro_export]
macro_rules! entity {
    (
        tags = [$( ($tag_field:ident, [$($tag:expr),* $(,)?]) ),* $(,)?],
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $field_ty
            ),*
        }

        impl $crate::Entity for $name {
            const NAME: &'static str = stringify!($name);

            fn fields() -> Vec<$crate::FieldDescriptor> {
                #[allow(unused_mut)]
                let mut fields = vec![
                    $( $crate::FieldDescriptor::new(stringify!($field)) ),*
                ];
                $(
                    if let Some(field) =
                        fields.iter_mut().find(|f| f.name == stringify!($tag_field))
                    {
                        field.tags = vec![$($tag),*];
                    }
                )*
                fields
            }

            fn from_row(row: &$crate::Row) -> $crate::Result<Self> {
                Ok(Self {
                    $(
                        $field: if $crate::__private::row_has_column(row, stringify!($field)) {
                            <$field_ty as $crate::FetchValue>::fetch(row, stringify!($field))?
                        } else {
                            <$field_ty as $crate::FetchValue>::missing()
                        },
                    )*
                })
            }
        }

        impl $crate::EntityValues for $name {
            fn values(&self) -> Vec<$crate::Value> {
                vec![ $( self.$field.clone().into() ),* ]
            }
        }
    };

    // No tags header → forward with an empty tag list.
    (
        $(#[$meta:meta])*
        pub struct $name:ident { $($rest:tt)* }
    ) => {
        $crate::entity! {
            tags = [],
            $(#[$meta])*
            pub struct $name { $($rest)* }
        }
    };
}

/// Declares a database-backed enum with explicit numeric codes.
///
/// Implements `From<E> for Value` carrying both the variant label and its
/// code (an `enum_cast` tag on the field picks which one is rendered), and
/// [`FetchValue`] accepting either integer codes or text labels from the
/// database. The first variant is the [`FetchValue::missing`] value.
///
/// # Examples
///
/// ```ignore
/// use pg_crud::sql_enum;
///
/// sql_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum Status {
///         Pending = 0,
///         Active = 1,
///         Disabled = 2,
///     }
/// }
/// ```
#[macro_export]
macro_rules! sql_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $first:ident = $first_code:literal
            $(, $variant:ident = $code:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $first = $first_code,
            $( $variant = $code ),*
        }

        impl From<$name> for $crate::Value {
            fn from(value: $name) -> Self {
                match value {
                    $name::$first => Self::Enum {
                        label: stringify!($first),
                        code: $first_code,
                    },
                    $(
                        $name::$variant => Self::Enum {
                            label: stringify!($variant),
                            code: $code,
                        },
                    )*
                }
            }
        }

        impl $crate::FetchValue for $name {
            fn fetch(row: &$crate::Row, col: &str) -> $crate::Result<Self> {
                match $crate::__private::fetch_enum_repr(row, col)? {
                    $crate::__private::EnumRepr::Code(code) => match code {
                        $first_code => Ok(Self::$first),
                        $( $code => Ok(Self::$variant), )*
                        other => Err($crate::Error::UnknownVariant {
                            ty: stringify!($name),
                            value: other.to_string(),
                        }),
                    },
                    $crate::__private::EnumRepr::Label(label) => {
                        if label == stringify!($first) {
                            Ok(Self::$first)
                        }
                        $( else if label == stringify!($variant) {
                            Ok(Self::$variant)
                        } )*
                        else {
                            Err($crate::Error::UnknownVariant {
                                ty: stringify!($name),
                                value: label,
                            })
                        }
                    }
                }
            }

            fn missing() -> Self {
                Self::$first
            }
        }
    };
}
