//! SQL literal values and their rendering.
//!
//! This crate composes statements out of literal text rather than bound
//! parameters, so every value that reaches a statement goes through the
//! rendering rules here: text is escaped by doubling embedded single quotes,
//! null renders as the bare `NULL` keyword, lists render as raw comma-joined
//! items for `IN`, and everything else renders as its canonical text wrapped
//! in single quotes.
//!
//! Because values are inlined, quote doubling is the *only* defense on string
//! fields — never route attacker-controlled free text around it. Numeric and
//! enum-typed fields are inherently safe.

use chrono::{DateTime, NaiveDate, Utc};

use crate::entity::Cast;

/// A value destined for a SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Database null; renders as unquoted `NULL`.
    Null,
    /// Boolean; renders as `'true'` / `'false'`.
    Bool(bool),
    /// 16-bit integer.
    SmallInt(i16),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    BigInt(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Text; embedded single quotes are doubled on render.
    Text(String),
    /// UTC timestamp; renders as RFC 3339.
    Timestamp(DateTime<Utc>),
    /// Calendar date; renders as `%Y-%m-%d`.
    Date(NaiveDate),
    /// JSON document; renders as its serialized text, escaped like text.
    Json(serde_json::Value),
    /// A database-backed enum carrying both representations; renders as the
    /// label unless an `enum_cast` tag asks for the numeric code.
    Enum {
        /// The variant name.
        label: &'static str,
        /// The variant's numeric code.
        code: i64,
    },
    /// Comma-joined raw list, used by `IN` clauses.
    List(Vec<Value>),
}

impl Value {
    /// True for the zero value of the integer variants. Drives the
    /// `optional_fk` write-omission check.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        matches!(self, Self::SmallInt(0) | Self::Int(0) | Self::BigInt(0))
    }

    /// Canonical unquoted, unescaped text for this value.
    fn text(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(v) => v.to_string(),
            Self::SmallInt(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::BigInt(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Text(v) => v.clone(),
            Self::Timestamp(v) => v.to_rfc3339(),
            Self::Date(v) => v.format("%Y-%m-%d").to_string(),
            Self::Json(v) => v.to_string(),
            Self::Enum { label, .. } => (*label).to_string(),
            Self::List(items) => items.iter().map(Self::text).collect::<Vec<_>>().join(", "),
        }
    }

    /// The final SQL literal: a quoted escaped scalar, the bare `NULL`
    /// keyword, or a raw comma-joined list.
    #[must_use]
    pub fn render(&self, cast: Option<Cast>) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::List(_) => self.in_list_text(),
            Self::Enum { label, code } => match cast {
                Some(Cast::SmallInt | Cast::Int | Cast::BigInt) => format!("'{code}'"),
                None => format!("'{}'", escape(label)),
            },
            Self::Text(v) => format!("'{}'", escape(v)),
            Self::Json(v) => format!("'{}'", escape(&v.to_string())),
            other => format!("'{}'", other.text()),
        }
    }

    /// Raw list text for `IN` clauses: comma-joined items with no outer
    /// quoting and no per-item quoting; text items are still escaped.
    pub(crate) fn in_list_text(&self) -> String {
        match self {
            Self::List(items) => {
                items.iter().map(Self::in_list_text).collect::<Vec<_>>().join(", ")
            }
            Self::Text(v) => escape(v),
            other => other.text(),
        }
    }

    /// Pre-joined `BETWEEN` pair text. Never re-escaped: the pair carries its
    /// own interior quotes.
    pub(crate) fn between_text(&self) -> String {
        self.text()
    }
}

/// Doubles embedded single quotes.
fn escape(s: &str) -> String {
    s.replace('\'', "''")
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::SmallInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::BigInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
