//! Accumulation of boolean filter predicates into a WHERE clause.

use crate::casing::to_column_name;
use crate::value::Value;

/// Conjunction inserted between predicate fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conj {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl Conj {
    const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Mutable accumulator of filter predicates.
///
/// The buffer is seeded with `WHERE (` and gains fragments through
/// [`add_clause`](Self::add_clause) and its sugar; [`render`](Self::render)
/// closes the outer parenthesis exactly once, no matter how often it is
/// called.
///
/// A builder with zero clauses still renders `WHERE ()` — it is not a
/// no-filter marker. Callers that want no filter at all pass no builder.
///
/// # Examples
///
/// ```ignore
/// let mut wb = WhereBuilder::new();
/// wb.add_clause("id", 5, "=", None, true);
/// wb.and("age", 30);
/// wb.set_suffix("ORDER BY id DESC");
/// assert_eq!(wb.render(), "WHERE ((id = '5') AND (age = '30')) ORDER BY id DESC");
/// ```
#[derive(Debug, Clone)]
pub struct WhereBuilder {
    buf: String,
    closed: bool,
    suffix: Option<String>,
    clauses: usize,
}

impl Default for WhereBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WhereBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: String::from("WHERE ("),
            closed: false,
            suffix: None,
            clauses: 0,
        }
    }

    /// True while no clause has been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clauses == 0
    }

    /// Appends one predicate fragment.
    ///
    /// The column runs through the naming converter, so both `UserEmail` and
    /// `user_email` address the same column. `conj` inserts ` AND ` / ` OR `
    /// before the fragment; `scoped` wraps the fragment in its own
    /// parentheses.
    ///
    /// Operators containing `IN` render the value as a raw comma-joined list
    /// with no outer quoting; `BETWEEN` takes the pre-joined `low' AND 'high`
    /// pair and is not re-escaped; every other operator renders one quoted
    /// literal.
    pub fn add_clause(
        &mut self,
        column: &str,
        value: impl Into<Value>,
        op: &str,
        conj: Option<Conj>,
        scoped: bool,
    ) {
        let name = to_column_name(column);
        let value = value.into();

        if let Some(conj) = conj {
            self.buf.push(' ');
            self.buf.push_str(conj.keyword());
            self.buf.push(' ');
        }
        if scoped {
            self.buf.push('(');
        }

        if op.contains("IN") {
            self.buf.push_str(&format!("{name} {op} {}", value.in_list_text()));
        } else if op == "BETWEEN" {
            self.buf.push_str(&format!("{name} {op} '{}'", value.between_text()));
        } else {
            self.buf.push_str(&format!("{name} {op} {}", value.render(None)));
        }

        if scoped {
            self.buf.push(')');
        }
        self.clauses += 1;
    }

    /// Appends an equality fragment conjoined with `AND`.
    pub fn and(&mut self, column: &str, value: impl Into<Value>) {
        self.add_clause(column, value, "=", Some(Conj::And), true);
    }

    /// Appends an equality fragment conjoined with `OR`.
    pub fn or(&mut self, column: &str, value: impl Into<Value>) {
        self.add_clause(column, value, "=", Some(Conj::Or), true);
    }

    /// Appends a `column BETWEEN 'low' AND 'high'` fragment conjoined with
    /// `AND`.
    pub fn and_between(
        &mut self,
        column: &str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) {
        let pair = format!(
            "{}' AND '{}",
            low.into().between_text(),
            high.into().between_text()
        );
        self.add_clause(column, pair, "BETWEEN", Some(Conj::And), true);
    }

    /// Stores raw trailing text appended after the closing parenthesis, e.g.
    /// `ORDER BY id DESC LIMIT 10`. Not escaped; caller-trusted.
    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.suffix = Some(suffix.into());
    }

    /// Renders the accumulated clause as `WHERE (…)` plus the suffix, when
    /// one was set. Idempotent: the outer parenthesis closes exactly once.
    pub fn render(&mut self) -> String {
        if !self.closed {
            self.buf.push(')');
            self.closed = true;
        }
        match &self.suffix {
            Some(suffix) => format!("{} {suffix}", self.buf),
            None => self.buf.clone(),
        }
    }
}
