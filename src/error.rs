//! Error taxonomy and result codes.
//!
//! Two layers are kept strictly apart: [`Error`] covers misconfiguration and
//! programming mistakes, which are fatal and surface as `Err`; [`Errno`]
//! covers storage outcomes, which are recoverable and always returned as
//! values next to the payload.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal errors: configuration and programming mistakes.
///
/// Statement execution failures never land here — they are classified into an
/// [`Errno`] by the orchestrator.
#[derive(Debug, Error)]
pub enum Error {
    /// An allowlist entry named a field the entity does not declare.
    #[error("entity `{entity}` has no field `{field}`")]
    UnknownField {
        /// The entity type name.
        entity: &'static str,
        /// The allowlist entry that failed to match.
        field: String,
    },

    /// `delete_where` was called without a clause and without `force`.
    #[error("DELETE FROM without a where clause; set `force` if this is intended")]
    UnscopedDelete,

    /// `update_where` was called with an empty builder and without `force`.
    #[error("UPDATE without any where clause; set `force` if this is intended")]
    UnscopedUpdate,

    /// The configured environment variable held no connection string.
    #[error("no connection string found in `{0}`")]
    MissingConnString(String),

    /// Opening the database connection failed.
    #[error("failed to open connection: {0}")]
    Connect(#[source] tokio_postgres::Error),

    /// A result column could not be converted into the entity's field type.
    #[error("failed to decode column `{column}`: {source}")]
    Decode {
        /// The column that failed to convert.
        column: String,
        /// The underlying driver error.
        #[source]
        source: tokio_postgres::Error,
    },

    /// A database value matched no declared variant of a `sql_enum!` type.
    #[error("no variant of `{ty}` matches database value `{value}`")]
    UnknownVariant {
        /// The enum type name.
        ty: &'static str,
        /// The offending database value.
        value: String,
    },
}

/// Outcome code returned alongside the payload of every orchestrator call.
///
/// The payload is absent, empty, zero, or `false` whenever the code is not
/// [`Errno::Ok`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    /// The statement executed successfully.
    Ok,
    /// The store rejected the statement for any reason other than a
    /// unique-constraint violation.
    Generic,
    /// The store reported a unique-constraint violation (SQLSTATE 23505).
    DuplicateKey,
}
