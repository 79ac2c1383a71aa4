//! Metadata-driven CRUD helper for PostgreSQL.
//!
//! Record types register their field metadata once, at declaration time, and
//! the crate turns that metadata into literal SQL text for read, insert,
//! update, delete, and count operations — plus a thin async execution layer
//! with result-code outcomes and a batch-insert transaction.
//!
//! Statements carry inline literal values rather than bound parameters;
//! string values are protected by quote doubling only. This keeps generated
//! statements reproducible character-for-character, at the price of ruling
//! out attacker-controlled free text anywhere near a field value.
//!
//! # Quick Start
//!
//! ## Define an entity
//!
//! ```ignore
//! use pg_crud::{Cast, Tag, entity, sql_enum};
//!
//! sql_enum! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//!     pub enum Status {
//!         Pending = 0,
//!         Active = 1,
//!     }
//! }
//!
//! entity! {
//!     tags = [
//!         (password_hash, [Tag::Internal]),
//!         (created_at, [Tag::IgnoreWrite]),
//!         (group_id, [Tag::OptionalFk]),
//!         (status, [Tag::EnumCast(Cast::Int)]),
//!     ],
//!     #[derive(Debug, Clone)]
//!     pub struct UserAccount {
//!         pub id: i64,
//!         pub user_email: String,
//!         pub password_hash: String,
//!         pub created_at: chrono::DateTime<chrono::Utc>,
//!         pub group_id: i32,
//!         pub status: Status,
//!     }
//! }
//! ```
//!
//! ## CRUD operations
//!
//! ```ignore
//! use pg_crud::{Config, Crud, Errno, WhereBuilder};
//!
//! let crud = Crud::new(Config::default());
//!
//! // Insert; the new id comes back with the result code.
//! let (errno, id) = crud.create(&account, None, None).await?;
//! if errno == Errno::DuplicateKey {
//!     // unique-constraint violation, nothing was written
//! }
//!
//! // Read with a filter.
//! let mut wb = WhereBuilder::new();
//! wb.add_clause("status", 1, "=", None, true);
//! wb.set_suffix("ORDER BY id DESC LIMIT 20");
//! let (_, accounts) = crud.read::<UserAccount>(None, Some(&mut wb), None).await?;
//!
//! // Update by id, delete by predicate.
//! crud.update(id, &account, None, None).await?;
//! let mut stale = WhereBuilder::new();
//! stale.add_clause("status", 0, "=", None, true);
//! crud.delete_where::<UserAccount>(Some(&mut stale), false, None).await?;
//! ```
//!
//! ## Batched inserts
//!
//! ```ignore
//! // One transaction; the first failure rolls everything back.
//! let (errno, ids) = crud.create_many(&accounts, None, None).await?;
//! ```
//!
//! ## Statement text without execution
//!
//! ```ignore
//! use pg_crud::query;
//!
//! let sql = query::insert(&account, None)?;
//! // INSERT INTO user_account (user_email, group_id, status)
//! //   VALUES ('ann@example.com', '7', '1') RETURNING id
//! ```
//!
//! Unconditional mutations are refused unless the caller passes an explicit
//! `force` flag, and an allowlist entry naming an unknown field fails fast —
//! both are configuration errors, surfaced before anything executes.

mod casing;
mod crud;
mod entity;
mod error;
mod fields;
mod filter;
pub mod query;
mod value;

pub use casing::{to_column_name, to_field_name};
pub use crud::{Config, Crud};
pub use entity::{Cast, Entity, EntityValues, FetchValue, FieldDescriptor, Tag};
pub use error::{Errno, Error, Result};
pub use fields::{Op, ResolvedField, resolve};
pub use filter::{Conj, WhereBuilder};
pub use value::Value;

// Re-export the driver types that appear in the public API.
pub use tokio_postgres::{Client, Row};

// For macro-expanded code only.
#[doc(hidden)]
pub mod __private {
    pub use crate::entity::{EnumRepr, fetch_enum_repr, row_has_column};
}
