//! CRUD orchestration: connection lifecycle, statement execution, outcome
//! classification, and the batch-insert transaction.
//!
//! This is the only module that touches a live connection. Statement text is
//! always built first, so configuration errors fail before a connection is
//! ever opened or a statement executed; storage failures are classified into
//! [`Errno`] values and never escape as errors.

use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};

use crate::entity::{Entity, EntityValues};
use crate::error::{Errno, Error, Result};
use crate::filter::WhereBuilder;
use crate::query;
use crate::value::Value;

/// Connection configuration: the name of the environment variable holding
/// the PostgreSQL connection string.
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment variable looked up when the orchestrator opens its own
    /// connection.
    pub conn_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            conn_env: "DATABASE_URL".to_string(),
        }
    }
}

impl Config {
    /// Creates a configuration reading the connection string from `conn_env`.
    pub fn new(conn_env: impl Into<String>) -> Self {
        Self {
            conn_env: conn_env.into(),
        }
    }

    /// Opens a connection from the configured environment variable. The
    /// connection task is spawned onto the current runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConnString`] when the variable is unset or
    /// empty, and [`Error::Connect`] when the connection cannot be opened.
    pub async fn open(&self) -> Result<Client> {
        let connstr = std::env::var(&self.conn_env).unwrap_or_default();
        if connstr.is_empty() {
            return Err(Error::MissingConnString(self.conn_env.clone()));
        }

        let (client, connection) = tokio_postgres::connect(&connstr, NoTls)
            .await
            .map_err(Error::Connect)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "connection task failed");
            }
        });

        Ok(client)
    }
}

enum Handle<'a> {
    Borrowed(&'a mut Client),
    Owned(Client),
}

impl Handle<'_> {
    fn client(&mut self) -> &mut Client {
        match self {
            Self::Borrowed(client) => client,
            Self::Owned(client) => client,
        }
    }
}

/// High-level CRUD operations over registered entities.
///
/// Every operation accepts an optional caller connection. With one supplied,
/// the orchestrator never closes it and starts no transaction beyond the
/// explicit batch-create one. Without one, a connection is opened from the
/// [`Config`] and owned for exactly that call — it is released on every exit
/// path when the handle drops.
#[derive(Debug, Clone)]
pub struct Crud {
    config: Config,
}

impl Crud {
    /// Creates an orchestrator with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    async fn acquire<'a>(&self, conn: Option<&'a mut Client>) -> Result<Handle<'a>> {
        match conn {
            Some(client) => Ok(Handle::Borrowed(client)),
            None => Ok(Handle::Owned(self.config.open().await?)),
        }
    }

    /// Reads every row matching the clause.
    ///
    /// Storage failure yields `(Errno::Generic, vec![])`.
    ///
    /// # Errors
    ///
    /// Configuration problems and row-decode mismatches are fatal.
    pub async fn read<E: Entity>(
        &self,
        only_fields: Option<&[&str]>,
        wb: Option<&mut WhereBuilder>,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, Vec<E>)> {
        let sql = query::select::<E>(wb, only_fields)?;
        self.query_rows(&sql, "read", conn).await
    }

    /// Reads the first row matching the clause, if any.
    ///
    /// # Errors
    ///
    /// Configuration problems and row-decode mismatches are fatal.
    pub async fn read_first<E: Entity>(
        &self,
        only_fields: Option<&[&str]>,
        wb: Option<&mut WhereBuilder>,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, Option<E>)> {
        let sql = query::select::<E>(wb, only_fields)?;
        let (errno, mut rows) = self.query_rows::<E>(&sql, "read_first", conn).await?;
        let first = if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        };
        Ok((errno, first))
    }

    /// Reads the row with the given id, routed through a one-clause builder.
    ///
    /// # Errors
    ///
    /// Configuration problems and row-decode mismatches are fatal.
    pub async fn read_first_by_id<E: Entity>(
        &self,
        id: i64,
        only_fields: Option<&[&str]>,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, Option<E>)> {
        let mut wb = WhereBuilder::new();
        wb.add_clause("id", id, "=", None, true);
        self.read_first(only_fields, Some(&mut wb), conn).await
    }

    /// Inserts one row and returns the new identifier.
    ///
    /// A unique-constraint violation yields `(Errno::DuplicateKey, 0)`; any
    /// other storage failure yields `(Errno::Generic, 0)`.
    ///
    /// # Errors
    ///
    /// Configuration problems are fatal.
    pub async fn create<E: Entity + EntityValues>(
        &self,
        instance: &E,
        only_fields: Option<&[&str]>,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, i64)> {
        let sql = query::insert(instance, only_fields)?;
        let mut handle = self.acquire(conn).await?;
        tracing::debug!(table = %E::table(), sql = %sql, "create");

        match handle.client().query_one(&sql, &[]).await {
            Ok(row) => Ok((Errno::Ok, scalar_i64(&row)?)),
            Err(e) => {
                tracing::error!(error = %e, sql = %sql, "create failed");
                Ok((classify(&e), 0))
            }
        }
    }

    /// Inserts each row inside a single transaction, sequentially, in input
    /// order.
    ///
    /// The first failure rolls the whole transaction back and returns
    /// `(Errno::DuplicateKey | Errno::Generic, None)` — no partial
    /// application is observable. Full success commits and returns the new
    /// identifiers in input order.
    ///
    /// # Errors
    ///
    /// Configuration problems are fatal and surface before the transaction
    /// starts.
    pub async fn create_many<E: Entity + EntityValues>(
        &self,
        instances: &[E],
        only_fields: Option<&[&str]>,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, Option<Vec<i64>>)> {
        // Build every statement up front so a configuration error cannot
        // leave a transaction half-applied.
        let mut statements = Vec::with_capacity(instances.len());
        for instance in instances {
            statements.push(query::insert(instance, only_fields)?);
        }

        let mut handle = self.acquire(conn).await?;
        let tx = match handle.client().transaction().await {
            Ok(tx) => tx,
            Err(e) => {
                tracing::error!(error = %e, "failed to open batch transaction");
                return Ok((Errno::Generic, None));
            }
        };

        let mut ids = Vec::with_capacity(statements.len());
        for sql in &statements {
            tracing::debug!(table = %E::table(), sql = %sql, "create batch");
            match tx.query_one(sql, &[]).await {
                Ok(row) => ids.push(scalar_i64(&row)?),
                Err(e) => {
                    tracing::error!(error = %e, sql = %sql, "batch create failed, rolling back");
                    let errno = classify(&e);
                    if let Err(e) = tx.rollback().await {
                        tracing::error!(error = %e, "rollback failed");
                    }
                    return Ok((errno, None));
                }
            }
        }

        match tx.commit().await {
            Ok(()) => Ok((Errno::Ok, Some(ids))),
            Err(e) => {
                tracing::error!(error = %e, "batch commit failed");
                Ok((Errno::Generic, None))
            }
        }
    }

    /// Updates the row with the given id; true iff exactly one row was
    /// affected.
    ///
    /// # Errors
    ///
    /// Configuration problems are fatal.
    pub async fn update<E: Entity + EntityValues>(
        &self,
        id: i64,
        instance: &E,
        only_fields: Option<&[&str]>,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, bool)> {
        let sql = query::update_by_id(id, instance, only_fields)?;
        let (errno, affected) = self.execute_logged(&E::table(), "update", &sql, conn).await?;
        Ok((errno, errno == Errno::Ok && affected == 1))
    }

    /// Updates every row matching the clause; true iff at least one row was
    /// affected.
    ///
    /// # Errors
    ///
    /// An empty builder without `force` is a fatal configuration error,
    /// surfaced before anything executes.
    pub async fn update_where<E: Entity + EntityValues>(
        &self,
        wb: &mut WhereBuilder,
        instance: &E,
        only_fields: Option<&[&str]>,
        force: bool,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, bool)> {
        let sql = query::update_where(wb, instance, only_fields, force)?;
        let (errno, affected) = self.execute_logged(&E::table(), "update", &sql, conn).await?;
        Ok((errno, errno == Errno::Ok && affected > 0))
    }

    /// Deletes the row with the given id; true iff exactly one row was
    /// affected.
    ///
    /// # Errors
    ///
    /// Configuration problems are fatal.
    pub async fn delete<E: Entity>(
        &self,
        id: i64,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, bool)> {
        let sql = query::delete_by_id::<E>(id);
        let (errno, affected) = self.execute_logged(&E::table(), "delete", &sql, conn).await?;
        Ok((errno, errno == Errno::Ok && affected == 1))
    }

    /// Deletes every row matching the clause, returning the number of rows
    /// affected.
    ///
    /// # Errors
    ///
    /// A missing clause without `force` is a fatal configuration error,
    /// surfaced before anything executes.
    pub async fn delete_where<E: Entity>(
        &self,
        wb: Option<&mut WhereBuilder>,
        force: bool,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, u64)> {
        let sql = query::delete_where::<E>(wb, force)?;
        self.execute_logged(&E::table(), "delete", &sql, conn).await
    }

    /// Counts the rows matching the clause.
    ///
    /// Returns `-1` on storage failure. The sentinel is a deliberate part of
    /// the observable contract — count is the one operation without a result
    /// code.
    ///
    /// # Errors
    ///
    /// Configuration problems are fatal.
    pub async fn count<E: Entity>(
        &self,
        wb: Option<&mut WhereBuilder>,
        conn: Option<&mut Client>,
    ) -> Result<i64> {
        let sql = query::count::<E>(wb);
        let mut handle = self.acquire(conn).await?;
        tracing::debug!(table = %E::table(), sql = %sql, "count");

        match handle.client().query_one(&sql, &[]).await {
            Ok(row) => scalar_i64(&row),
            Err(e) => {
                tracing::error!(error = %e, sql = %sql, "count failed");
                Ok(-1)
            }
        }
    }

    /// Executes caller-supplied SQL verbatim, returning the number of rows
    /// affected. Same connection lifecycle and logging as every other
    /// operation; no escaping is applied.
    ///
    /// # Errors
    ///
    /// Configuration problems are fatal.
    pub async fn execute_raw(
        &self,
        sql: &str,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, u64)> {
        let mut handle = self.acquire(conn).await?;
        tracing::debug!(sql = %sql, "raw");

        match handle.client().execute(sql, &[]).await {
            Ok(affected) => Ok((Errno::Ok, affected)),
            Err(e) => {
                tracing::error!(error = %e, sql = %sql, "raw failed");
                Ok((classify(&e), 0))
            }
        }
    }

    /// Executes caller-supplied row-returning SQL verbatim and materializes
    /// the result.
    ///
    /// # Errors
    ///
    /// Configuration problems and row-decode mismatches are fatal.
    pub async fn query_raw<E: Entity>(
        &self,
        sql: &str,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, Vec<E>)> {
        self.query_rows(sql, "raw", conn).await
    }

    /// Looks up one row by id, collapsing the result-code pair.
    ///
    /// # Errors
    ///
    /// Configuration problems and row-decode mismatches are fatal.
    pub async fn find<E: Entity>(
        &self,
        id: i64,
        conn: Option<&mut Client>,
    ) -> Result<Option<E>> {
        let (errno, found) = self.read_first_by_id(id, None, conn).await?;
        Ok(if errno == Errno::Ok { found } else { None })
    }

    /// Looks up one row by a unique field comparison, collapsing the
    /// result-code pair.
    ///
    /// # Errors
    ///
    /// Configuration problems and row-decode mismatches are fatal.
    pub async fn find_by<E: Entity>(
        &self,
        field: &str,
        value: impl Into<Value>,
        conn: Option<&mut Client>,
    ) -> Result<Option<E>> {
        let mut wb = WhereBuilder::new();
        wb.add_clause(field, value, "=", None, true);
        let (errno, found) = self.read_first(None, Some(&mut wb), conn).await?;
        Ok(if errno == Errno::Ok { found } else { None })
    }

    async fn query_rows<E: Entity>(
        &self,
        sql: &str,
        op: &'static str,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, Vec<E>)> {
        let mut handle = self.acquire(conn).await?;
        tracing::debug!(table = %E::table(), sql = %sql, "{op}");

        match handle.client().query(sql, &[]).await {
            Ok(rows) => {
                let mut out = Vec::with_capacity(rows.len());
                for row in &rows {
                    out.push(E::from_row(row)?);
                }
                Ok((Errno::Ok, out))
            }
            Err(e) => {
                tracing::error!(error = %e, sql = %sql, "{op} failed");
                Ok((Errno::Generic, Vec::new()))
            }
        }
    }

    async fn execute_logged(
        &self,
        table: &str,
        op: &'static str,
        sql: &str,
        conn: Option<&mut Client>,
    ) -> Result<(Errno, u64)> {
        let mut handle = self.acquire(conn).await?;
        tracing::debug!(table = %table, sql = %sql, "{op}");

        match handle.client().execute(sql, &[]).await {
            Ok(affected) => Ok((Errno::Ok, affected)),
            Err(e) => {
                tracing::error!(error = %e, sql = %sql, "{op} failed");
                Ok((classify(&e), 0))
            }
        }
    }
}

fn classify(e: &tokio_postgres::Error) -> Errno {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        Errno::DuplicateKey
    } else {
        Errno::Generic
    }
}

fn scalar_i64(row: &Row) -> Result<i64> {
    row.try_get::<_, i64>(0)
        .or_else(|_| row.try_get::<_, i32>(0).map(i64::from))
        .map_err(|e| Error::Decode {
            column: row
                .columns()
                .first()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source: e,
        })
}
