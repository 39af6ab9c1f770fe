//! Generic record repository
//!
//! Students and teachers share one CRUD surface and differ only in table and
//! columns, so the repository is parametrized over a [`Record`] kind.
//! - list: full table scan, id order
//! - insert: store assigns id and created_at, constraints enforced by the DB
//! - delete: by id, zero rows affected is success

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

/// A record kind backed by its own table.
pub trait Record: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin + 'static {
    /// Caller-supplied fields for an insert (everything except id and created_at).
    type New: DeserializeOwned + Send + 'static;

    /// Table name, also the route segment.
    const TABLE: &'static str;
    /// Singular display noun, e.g. "Student".
    const NOUN: &'static str;
    /// Plural used in failure messages, e.g. "students".
    const PLURAL: &'static str;

    /// Idempotent DDL.
    const CREATE_TABLE: &'static str;
    const SELECT_ALL: &'static str;
    /// Three positional text parameters, returns the new id.
    const INSERT: &'static str;
    const DELETE: &'static str;

    /// Bind order for [`Record::INSERT`].
    fn insert_values(new: Self::New) -> [Option<String>; 3];
}

/// Failure executing a statement against the store.
#[derive(Debug, thiserror::Error)]
#[error("{operation} on {table} failed: {source}")]
pub struct StoreError {
    pub operation: &'static str,
    pub table: &'static str,
    #[source]
    pub source: sqlx::Error,
}

impl StoreError {
    fn during(operation: &'static str, table: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self {
            operation,
            table,
            source,
        }
    }
}

/// Record repository
///
/// Every call checks one connection out of the pool for its duration; sqlx
/// returns it on drop, whichever way the call exits.
pub struct RecordRepo<'a, R> {
    pool: &'a PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<'a, R: Record> RecordRepo<'a, R> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    /// All rows of this kind. An empty table is `Ok(vec![])`.
    pub async fn list(&self) -> Result<Vec<R>, StoreError> {
        sqlx::query_as::<_, R>(R::SELECT_ALL)
            .fetch_all(self.pool)
            .await
            .map_err(StoreError::during("list", R::TABLE))
    }

    /// Insert a row and return the id the store assigned.
    ///
    /// A missing required field is left for the NOT NULL constraint to reject.
    pub async fn insert(&self, new: R::New) -> Result<i64, StoreError> {
        let [first, second, third] = R::insert_values(new);
        let id: i64 = sqlx::query_scalar(R::INSERT)
            .bind(first)
            .bind(second)
            .bind(third)
            .fetch_one(self.pool)
            .await
            .map_err(StoreError::during("insert", R::TABLE))?;

        tracing::debug!(table = R::TABLE, id, "record inserted");
        Ok(id)
    }

    /// Delete by id, returning rows affected. Deleting a missing id is not an error.
    pub async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query(R::DELETE)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(StoreError::during("delete", R::TABLE))?;

        let rows_affected = result.rows_affected();
        tracing::debug!(table = R::TABLE, id, rows_affected, "record delete");
        Ok(rows_affected)
    }
}
