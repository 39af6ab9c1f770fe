//! Table provisioning
//!
//! `CREATE TABLE IF NOT EXISTS` only. Safe on every startup, never touches
//! existing rows, and does no migration beyond creating what is absent.

use sqlx::PgPool;

use super::repos::{Record, Student, Teacher};

/// DDL failed for a table.
#[derive(Debug, thiserror::Error)]
#[error("failed to ensure table {table}: {source}")]
pub struct SchemaError {
    pub table: &'static str,
    #[source]
    pub source: sqlx::Error,
}

/// Ensure every record table exists.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), SchemaError> {
    tracing::info!("Ensuring tables...");

    ensure_table::<Student>(pool).await?;
    ensure_table::<Teacher>(pool).await?;

    tracing::info!("Tables ensured");
    Ok(())
}

async fn ensure_table<R: Record>(pool: &PgPool) -> Result<(), SchemaError> {
    sqlx::query(R::CREATE_TABLE)
        .execute(pool)
        .await
        .map_err(|source| SchemaError {
            table: R::TABLE,
            source,
        })?;

    tracing::debug!(table = R::TABLE, "table ensured");
    Ok(())
}
