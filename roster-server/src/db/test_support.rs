//! Throwaway schemas for database-backed tests

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use super::schema::ensure_schema;

/// A freshly created schema with empty record tables, first on the search path.
pub struct IsolatedSchema {
    pub pool: PgPool,
    admin: PgPool,
    name: String,
}

impl IsolatedSchema {
    pub async fn create(label: &str) -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let admin = PgPool::connect(&url).await.expect("pool creation failed");
        let name = format!("roster_test_{label}_{}", std::process::id());

        sqlx::query(&format!("DROP SCHEMA IF EXISTS {name} CASCADE"))
            .execute(&admin)
            .await
            .expect("drop schema failed");
        sqlx::query(&format!("CREATE SCHEMA {name}"))
            .execute(&admin)
            .await
            .expect("create schema failed");

        let options = PgConnectOptions::from_str(&url)
            .expect("valid DATABASE_URL")
            .options([("search_path", name.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .expect("scoped pool creation failed");
        ensure_schema(&pool).await.expect("schema failed");

        Self { pool, admin, name }
    }

    pub async fn teardown(self) {
        self.pool.close().await;
        sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name))
            .execute(&self.admin)
            .await
            .expect("drop schema failed");
        self.admin.close().await;
    }
}
