//! roster-server: student and teacher records over HTTP
//!
//! A bounded Postgres pool behind a small JSON API. The [`lifecycle`] module
//! owns startup ordering (pool, schema, listen) and shutdown (signal, drain,
//! close pool).

pub mod db;
pub mod http;
pub mod lifecycle;

pub use db::{ConnectionError, PoolSettings, RetryPolicy, SchemaError, StoreConfig, StoreError};
pub use http::{ServeError, ServerConfig};
pub use lifecycle::{shutdown_signal, Lifecycle, LifecycleConfig, LifecycleError, Phase};
