//! Database layer - connection pool, schema, and repositories
//!
//! # Design Principles
//!
//! - One bounded pool, injected everywhere - no global handle
//! - Startup connect is retried, then fatal
//! - Schema is create-if-absent, run on every start

pub mod pool;
pub mod repos;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use pool::{acquire_pool, ConnectionError, PoolSettings, RetryPolicy, StoreConfig};
pub use repos::*;
pub use schema::{ensure_schema, SchemaError};
