//! HTTP server layer
//!
//! Axum server with:
//! - JSON record endpoints and health under `/api`
//! - CORS
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServeError, ServerConfig};
