//! Record endpoints, one set per record kind
//!
//! For kind `student`:
//! - GET    /student      list
//! - POST   /addstudent   insert
//! - DELETE /student/{id} delete

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::{Record, RecordRepo};
use crate::http::error::ApiError;
use crate::http::extractors::RecordId;
use crate::http::server::AppState;

/// Acknowledgement for writes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /{kind} - every record of the kind, possibly none
async fn list_records<R: Record>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<R>>, ApiError> {
    let records = RecordRepo::<R>::new(&state.pool)
        .list()
        .await
        .map_err(|e| ApiError::store(format!("Failed to fetch {}", R::PLURAL), e))?;

    Ok(Json(records))
}

/// POST /add{kind} - insert one record
async fn add_record<R: Record>(
    State(state): State<Arc<AppState>>,
    body: Result<Json<R::New>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(new) = body?;
    let id = RecordRepo::<R>::new(&state.pool)
        .insert(new)
        .await
        .map_err(|e| ApiError::store(format!("Failed to add {}", R::TABLE), e))?;

    tracing::info!(table = R::TABLE, id, "record added");
    Ok(Json(MessageResponse {
        message: format!("{} added successfully", R::NOUN),
    }))
}

/// DELETE /{kind}/{id} - delete by id; unknown ids succeed
async fn delete_record<R: Record>(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, ApiError> {
    let rows_affected = RecordRepo::<R>::new(&state.pool)
        .delete(id)
        .await
        .map_err(|e| ApiError::store(format!("Failed to delete {}", R::TABLE), e))?;

    tracing::info!(table = R::TABLE, id, rows_affected, "record deleted");
    Ok(Json(MessageResponse {
        message: format!("{} deleted successfully", R::NOUN),
    }))
}

/// Routes for one record kind
pub fn router<R: Record>() -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("/{}", R::TABLE), get(list_records::<R>))
        .route(&format!("/add{}", R::TABLE), post(add_record::<R>))
        .route(&format!("/{}/{{id}}", R::TABLE), delete(delete_record::<R>))
}
