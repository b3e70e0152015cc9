//! Index configuration handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use bioanno_core::IndexConfig;
use std::sync::Arc;

/// List the query configuration of every hosted index
#[utoipa::path(
    get,
    path = "/indexes",
    tag = "indexes",
    responses(
        (status = 200, description = "Hosted index configurations")
    )
)]
pub async fn list_indexes(State(state): State<Arc<AppState>>) -> Json<Vec<IndexConfig>> {
    state.increment_requests();
    Json(state.indexes.iter().cloned().collect())
}

/// Query configuration of one index by its API prefix
#[utoipa::path(
    get,
    path = "/indexes/{prefix}",
    tag = "indexes",
    params(
        ("prefix" = String, Path, description = "Index API prefix, e.g. chebi")
    ),
    responses(
        (status = 200, description = "Index configuration"),
        (status = 404, description = "No index under that prefix")
    )
)]
pub async fn get_index(
    State(state): State<Arc<AppState>>,
    Path(prefix): Path<String>,
) -> Result<Json<IndexConfig>, AppError> {
    state.increment_requests();
    state
        .indexes
        .get(&prefix)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no index configured for prefix {prefix}")))
}
