//! API route definitions

use crate::handlers::{annotator, health, indexes};
use crate::state::AppState;
use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;

/// Create the annotation service routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Annotation endpoints
        .route(
            "/annotator",
            get(annotator::missing_curie).post(annotator::annotate_trapi),
        )
        .route("/annotator/:curie", get(annotator::annotate_curie))
        // Index configuration endpoints
        .route("/indexes", get(indexes::list_indexes))
        .route("/indexes/:prefix", get(indexes::get_index))
        // Operational endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
}
