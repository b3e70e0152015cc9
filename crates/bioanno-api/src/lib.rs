//! bioanno API - REST server
//!
//! HTTP surface over the annotation pipeline: single-curie and TRAPI
//! batch annotation, hosted index configuration, health and metrics.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::annotator::annotate_curie,
        handlers::annotator::annotate_trapi,
        handlers::indexes::list_indexes,
        handlers::indexes::get_index,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(error::ApiError)),
    tags(
        (name = "annotator", description = "Curie annotation endpoints"),
        (name = "indexes", description = "Hosted index configuration"),
        (name = "health", description = "Health and metrics")
    ),
    info(
        title = "bioanno API",
        description = "Biomedical curie annotation service"
    )
)]
pub struct ApiDoc;

/// Build the application router around shared state.
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = routes::api_routes().layer(TraceLayer::new_for_http());

    if state.config.server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
