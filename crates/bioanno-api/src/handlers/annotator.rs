//! Annotation handlers
//!
//! Thin HTTP adapters over the orchestrator: decode query options, call
//! the pipeline, map errors to status codes. No annotation logic lives
//! here.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use bioanno_annotator::AnnotateOptions;
use bioanno_core::AnnotationRecord;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::IntoParams;

/// Options accepted by the annotation endpoints. On the batch route the
/// same keys may arrive at the top level of the JSON body instead; the
/// query string wins where both are present.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AnnotateParams {
    /// Return lookup records without transformation
    pub raw: Option<bool>,
    /// Comma-separated field list overriding the per-type defaults
    pub fields: Option<String>,
    /// Append the annotation envelope to existing node attributes
    /// instead of replacing them (batch only)
    pub append: Option<bool>,
    /// Annotate only the first N nodes of the graph (batch only)
    pub limit: Option<usize>,
}

fn split_fields(fields: &str) -> Vec<String> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

impl AnnotateParams {
    fn field_list(&self) -> Option<Vec<String>> {
        self.fields.as_deref().map(split_fields)
    }

    fn merge_with_body(&self, body: &Value) -> AnnotateOptions {
        AnnotateOptions {
            append: self
                .append
                .or_else(|| body.get("append").and_then(Value::as_bool))
                .unwrap_or(false),
            raw: self
                .raw
                .or_else(|| body.get("raw").and_then(Value::as_bool))
                .unwrap_or(false),
            fields: self
                .field_list()
                .or_else(|| body.get("fields").and_then(Value::as_str).map(split_fields)),
            limit: self
                .limit
                .or_else(|| body.get("limit").and_then(Value::as_u64).map(|n| n as usize)),
        }
    }
}

/// Annotate a single curie id
#[utoipa::path(
    get,
    path = "/annotator/{curie}",
    tag = "annotator",
    params(
        ("curie" = String, Path, description = "Curie id, e.g. NCBIGene:1017"),
        AnnotateParams
    ),
    responses(
        (status = 200, description = "Annotations keyed by the input curie"),
        (status = 400, description = "Malformed or unsupported curie"),
        (status = 502, description = "Lookup service failure")
    )
)]
pub async fn annotate_curie(
    State(state): State<Arc<AppState>>,
    Path(curie): Path<String>,
    Query(params): Query<AnnotateParams>,
) -> Result<Json<HashMap<String, Vec<AnnotationRecord>>>, AppError> {
    state.increment_requests();
    let fields = params.field_list();
    let result = state
        .annotator
        .annotate_curie(&curie, params.raw.unwrap_or(false), fields.as_deref())
        .await?;
    Ok(Json(result))
}

/// Annotate every node of a TRAPI message
#[utoipa::path(
    post,
    path = "/annotator",
    tag = "annotator",
    params(AnnotateParams),
    responses(
        (status = 200, description = "Annotated knowledge-graph nodes"),
        (status = 400, description = "Malformed TRAPI payload"),
        (status = 502, description = "Lookup service failure")
    )
)]
pub async fn annotate_trapi(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnnotateParams>,
    Json(trapi): Json<Value>,
) -> Result<Json<Value>, AppError> {
    state.increment_requests();
    let options = params.merge_with_body(&trapi);
    let nodes = state.annotator.annotate_trapi(trapi, &options).await?;
    Ok(Json(Value::Object(nodes)))
}

/// GET without a curie path segment is a well-known client mistake;
/// answer with the canonical message instead of a bare 404.
pub async fn missing_curie() -> AppError {
    AppError::NotFound("missing required input curie id".to_string())
}
