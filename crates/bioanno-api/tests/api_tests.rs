//! API Integration Tests
//!
//! Exercise the router end to end against scripted lookup clients, so
//! no network access is needed.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use bioanno_annotator::{Annotator, CurieParser, ResponseTransformer};
use bioanno_api::{create_router, state::AppState};
use bioanno_core::{
    config::AppConfig, AnnoError, AnnotationRecord, EntityType, LookupClient, NamespaceTable,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

/// Scripted lookup client: echoes one canned record per queried id.
struct FakeLookupClient {
    entity: EntityType,
    fail: bool,
}

#[async_trait::async_trait]
impl LookupClient for FakeLookupClient {
    async fn query_many(
        &self,
        ids: &[String],
        _fields: Option<&[String]>,
    ) -> bioanno_core::Result<HashMap<String, Vec<AnnotationRecord>>> {
        if self.fail {
            return Err(AnnoError::LookupService("service down".to_string()));
        }
        let mut results = HashMap::new();
        for id in ids {
            let record = json!({
                "query": id,
                "_score": 9.5,
                "entity": self.entity.to_string(),
            })
            .as_object()
            .unwrap()
            .clone();
            results.insert(id.clone(), vec![record]);
        }
        Ok(results)
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn test_router(fail: bool) -> axum::Router {
    let table = Arc::new(NamespaceTable::biolink_defaults());
    let mut clients: HashMap<EntityType, Arc<dyn LookupClient>> = HashMap::new();
    for entity in EntityType::ALL {
        clients.insert(entity, Arc::new(FakeLookupClient { entity, fail }));
    }
    let annotator = Annotator::new(
        CurieParser::new(table),
        ResponseTransformer::with_default_rules(),
        clients,
    );
    let state = Arc::new(AppState::with_annotator(AppConfig::default(), annotator));
    create_router(state)
}

fn json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// =============================================================================
// Health and Metrics Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_readiness_check() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/ready", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["ready"], true);
    assert_eq!(json["checks"]["gene"], true);
    assert_eq!(json["checks"]["chem"], true);
    assert_eq!(json["checks"]["disease"], true);
}

#[tokio::test]
async fn test_readiness_check_missing_client_is_503() {
    // a router whose annotator has no disease client
    let table = Arc::new(NamespaceTable::biolink_defaults());
    let mut clients: HashMap<EntityType, Arc<dyn LookupClient>> = HashMap::new();
    for entity in [EntityType::Gene, EntityType::Chem] {
        clients.insert(
            entity,
            Arc::new(FakeLookupClient {
                entity,
                fail: false,
            }),
        );
    }
    let annotator = Annotator::new(
        CurieParser::new(table),
        ResponseTransformer::with_default_rules(),
        clients,
    );
    let state = Arc::new(AppState::with_annotator(AppConfig::default(), annotator));
    let app = create_router(state);

    let response = app
        .oneshot(json_request("GET", "/ready", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = response_json(response).await;
    assert_eq!(json["ready"], false);
    assert_eq!(json["checks"]["disease"], false);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/metrics", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert!(json["uptime_seconds"].is_number());
    assert!(json["total_requests"].is_number());
}

// =============================================================================
// Single-Curie Annotation Tests
// =============================================================================

#[tokio::test]
async fn test_annotate_curie_success() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/annotator/NCBIGene:1017", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    let records = json["NCBIGene:1017"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["entity"], "gene");
    // bookkeeping fields are stripped by default
    assert!(records[0].get("query").is_none());
    assert!(records[0].get("_score").is_none());
}

#[tokio::test]
async fn test_annotate_curie_raw() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/annotator/NCBIGene:1017?raw=true", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["NCBIGene:1017"][0]["query"], "1017");
}

#[tokio::test]
async fn test_annotate_curie_malformed_is_400() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/annotator/garbage", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_annotate_curie_unknown_prefix_is_400() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/annotator/FAKE:123", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_annotate_without_curie_is_404() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/annotator", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = response_json(response).await;
    assert_eq!(json["message"], "missing required input curie id");
}

#[tokio::test]
async fn test_annotate_curie_lookup_failure_is_502() {
    let response = test_router(true)
        .oneshot(json_request("GET", "/annotator/NCBIGene:1017", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = response_json(response).await;
    assert_eq!(json["code"], "BAD_GATEWAY");
}

// =============================================================================
// TRAPI Batch Annotation Tests
// =============================================================================

fn trapi_graph() -> Value {
    json!({
        "message": {
            "knowledge_graph": {
                "nodes": {
                    "NCBIGene:1017": {"categories": ["biolink:Gene"]},
                    "CHEBI:15377": {"categories": ["biolink:SmallMolecule"]}
                }
            }
        }
    })
}

#[tokio::test]
async fn test_annotate_trapi_success() {
    let response = test_router(false)
        .oneshot(json_request("POST", "/annotator", Some(trapi_graph())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    for node_id in ["NCBIGene:1017", "CHEBI:15377"] {
        let attributes = json[node_id]["attributes"].as_array().unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0]["attribute_type_id"], "biothings_annotations");
        assert!(attributes[0]["value"].is_array());
    }
}

#[tokio::test]
async fn test_annotate_trapi_append() {
    let mut trapi = trapi_graph();
    trapi["message"]["knowledge_graph"]["nodes"]["NCBIGene:1017"]["attributes"] =
        json!([{"attribute_type_id": "existing"}]);

    let response = test_router(false)
        .oneshot(json_request("POST", "/annotator?append=true", Some(trapi)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    let attributes = json["NCBIGene:1017"]["attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[0]["attribute_type_id"], "existing");
}

#[tokio::test]
async fn test_annotate_trapi_limit() {
    let response = test_router(false)
        .oneshot(json_request("POST", "/annotator?limit=1", Some(trapi_graph())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_annotate_trapi_options_in_body() {
    let mut trapi = trapi_graph();
    trapi["append"] = json!(true);
    trapi["limit"] = json!(1);
    trapi["message"]["knowledge_graph"]["nodes"]["NCBIGene:1017"]["attributes"] =
        json!([{"attribute_type_id": "existing"}]);

    let response = test_router(false)
        .oneshot(json_request("POST", "/annotator", Some(trapi)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    // body-level limit truncated to the first node, body-level append kept
    // the existing attribute
    assert_eq!(json.as_object().unwrap().len(), 1);
    let attributes = json["NCBIGene:1017"]["attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[0]["attribute_type_id"], "existing");
}

#[tokio::test]
async fn test_annotate_trapi_query_string_wins_over_body() {
    let mut trapi = trapi_graph();
    trapi["raw"] = json!(false);

    let response = test_router(false)
        .oneshot(json_request("POST", "/annotator?raw=true", Some(trapi)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    // raw from the query string applied: bookkeeping fields survive
    let value = json["NCBIGene:1017"]["attributes"][0]["value"]
        .as_array()
        .unwrap();
    assert_eq!(value[0]["query"], "1017");
}

#[tokio::test]
async fn test_annotate_trapi_malformed_is_400() {
    let response = test_router(false)
        .oneshot(json_request("POST", "/annotator", Some(json!({"message": {}}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_annotate_trapi_lookup_failure_is_502() {
    let response = test_router(true)
        .oneshot(json_request("POST", "/annotator", Some(trapi_graph())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// =============================================================================
// Index Configuration Tests
// =============================================================================

#[tokio::test]
async fn test_list_indexes() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/indexes", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    let indexes = json.as_array().unwrap();
    assert!(indexes
        .iter()
        .any(|idx| idx["prefix"] == "chebi" && idx["index"] == "pending-chebi"));
}

#[tokio::test]
async fn test_get_index_by_prefix() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/indexes/chebi", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["doc_type"], "chemical");
    assert_eq!(json["query_kwargs"]["ignore_obsolete"], true);
}

#[tokio::test]
async fn test_get_unknown_index_is_404() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/indexes/nope", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// OpenAPI Tests
// =============================================================================

#[tokio::test]
async fn test_openapi_spec_available() {
    let response = test_router(false)
        .oneshot(json_request("GET", "/api-docs/openapi.json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert!(json["openapi"].is_string());
    assert!(json["paths"]["/annotator/{curie}"].is_object());
}
