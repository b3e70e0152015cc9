//! BioThings lookup client
//!
//! Batch key-value lookup adapter over a BioThings record service
//! (mygene.info, mychem.info, mydisease.info). One client is built per
//! entity type from its service configuration and shared read-only
//! across requests.

use async_trait::async_trait;
use bioanno_core::{
    AnnoError, AnnotationRecord, EntityServiceConfig, EntityType, LookupClient, Result,
};
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client for one entity type's `POST /query` batch endpoint.
pub struct BioThingsClient {
    client: Client,
    base_url: String,
    entity: EntityType,
    fields: Vec<String>,
    scopes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct QueryManyRequest<'a> {
    q: &'a [String],
    scopes: &'a [String],
    fields: &'a [String],
}

impl BioThingsClient {
    pub fn new(
        entity: EntityType,
        base_url: impl Into<String>,
        fields: Vec<String>,
        scopes: Vec<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnnoError::LookupService(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            entity,
            fields,
            scopes,
        })
    }

    /// Create from an entity service config section.
    pub fn from_config(
        entity: EntityType,
        config: &EntityServiceConfig,
        timeout_secs: u64,
    ) -> Result<Self> {
        Self::new(
            entity,
            config.base_url.clone(),
            config.fields.clone(),
            config.scopes.clone(),
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }
}

#[async_trait]
impl LookupClient for BioThingsClient {
    async fn query_many(
        &self,
        ids: &[String],
        fields: Option<&[String]>,
    ) -> Result<HashMap<String, Vec<AnnotationRecord>>> {
        let fields = fields.unwrap_or(&self.fields);
        let request = QueryManyRequest {
            q: ids,
            scopes: &self.scopes,
            fields,
        };

        tracing::info!("querying annotations for {} {} ids", ids.len(), self.entity);

        let response = self
            .client
            .post(format!("{}/query", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AnnoError::LookupService(format!("request to {} failed: {e}", self.base_url))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnnoError::LookupService(format!(
                "{} returned {status}: {body}",
                self.base_url
            )));
        }

        let hits: Vec<AnnotationRecord> = response.json().await.map_err(|e| {
            AnnoError::LookupService(format!("failed to parse {} response: {e}", self.base_url))
        })?;

        tracing::info!("done, {} annotation objects returned", hits.len());

        Ok(group_by_query(hits))
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}

/// Group a flat hit list by its `query` key. A single query id may have
/// produced any number of hits; hits missing the key are dropped with a
/// warning since they cannot be attributed to an input id.
pub fn group_by_query(hits: Vec<AnnotationRecord>) -> HashMap<String, Vec<AnnotationRecord>> {
    let mut grouped: HashMap<String, Vec<AnnotationRecord>> = HashMap::new();
    for hit in hits {
        match hit.get("query").and_then(serde_json::Value::as_str) {
            Some(query) => grouped.entry(query.to_string()).or_default().push(hit),
            None => tracing::warn!("dropping lookup hit without a query key"),
        }
    }
    grouped
}
