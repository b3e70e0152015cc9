//! Annotation orchestration
//!
//! Ties the pipeline together: parse curies, group lookup ids by entity
//! type, issue one batched call per type, transform the results and
//! reattach them — either as a single-curie answer or distributed across
//! the nodes of a TRAPI knowledge graph.

use crate::client::BioThingsClient;
use crate::parse::CurieParser;
use crate::transform::ResponseTransformer;
use bioanno_core::{
    AnnoError, AnnotationRecord, EntityType, LookupClient, LookupConfig, NamespaceTable, Result,
    ANNOTATION_ATTRIBUTE_TYPE,
};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Options for a TRAPI batch annotation call.
#[derive(Debug, Clone, Default)]
pub struct AnnotateOptions {
    /// Append the annotation envelope to existing node attributes
    /// instead of replacing them
    pub append: bool,

    /// Skip all response transformation, returning raw lookup records
    pub raw: bool,

    /// Override the per-entity-type default field list
    pub fields: Option<Vec<String>>,

    /// Annotate only the first N nodes by iteration order; the returned
    /// mapping contains exactly those N nodes
    pub limit: Option<usize>,
}

/// The annotation orchestrator.
///
/// Every dependency is injected: the parser's namespace table, the
/// transformer rules and one lookup client per entity type, so tests
/// substitute scripted fakes for the live services.
pub struct Annotator {
    parser: CurieParser,
    transformer: ResponseTransformer,
    clients: HashMap<EntityType, Arc<dyn LookupClient>>,
}

impl Annotator {
    pub fn new(
        parser: CurieParser,
        transformer: ResponseTransformer,
        clients: HashMap<EntityType, Arc<dyn LookupClient>>,
    ) -> Self {
        Self {
            parser,
            transformer,
            clients,
        }
    }

    /// Build an annotator backed by the live BioThings services.
    pub fn from_config(config: &LookupConfig, table: Arc<NamespaceTable>) -> Result<Self> {
        let mut clients: HashMap<EntityType, Arc<dyn LookupClient>> = HashMap::new();
        for entity in EntityType::ALL {
            let client =
                BioThingsClient::from_config(entity, config.service(entity), config.timeout_secs)?;
            clients.insert(entity, Arc::new(client));
        }
        Ok(Self::new(
            CurieParser::new(table),
            ResponseTransformer::with_default_rules(),
            clients,
        ))
    }

    pub fn parser(&self) -> &CurieParser {
        &self.parser
    }

    /// Whether a lookup client is configured for this entity type.
    pub fn has_client(&self, entity: EntityType) -> bool {
        self.clients.contains_key(&entity)
    }

    /// Annotate a single curie id.
    ///
    /// Returns a single-key mapping from the original curie to its
    /// (possibly transformed) record list. An unresolvable prefix is an
    /// error on this path.
    pub async fn annotate_curie(
        &self,
        curie: &str,
        raw: bool,
        fields: Option<&[String]>,
    ) -> Result<HashMap<String, Vec<AnnotationRecord>>> {
        let parsed = self.parser.parse(curie)?;
        let entity = parsed
            .entity_type
            .ok_or_else(|| AnnoError::InvalidCurie(format!("unsupported curie prefix: {curie}")))?;
        let client = self.client_for(entity)?;

        let mut results = client
            .query_many(std::slice::from_ref(&parsed.lookup_id), fields)
            .await?;
        let mut records = results.remove(&parsed.lookup_id).unwrap_or_default();
        if !raw {
            for record in &mut records {
                self.transformer.transform(record);
            }
        }

        Ok(HashMap::from([(curie.to_string(), records)]))
    }

    /// Annotate every node of a TRAPI message in place.
    ///
    /// The input must contain a `message.knowledge_graph.nodes` mapping.
    /// Nodes are grouped by resolved entity type so that N nodes of K
    /// distinct types cost exactly K lookup calls, issued concurrently.
    /// All lookups complete before any node is mutated, so a lookup
    /// failure fails the request with the graph untouched. Nodes whose
    /// type cannot be resolved are skipped with a warning and returned
    /// unmodified.
    pub async fn annotate_trapi(
        &self,
        mut trapi: Value,
        options: &AnnotateOptions,
    ) -> Result<Map<String, Value>> {
        let nodes = trapi
            .pointer_mut("/message/knowledge_graph/nodes")
            .map(Value::take)
            .ok_or_else(|| {
                AnnoError::TrapiInput(
                    "expected a message.knowledge_graph.nodes mapping".to_string(),
                )
            })?;
        let Value::Object(nodes) = nodes else {
            return Err(AnnoError::TrapiInput(
                "message.knowledge_graph.nodes must be an object".to_string(),
            ));
        };

        // explicit policy: keep the first N nodes encountered, drop the
        // rest; a limit of zero means no limit
        let mut nodes: Map<String, Value> = match options.limit {
            Some(limit) if limit > 0 => nodes.into_iter().take(limit).collect(),
            _ => nodes,
        };

        let mut ids_by_type: HashMap<EntityType, Vec<String>> = HashMap::new();
        for node_id in nodes.keys() {
            match self.parser.parse(node_id) {
                Ok(parsed) => match parsed.entity_type {
                    Some(entity) => ids_by_type.entry(entity).or_default().push(node_id.clone()),
                    None => tracing::warn!("unsupported curie prefix: {node_id}, skipped"),
                },
                Err(_) => tracing::warn!("malformed node id: {node_id}, skipped"),
            }
        }

        // one batched lookup per entity type, issued concurrently
        let mut lookups = Vec::new();
        for (entity, node_ids) in ids_by_type {
            let Some(client) = self.clients.get(&entity) else {
                tracing::warn!("no lookup service configured for {entity}, skipped");
                continue;
            };

            // lookup id -> original node ids; one-to-many so that curies
            // colliding on the same stripped id all receive the records
            let mut reverse: HashMap<String, Vec<String>> = HashMap::new();
            let mut query_ids = Vec::new();
            for node_id in node_ids {
                let lookup_id = self.parser.parse(&node_id)?.lookup_id;
                let targets = reverse.entry(lookup_id.clone()).or_default();
                if targets.is_empty() {
                    query_ids.push(lookup_id);
                }
                targets.push(node_id);
            }

            let client = Arc::clone(client);
            let fields = options.fields.clone();
            lookups.push(async move {
                let results = client.query_many(&query_ids, fields.as_deref()).await?;
                Ok::<_, AnnoError>((reverse, results))
            });
        }

        // buffer-then-commit: nothing is written until every type resolved
        let resolved = futures::future::try_join_all(lookups).await?;

        for (reverse, results) in resolved {
            for (query_id, mut records) in results {
                let Some(node_ids) = reverse.get(&query_id) else {
                    continue;
                };
                if !options.raw {
                    for record in &mut records {
                        self.transformer.transform(record);
                    }
                }
                let annotations =
                    Value::Array(records.into_iter().map(Value::Object).collect());
                for node_id in node_ids {
                    let Some(node) = nodes.get_mut(node_id).and_then(Value::as_object_mut)
                    else {
                        continue;
                    };
                    attach_envelope(node, annotations.clone(), options.append);
                }
            }
        }

        Ok(nodes)
    }

    fn client_for(&self, entity: EntityType) -> Result<&Arc<dyn LookupClient>> {
        self.clients.get(&entity).ok_or_else(|| {
            AnnoError::InvalidCurie(format!("no lookup service configured for {entity}"))
        })
    }
}

/// Attach the annotation envelope to a node's `attributes` sequence,
/// either appended to whatever is there or replacing it wholesale.
fn attach_envelope(node: &mut Map<String, Value>, annotations: Value, append: bool) {
    let envelope = json!({
        "attribute_type_id": ANNOTATION_ATTRIBUTE_TYPE,
        "value": annotations,
    });

    if append {
        match node.get_mut("attributes").and_then(Value::as_array_mut) {
            Some(attributes) => attributes.push(envelope),
            None => {
                node.insert("attributes".to_string(), Value::Array(vec![envelope]));
            }
        }
    } else {
        node.insert("attributes".to_string(), Value::Array(vec![envelope]));
    }
}
