//! bioanno Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the bioanno
//! platform:
//! - The error taxonomy shared by the annotation pipeline and the API
//! - Entity types and annotation record types
//! - The namespace (curie prefix) rule table
//! - The batch lookup client trait
//! - Configuration management
//! - Per-index query configuration

pub mod config;
pub mod index;
pub mod namespace;

pub use config::{AppConfig, ConfigError, EntityServiceConfig, LookupConfig, ServerConfig};
pub use index::{IndexConfig, IndexRegistry};
pub use namespace::{IdConverter, NamespaceRule, NamespaceTable};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for annotation operations
#[derive(Error, Debug)]
pub enum AnnoError {
    /// Malformed or unresolvable curie (single-item path only)
    #[error("invalid curie id: {0}")]
    InvalidCurie(String),

    /// Malformed TRAPI batch payload
    #[error("invalid TRAPI input: {0}")]
    TrapiInput(String),

    /// Upstream lookup service failure (network, timeout, bad response)
    #[error("lookup service error: {0}")]
    LookupService(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AnnoError>;

// ============================================================================
// Entity Types
// ============================================================================

/// Coarse biomedical entity category.
///
/// Determines which lookup service and which field/scope set applies
/// when a curie is resolved into annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Gene,
    Chem,
    Disease,
}

impl EntityType {
    /// All entity types known to the platform, in a fixed order.
    pub const ALL: [EntityType; 3] = [EntityType::Gene, EntityType::Chem, EntityType::Disease];
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gene => write!(f, "gene"),
            Self::Chem => write!(f, "chem"),
            Self::Disease => write!(f, "disease"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = AnnoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gene" => Ok(Self::Gene),
            "chem" => Ok(Self::Chem),
            "disease" => Ok(Self::Disease),
            _ => Err(AnnoError::Config(format!("unknown entity type: {s}"))),
        }
    }
}

// ============================================================================
// Annotation Records
// ============================================================================

/// The raw result of a batch lookup for one queried id.
///
/// A schemaless mapping of field name to value; carries a `query` key
/// identifying which input id produced it and optionally a `_score`
/// relevance value until the transformer strips them.
pub type AnnotationRecord = serde_json::Map<String, serde_json::Value>;

/// The `attribute_type_id` used for the envelope attached to TRAPI nodes.
pub const ANNOTATION_ATTRIBUTE_TYPE: &str = "biothings_annotations";

// ============================================================================
// Traits
// ============================================================================

/// Batch key-value lookup against an external record service.
///
/// One handle exists per entity type; handles are built once at startup
/// and shared read-only across requests. Implementations batch all ids
/// in a single call and group the results by the query key, so a single
/// id may map to zero, one, or many records.
#[async_trait::async_trait]
pub trait LookupClient: Send + Sync {
    /// Query a batch of ids, returning records grouped by query id.
    ///
    /// `fields` overrides the client's configured default field list.
    /// Ids absent from the result mapping mean "no annotation".
    async fn query_many(
        &self,
        ids: &[String],
        fields: Option<&[String]>,
    ) -> Result<HashMap<String, Vec<AnnotationRecord>>>;

    /// Service name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
