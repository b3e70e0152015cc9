//! Per-index query configuration
//!
//! Each hosted index exposes its own API prefix, backing index name (the
//! `pending-<prefix>` convention) and document type, plus any extra query
//! keyword defaults the index's query pipeline honors. The registry is
//! configuration data, immutable after startup, so new indexes ship
//! without a code change.

use crate::{AnnoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query configuration for a single hosted index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// API prefix the index is mounted under
    pub prefix: String,

    /// Backing index name
    pub index: String,

    /// Document type stored in the index
    pub doc_type: String,

    /// Extra query keyword defaults, e.g. `ignore_obsolete = true`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_kwargs: BTreeMap<String, serde_json::Value>,
}

impl IndexConfig {
    /// New index config following the `pending-<prefix>` naming convention.
    pub fn new(prefix: impl Into<String>, doc_type: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            index: format!("pending-{prefix}"),
            prefix,
            doc_type: doc_type.into(),
            query_kwargs: BTreeMap::new(),
        }
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.query_kwargs.insert(key.into(), value);
        self
    }
}

/// Immutable registry of hosted index configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRegistry {
    indexes: Vec<IndexConfig>,
}

impl IndexRegistry {
    pub fn new(indexes: Vec<IndexConfig>) -> Self {
        Self { indexes }
    }

    /// The ontology and association indexes hosted by default.
    pub fn pending_defaults() -> Self {
        let ignore_obsolete = ("ignore_obsolete", serde_json::Value::Bool(true));
        Self::new(vec![
            IndexConfig::new("chebi", "chemical").with_kwarg(ignore_obsolete.0, ignore_obsolete.1.clone()),
            IndexConfig::new("doid", "disease").with_kwarg(ignore_obsolete.0, ignore_obsolete.1.clone()),
            IndexConfig::new("ncit", "node").with_kwarg(ignore_obsolete.0, ignore_obsolete.1),
            IndexConfig::new("mondo", "disease"),
            IndexConfig::new("semmeddb", "association"),
            IndexConfig::new("openfda_drug_events", "drug_event"),
        ])
    }

    /// Load a registry from TOML:
    ///
    /// ```toml
    /// [[indexes]]
    /// prefix = "chebi"
    /// index = "pending-chebi"
    /// doc_type = "chemical"
    /// query_kwargs = { ignore_obsolete = true }
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AnnoError::Config(format!("failed to parse index registry: {e}")))
    }

    pub fn get(&self, prefix: &str) -> Option<&IndexConfig> {
        self.indexes.iter().find(|idx| idx.prefix == prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexConfig> {
        self.indexes.iter()
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::pending_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naming_convention() {
        let idx = IndexConfig::new("chebi", "chemical");
        assert_eq!(idx.index, "pending-chebi");
        assert_eq!(idx.prefix, "chebi");
    }

    #[test]
    fn test_defaults_present() {
        let registry = IndexRegistry::pending_defaults();
        assert!(!registry.is_empty());

        let chebi = registry.get("chebi").unwrap();
        assert_eq!(chebi.doc_type, "chemical");
        assert_eq!(
            chebi.query_kwargs.get("ignore_obsolete"),
            Some(&serde_json::Value::Bool(true))
        );

        // association index has no extra kwargs
        let semmeddb = registry.get("semmeddb").unwrap();
        assert!(semmeddb.query_kwargs.is_empty());
    }

    #[test]
    fn test_toml_roundtrip() {
        let registry = IndexRegistry::from_toml_str(
            r#"
            [[indexes]]
            prefix = "doid"
            index = "pending-doid"
            doc_type = "disease"
            query_kwargs = { ignore_obsolete = true }
            "#,
        )
        .unwrap();

        assert_eq!(registry.len(), 1);
        let doid = registry.get("doid").unwrap();
        assert_eq!(doid.index, "pending-doid");
        assert_eq!(
            doid.query_kwargs.get("ignore_obsolete"),
            Some(&serde_json::Value::Bool(true))
        );
    }
}
