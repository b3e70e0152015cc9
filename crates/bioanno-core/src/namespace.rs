//! Curie namespace rules
//!
//! Maps a curie prefix to the entity type it resolves to and the rules
//! for deriving the lookup id. The table is immutable after construction
//! and injected into the parser, never consulted as a global.

use crate::{AnnoError, EntityType, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Optional id rewrite applied after prefix resolution.
///
/// Registered programmatically per prefix; receives the full original
/// curie and returns the lookup id. Currently no shipped rule uses one,
/// but the hook stays available for prefixes whose lookup ids differ
/// from both the local id and the full curie.
pub type IdConverter = fn(&str) -> String;

/// Static mapping entry for one curie prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceRule {
    /// Entity type this prefix resolves to
    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Preferred lookup field on the record service, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_field: Option<String>,

    /// When true, the full curie (not the stripped local id) is the lookup key
    #[serde(default)]
    pub keep_prefix: bool,
}

impl NamespaceRule {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            lookup_field: None,
            keep_prefix: false,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.lookup_field = Some(field.into());
        self
    }

    pub fn keeping_prefix(mut self) -> Self {
        self.keep_prefix = true;
        self
    }
}

/// Immutable prefix-to-rule table.
pub struct NamespaceTable {
    rules: HashMap<String, NamespaceRule>,
    converters: HashMap<String, IdConverter>,
}

impl NamespaceTable {
    /// Build a table from explicit rules.
    pub fn new(rules: HashMap<String, NamespaceRule>) -> Self {
        Self {
            rules,
            converters: HashMap::new(),
        }
    }

    /// The Biolink-prefix table used by the public annotation services.
    pub fn biolink_defaults() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            "NCBIGene".to_string(),
            NamespaceRule::new(EntityType::Gene).with_field("entrezgene"),
        );
        rules.insert(
            "ENSEMBL".to_string(),
            NamespaceRule::new(EntityType::Gene).with_field("ensembl.gene"),
        );
        rules.insert(
            "UniProtKB".to_string(),
            NamespaceRule::new(EntityType::Gene).with_field("uniprot.Swiss-Prot"),
        );
        rules.insert("INCHIKEY".to_string(), NamespaceRule::new(EntityType::Chem));
        rules.insert(
            "CHEMBL.COMPOUND".to_string(),
            NamespaceRule::new(EntityType::Chem).with_field("chembl.molecule_chembl_id"),
        );
        rules.insert(
            "PUBCHEM.COMPOUND".to_string(),
            NamespaceRule::new(EntityType::Chem).with_field("pubchem.cid"),
        );
        rules.insert(
            "CHEBI".to_string(),
            NamespaceRule::new(EntityType::Chem)
                .with_field("chebi.id")
                .keeping_prefix(),
        );
        rules.insert(
            "UNII".to_string(),
            NamespaceRule::new(EntityType::Chem).with_field("unii.unii"),
        );
        rules.insert(
            "MONDO".to_string(),
            NamespaceRule::new(EntityType::Disease)
                .with_field("mondo.mondo")
                .keeping_prefix(),
        );
        rules.insert(
            "DOID".to_string(),
            NamespaceRule::new(EntityType::Disease)
                .with_field("disease_ontology.doid")
                .keeping_prefix(),
        );
        Self::new(rules)
    }

    /// Load a table from TOML, e.g.
    ///
    /// ```toml
    /// [CHEBI]
    /// type = "chem"
    /// lookup_field = "chebi.id"
    /// keep_prefix = true
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let rules: HashMap<String, NamespaceRule> = toml::from_str(content)
            .map_err(|e| AnnoError::Config(format!("failed to parse namespace table: {e}")))?;
        Ok(Self::new(rules))
    }

    /// Register an id converter for a prefix. Converters cannot be
    /// expressed in the data file, so they are attached here.
    pub fn with_converter(mut self, prefix: impl Into<String>, converter: IdConverter) -> Self {
        self.converters.insert(prefix.into(), converter);
        self
    }

    pub fn rule(&self, prefix: &str) -> Option<&NamespaceRule> {
        self.rules.get(prefix)
    }

    pub fn converter(&self, prefix: &str) -> Option<IdConverter> {
        self.converters.get(prefix).copied()
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biolink_defaults() {
        let table = NamespaceTable::biolink_defaults();
        assert_eq!(table.len(), 10);

        let gene = table.rule("NCBIGene").unwrap();
        assert_eq!(gene.entity_type, EntityType::Gene);
        assert!(!gene.keep_prefix);

        let chebi = table.rule("CHEBI").unwrap();
        assert_eq!(chebi.entity_type, EntityType::Chem);
        assert!(chebi.keep_prefix);

        assert!(table.rule("FAKE").is_none());
    }

    #[test]
    fn test_from_toml() {
        let table = NamespaceTable::from_toml_str(
            r#"
            [CHEBI]
            type = "chem"
            lookup_field = "chebi.id"
            keep_prefix = true

            [NCBIGene]
            type = "gene"
            lookup_field = "entrezgene"
            "#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.rule("CHEBI").unwrap().keep_prefix);
        assert!(!table.rule("NCBIGene").unwrap().keep_prefix);
    }

    #[test]
    fn test_converter_registration() {
        fn strip_dot(curie: &str) -> String {
            curie.replace("CHEMBL.COMPOUND:", "CHEMBL")
        }

        let table = NamespaceTable::biolink_defaults().with_converter("CHEMBL.COMPOUND", strip_dot);
        let cvt = table.converter("CHEMBL.COMPOUND").unwrap();
        assert_eq!(cvt("CHEMBL.COMPOUND:25"), "CHEMBL25");
        assert!(table.converter("CHEBI").is_none());
    }
}
