//! bioanno Configuration Management
//!
//! Handles configuration from environment variables and TOML config
//! files with sensible defaults pointing at the public annotation
//! services.

use crate::EntityType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Lookup service configuration, one section per entity type
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("BIOANNO_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("BIOANNO_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BIOANNO_PORT".to_string(),
                value: port,
            })?;
        }

        if let Ok(url) = std::env::var("MYGENE_URL") {
            config.lookup.gene.base_url = url;
        }
        if let Ok(url) = std::env::var("MYCHEM_URL") {
            config.lookup.chem.base_url = url;
        }
        if let Ok(url) = std::env::var("MYDISEASE_URL") {
            config.lookup.disease.base_url = url;
        }
        if let Ok(secs) = std::env::var("LOOKUP_TIMEOUT_SECS") {
            config.lookup.timeout_secs =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "LOOKUP_TIMEOUT_SECS".to_string(),
                    value: secs,
                })?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Enable CORS
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_enabled: true,
        }
    }
}

/// Lookup service configuration across all entity types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Per-call timeout for batch lookups, in seconds
    pub timeout_secs: u64,

    pub gene: EntityServiceConfig,
    pub chem: EntityServiceConfig,
    pub disease: EntityServiceConfig,
}

impl LookupConfig {
    /// The service configuration for one entity type.
    pub fn service(&self, entity: EntityType) -> &EntityServiceConfig {
        match entity {
            EntityType::Gene => &self.gene,
            EntityType::Chem => &self.chem,
            EntityType::Disease => &self.disease,
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            gene: EntityServiceConfig::gene_defaults(),
            chem: EntityServiceConfig::chem_defaults(),
            disease: EntityServiceConfig::disease_defaults(),
        }
    }
}

/// Configuration for one entity type's batch lookup service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityServiceConfig {
    /// Base URL of the record service, without trailing slash
    pub base_url: String,

    /// Default fields requested for every annotation record
    pub fields: Vec<String>,

    /// Scopes the query ids are matched against, fixed per entity type
    pub scopes: Vec<String>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl EntityServiceConfig {
    pub fn gene_defaults() -> Self {
        Self {
            base_url: "https://mygene.info/v3".to_string(),
            fields: to_strings(&[
                "name",
                "symbol",
                "summary",
                "type_of_gene",
                "MIM",
                "HGNC",
                "MGI",
                "RGD",
                "alias",
                "interpro",
            ]),
            scopes: to_strings(&[
                "entrezgene",
                "ensemblgene",
                "uniprot",
                "accession",
                "retired",
            ]),
        }
    }

    pub fn chem_defaults() -> Self {
        Self {
            base_url: "https://mychem.info/v1".to_string(),
            fields: to_strings(&[
                // IDs
                "pubchem.cid",
                "pubchem.inchikey",
                "chembl.molecule_chembl_id",
                "drugbank.id",
                "chebi.id",
                "unii.unii",
                // Names
                "chebi.name",
                "chembl.pref_name",
                // Structure
                "chebi.iupac",
                "chembl.smiles",
                "pubchem.inchi",
                "pubchem.molecular_formula",
                "pubchem.molecular_weight",
                // Chemical types
                "chembl.molecule_type",
                "chembl.structure_type",
                // ChEBI roles etc
                "chebi.relationship",
                // Drug info
                "unichem.rxnorm",
                "pharmgkb.trade_names",
                "chembl.drug_indications",
                "aeolus.indications",
                "chembl.drug_mechanisms",
                "chembl.atc_classifications",
                "chembl.max_phase",
                "chembl.first_approval",
                "drugcentral.approval",
                "chembl.first_in_class",
                "chembl.inorganic_flag",
                "chembl.prodrug",
                "chembl.therapeutic_flag",
                "chembl.withdrawn_flag",
                "drugcentral.drug_dosage",
                "ndc.routename",
                "ndc.producttypename",
                "ndc.pharm_classes",
            ]),
            scopes: to_strings(&[
                "_id",
                "chebi.id",
                "chembl.molecule_chembl_id",
                "pubchem.cid",
                "drugbank.id",
                "unii.unii",
            ]),
        }
    }

    pub fn disease_defaults() -> Self {
        Self {
            base_url: "https://mydisease.info/v1".to_string(),
            fields: to_strings(&[
                // IDs
                "disease_ontology.doid",
                "mondo.mondo",
                "umls.umls",
                // Names
                "disease_ontology.name",
                "mondo.label",
                // Description
                "mondo.definition",
                "disease_ontology.def",
                // Xrefs
                "mondo.xrefs",
                "disease_ontology.xrefs",
                // Synonyms
                "mondo.synonym",
                "disease_ontology.synonyms",
            ]),
            scopes: to_strings(&["mondo.mondo", "disease_ontology.doid", "umls.umls"]),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
