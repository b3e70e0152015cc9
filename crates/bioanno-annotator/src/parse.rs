//! Curie parsing
//!
//! Splits a `PREFIX:LOCAL_ID` identifier and resolves the prefix against
//! the injected namespace table. Pure over the table: the same input
//! always yields the same output.

use bioanno_core::{AnnoError, EntityType, NamespaceTable, Result};
use std::sync::Arc;

/// The outcome of parsing one curie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCurie {
    /// Resolved entity type; `None` when the prefix is unknown
    /// (callers decide whether that is fatal)
    pub entity_type: Option<EntityType>,

    /// The id to submit to the lookup service: the local id, the full
    /// curie when the rule keeps the prefix or the prefix is unknown,
    /// or whatever a registered converter produced
    pub lookup_id: String,
}

/// Parser over an immutable namespace rule table.
#[derive(Clone)]
pub struct CurieParser {
    table: Arc<NamespaceTable>,
}

impl CurieParser {
    pub fn new(table: Arc<NamespaceTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &NamespaceTable {
        &self.table
    }

    /// Parse a curie into its entity type and lookup id.
    ///
    /// Fails only on a malformed curie (no colon separator). An unknown
    /// prefix is not an error: the entity type comes back `None` and the
    /// full curie doubles as the lookup id.
    pub fn parse(&self, curie: &str) -> Result<ParsedCurie> {
        let (prefix, local_id) = curie
            .split_once(':')
            .ok_or_else(|| AnnoError::InvalidCurie(format!("invalid curie id: {curie}")))?;

        let Some(rule) = self.table.rule(prefix) else {
            return Ok(ParsedCurie {
                entity_type: None,
                lookup_id: curie.to_string(),
            });
        };

        let lookup_id = match self.table.converter(prefix) {
            Some(convert) => convert(curie),
            None if rule.keep_prefix => curie.to_string(),
            None => local_id.to_string(),
        };

        Ok(ParsedCurie {
            entity_type: Some(rule.entity_type),
            lookup_id,
        })
    }
}
