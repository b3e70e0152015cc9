//! Data folder loading
//!
//! Walks the `*.json` dump files of a data folder, normalizes every
//! record in their `{"results": [...]}` envelopes and feeds a
//! `DocumentStore`.

use crate::record::normalize_record;
use crate::schema::EventSchema;
use crate::storage::DocumentStore;
use crate::{EventDocument, IngestError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Loads adverse-event dump files against one field schema.
pub struct EventLoader {
    schema: EventSchema,
}

impl EventLoader {
    pub fn new(schema: EventSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &EventSchema {
        &self.schema
    }

    /// Load every `*.json` file of `data_folder` into `store`.
    ///
    /// Files are visited in name order so that merge outcomes do not
    /// depend on directory iteration order.
    pub fn load_folder(&self, data_folder: &Path, store: &mut DocumentStore) -> Result<()> {
        for path in json_files(data_folder)? {
            self.load_file(&path, store)?;
        }
        Ok(())
    }

    /// Load a single dump file into `store`.
    pub fn load_file(&self, path: &Path, store: &mut DocumentStore) -> Result<()> {
        tracing::info!("loading {}", path.display());
        for doc in self.read_file(path)? {
            store.insert(doc);
        }
        Ok(())
    }

    /// Normalize every record of one dump file.
    pub fn read_file(&self, path: &Path) -> Result<Vec<EventDocument>> {
        let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let envelope: Value =
            serde_json::from_str(&text).map_err(|e| IngestError::MalformedFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let Some(results) = envelope.get("results").and_then(Value::as_array) else {
            return Err(IngestError::MalformedFile {
                path: path.display().to_string(),
                reason: "missing results array".to_string(),
            });
        };

        let docs = results
            .iter()
            .cloned()
            .map(|record| normalize_record(record, &self.schema))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("{} records from {}", docs.len(), path.display());
        Ok(docs)
    }
}

fn json_files(data_folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(data_folder).map_err(|source| IngestError::Io {
        path: data_folder.display().to_string(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}
