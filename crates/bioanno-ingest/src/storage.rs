//! Document storage
//!
//! Id-keyed store for normalized adverse-event documents. The same
//! safety report appears in multiple quarterly dumps; duplicates are
//! resolved by keeping the most recently dated version. Oversized
//! documents are skipped outright.

use crate::record::parse_date;
use crate::EventDocument;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;

/// Dates compared when two documents share an id, most authoritative
/// first.
pub const DATE_PRIORITY: [&str; 3] = ["transmissiondate", "receivedate", "receiptdate"];

/// Ingest counters reported after a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub stored: usize,
    pub merged: usize,
    pub skipped_oversize: usize,
}

/// In-memory document store with most-recent merge semantics.
pub struct DocumentStore {
    docs: HashMap<String, EventDocument>,
    max_doc_bytes: Option<usize>,
    stats: StoreStats,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            docs: HashMap::new(),
            max_doc_bytes: None,
            stats: StoreStats::default(),
        }
    }

    /// Skip documents whose serialized size exceeds `max_doc_bytes`.
    pub fn with_size_cap(mut self, max_doc_bytes: usize) -> Self {
        self.max_doc_bytes = Some(max_doc_bytes);
        self
    }

    /// Insert a document under its `_id`, resolving collisions by date.
    pub fn insert(&mut self, doc: EventDocument) {
        if let Some(cap) = self.max_doc_bytes {
            let size = Value::Object(doc.clone()).to_string().len();
            if size > cap {
                tracing::warn!("skipping oversized document ({size} bytes)");
                self.stats.skipped_oversize += 1;
                return;
            }
        }

        let Some(id) = doc.get("_id").and_then(Value::as_str).map(str::to_string) else {
            tracing::warn!("skipping document without an _id");
            return;
        };

        match self.docs.get(&id) {
            Some(existing) => {
                self.stats.merged += 1;
                if more_recent(&doc, existing) {
                    self.docs.insert(id, doc);
                }
            }
            None => {
                self.stats.stored += 1;
                self.docs.insert(id, doc);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&EventDocument> {
        self.docs.get(id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn into_docs(self) -> HashMap<String, EventDocument> {
        self.docs
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `candidate` supersedes `existing`: the candidate wins if it
/// is strictly newer on any date field, scanned in priority order.
/// Missing dates lose to present ones; equal on all three keeps the
/// existing document.
fn more_recent(candidate: &EventDocument, existing: &EventDocument) -> bool {
    DATE_PRIORITY
        .iter()
        .any(|field| doc_date(candidate, field) > doc_date(existing, field))
}

// normalized documents carry ISO dates; raw compact dates still parse
fn doc_date(doc: &EventDocument, field: &str) -> Option<NaiveDate> {
    let text = doc.get(field).and_then(Value::as_str)?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_date(text))
}
