//! bioanno Ingest - openFDA drug adverse-event data loading
//!
//! Loads the quarterly openFDA drug-event JSON dumps into clean,
//! mergeable documents:
//! - `schema`: field typing parsed from the openFDA drugevent YAML schema
//! - `record`: per-record normalization (sweeping, date and code coercion)
//! - `storage`: id-keyed document store with a most-recent merge policy
//! - `loader`: walks a data folder and feeds the store

pub mod loader;
pub mod record;
pub mod schema;
pub mod storage;

pub use loader::EventLoader;
pub use record::{normalize_record, parse_date};
pub use schema::EventSchema;
pub use storage::{DocumentStore, StoreStats};

use thiserror::Error;

/// A normalized adverse-event document, keyed by its `_id` field.
pub type EventDocument = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading adverse-event data
#[derive(Error, Debug)]
pub enum IngestError {
    /// The field schema could not be parsed
    #[error("schema error: {0}")]
    Schema(String),

    /// IO error while reading a data or schema file
    #[error("IO error reading {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A data file did not contain the expected JSON envelope
    #[error("malformed data file {path}: {reason}")]
    MalformedFile { path: String, reason: String },

    /// A record could not be normalized
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
