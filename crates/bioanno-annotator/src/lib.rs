//! bioanno Annotator - the curie-to-annotation resolution pipeline
//!
//! Resolves typed biomedical identifiers (curies) into enriched
//! annotation records:
//! - `parse`: prefixed identifier -> (entity type, lookup id)
//! - `client`: batch lookup adapter over the BioThings record services
//! - `transform`: per-record response normalization rules
//! - `annotate`: orchestration for single curies and TRAPI graphs

pub mod annotate;
pub mod client;
pub mod parse;
pub mod transform;

pub use annotate::{AnnotateOptions, Annotator};
pub use client::BioThingsClient;
pub use parse::{CurieParser, ParsedCurie};
pub use transform::{append_prefix, ResponseTransformer, TransformRule};
