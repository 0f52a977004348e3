// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod client;
pub mod config;
pub mod error;
pub mod exporter;
pub mod models;
pub mod utils;

pub use client::{AlephClient, EntityQuery, Filters, SchemaFilter};
pub use config::{ApiConfig, Config, FailurePolicy, PolicyConfig, QueryConfig};
pub use error::{AlephError, Result};
pub use exporter::json::{ExportEnvelope, JsonExporter};
pub use models::{
    ExpansionGroup, NormalizedEntity, Properties, RawEntity, Relation, SearchResponse,
};
pub use utils::Validator;
