// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod entity;
pub mod normalized;
pub mod response;

pub use entity::{LABEL_PRIORITY, Properties, RawEntity};
pub use normalized::{ExpansionGroup, NO_LABEL, NormalizedEntity, Relation, UNKNOWN_ID, UNKNOWN_SCHEMA};
pub use response::{ExpandItem, SearchResponse, SimilarItem};
