// file: src/client/mod.rs
// description: Aleph API client module exports
// reference: internal module structure

pub mod aleph;
pub mod query;

pub use aleph::AlephClient;
pub use query::{
    DEFAULT_EXPAND_LIMIT, DEFAULT_SEARCH_LIMIT, EntityQuery, Filters, QueryParams, SchemaFilter,
};
