// file: src/models/response.rs
// description: response envelopes for the search, expand and similar endpoints
// reference: https://aleph.occrp.org/api/openapi.json

use super::entity::RawEntity;
use super::normalized::{ExpansionGroup, NormalizedEntity, Relation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `GET /entities`, returned to callers untouched.
///
/// Results stay raw JSON so odd records (nulls, numeric ids, missing
/// properties) survive unchanged; use [`SearchResponse::entities`] for
/// typed access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Value>,

    /// `total`, `limit`, `offset`, `next`, facets and whatever else the
    /// server sent alongside the results.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl SearchResponse {
    pub fn entities(&self) -> impl Iterator<Item = RawEntity> + '_ {
        self.results.iter().cloned().map(RawEntity::from)
    }

    pub fn total(&self) -> Option<u64> {
        self.metadata.get("total").and_then(Value::as_u64)
    }

    pub fn limit(&self) -> Option<u64> {
        self.metadata.get("limit").and_then(Value::as_u64)
    }

    pub fn offset(&self) -> Option<u64> {
        self.metadata.get("offset").and_then(Value::as_u64)
    }

    pub fn next_page(&self) -> Option<&str> {
        self.metadata.get("next").and_then(Value::as_str)
    }

    pub fn has_more(&self) -> bool {
        self.next_page().is_some()
    }
}

/// One property's worth of related entities from `GET /entities/{id}/expand`.
#[derive(Debug, Clone, Default)]
pub struct ExpandItem {
    pub property: Option<String>,
    pub entities: Vec<RawEntity>,
}

impl From<Value> for ExpandItem {
    /// Lenient decode: a field of the wrong type is treated as missing.
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        let property = map
            .get("property")
            .and_then(Value::as_str)
            .map(str::to_string);

        let entities = match map.remove("entities") {
            Some(Value::Array(items)) => items.into_iter().map(RawEntity::from).collect(),
            _ => Vec::new(),
        };

        Self { property, entities }
    }
}

impl ExpandItem {
    /// Labels every related entity except those pointing back at `source_id`.
    pub fn into_group(self, source_id: &str) -> ExpansionGroup {
        let entities = self
            .entities
            .iter()
            .filter(|entity| !entity.refers_to(source_id))
            .map(|entity| entity.normalize().with_property(self.property.clone()))
            .collect();

        ExpansionGroup {
            property: self.property,
            entities,
        }
    }
}

/// One hit from `GET /entities/{id}/similar`.
#[derive(Debug, Clone, Default)]
pub struct SimilarItem {
    pub entity: RawEntity,
}

impl From<Value> for SimilarItem {
    fn from(value: Value) -> Self {
        let entity = match value {
            Value::Object(mut map) => map.remove("entity").map(RawEntity::from),
            _ => None,
        };
        Self {
            entity: entity.unwrap_or_default(),
        }
    }
}

impl SimilarItem {
    pub fn into_normalized(self) -> NormalizedEntity {
        self.entity
            .normalize()
            .with_relation(Relation::Similar)
    }
}
