// file: src/models/normalized.rs
// description: flattened entity records produced for display
// reference: internal data structures

use serde::{Deserialize, Serialize};

pub const UNKNOWN_ID: &str = "Unknown ID";
pub const UNKNOWN_SCHEMA: &str = "Unknown Type";
pub const NO_LABEL: &str = "No Label";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Similar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntity {
    pub id: String,
    pub schema: String,
    pub label: String,

    /// Property of the source entity this one was reached through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

impl NormalizedEntity {
    pub fn with_property(mut self, property: Option<String>) -> Self {
        self.property = property;
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = Some(relation);
        self
    }

    pub fn format_line(&self) -> String {
        format!("{} [{}] ({})", self.label, self.schema, self.id)
    }
}

/// Entities reachable from a source entity through one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    pub entities: Vec<NormalizedEntity>,
}

impl ExpansionGroup {
    pub fn property_name(&self) -> &str {
        self.property.as_deref().unwrap_or("(unnamed)")
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
