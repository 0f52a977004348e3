// file: src/models/entity.rs
// description: raw Aleph entity records and null-safe property access
// reference: https://redocly.github.io/redoc/?url=https://aleph.occrp.org/api/openapi.json

use super::normalized::{NO_LABEL, NormalizedEntity, UNKNOWN_ID, UNKNOWN_SCHEMA};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Properties consulted for a display label, highest priority first.
pub const LABEL_PRIORITY: [&str; 9] = [
    "name",
    "label",
    "title",
    "full",
    "namesMentioned",
    "entity",
    "description",
    "alias",
    "member",
];

pub const MEMBERSHIP_SCHEMA: &str = "Membership";

/// Read-only view of an entity's `properties` object.
#[derive(Debug, Clone, Copy)]
pub struct Properties<'a>(&'a Map<String, Value>);

impl<'a> Properties<'a> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    /// First value of `key` when it is a non-empty string.
    ///
    /// Only the first element is considered, so `["", "x"]` counts as
    /// absent. A bare scalar is treated as a one-element sequence.
    pub fn first(&self, key: &str) -> Option<&'a str> {
        match self.0.get(key)? {
            Value::Array(values) => values.first().and_then(non_empty_str),
            other => non_empty_str(other),
        }
    }

    /// Whether any value of `key` refers to `needle`, either as a plain
    /// string or as a nested entity with that id.
    pub fn contains(&self, key: &str, needle: &str) -> bool {
        let refers = |value: &Value| match value {
            Value::String(s) => s == needle,
            Value::Object(nested) => nested.get("id").and_then(Value::as_str) == Some(needle),
            _ => false,
        };

        match self.0.get(key) {
            Some(Value::Array(values)) => values.iter().any(refers),
            Some(other) => refers(other),
            None => false,
        }
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// An entity exactly as the API sent it.
///
/// Nothing is decoded up front: accessors read fields on demand and treat
/// a missing field, `null` or a value of the wrong type as absent, so any
/// object round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEntity(Map<String, Value>);

impl From<Value> for RawEntity {
    /// Anything other than an object becomes an empty record.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl From<Map<String, Value>> for RawEntity {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl RawEntity {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(non_empty_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.text("id")
    }

    pub fn schema(&self) -> Option<&str> {
        self.text("schema")
    }

    /// Server-computed caption, checked at the `label` slot of the priority.
    pub fn caption(&self) -> Option<&str> {
        self.text("label")
    }

    pub fn properties(&self) -> Option<Properties<'_>> {
        self.0
            .get("properties")
            .and_then(Value::as_object)
            .map(Properties)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties().and_then(|p| p.first(key))
    }

    fn label_candidate(&self, key: &str) -> Option<&str> {
        if key == "label" {
            if let Some(caption) = self.caption() {
                return Some(caption);
            }
        }
        self.property(key)
    }

    /// Resolves the display label; never returns an empty string.
    pub fn display_label(&self) -> &str {
        LABEL_PRIORITY
            .iter()
            .find_map(|key| self.label_candidate(key))
            .unwrap_or(NO_LABEL)
    }

    pub fn is_membership(&self) -> bool {
        self.schema() == Some(MEMBERSHIP_SCHEMA)
    }

    /// True when this entity points back at `entity_id` and should not be
    /// listed as one of its relations.
    pub fn refers_to(&self, entity_id: &str) -> bool {
        let member_match = self.is_membership()
            && self
                .properties()
                .is_some_and(|p| p.contains("member", entity_id));

        member_match || self.id() == Some(entity_id)
    }

    pub fn normalize(&self) -> NormalizedEntity {
        NormalizedEntity {
            id: self.id().unwrap_or(UNKNOWN_ID).to_string(),
            schema: self.schema().unwrap_or(UNKNOWN_SCHEMA).to_string(),
            label: self.display_label().to_string(),
            property: None,
            relation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_label_follows_priority() {
        // each step adds a higher-priority key, which must take over
        let mut properties = Map::new();
        for key in LABEL_PRIORITY.iter().rev() {
            properties.insert(key.to_string(), json!([format!("from-{}", key)]));
            let entity = RawEntity::from(json!({
                "id": "e1",
                "schema": "Thing",
                "properties": properties.clone()
            }));
            assert_eq!(entity.display_label(), format!("from-{}", key));
        }
    }

    #[test]
    fn test_label_defaults_when_nothing_present() {
        let entity = RawEntity::from(json!({
            "id": "e1",
            "schema": "Person",
            "properties": { "country": ["gb"] }
        }));
        assert_eq!(entity.display_label(), NO_LABEL);

        assert_eq!(RawEntity::from(json!({})).display_label(), NO_LABEL);
        assert_eq!(RawEntity::from(json!("e1")).display_label(), NO_LABEL);
    }

    #[test]
    fn test_label_skips_empty_and_null_values() {
        let entity = RawEntity::from(json!({
            "properties": {
                "name": [],
                "title": [""],
                "full": [null, "ignored"],
                "namesMentioned": null,
                "entity": [42],
                "alias": ["Johnny"]
            }
        }));
        assert_eq!(entity.display_label(), "Johnny");
    }

    #[test]
    fn test_top_level_label_outranks_property_label() {
        let entity = RawEntity::from(json!({
            "label": "Caption",
            "properties": { "label": ["Property label"], "title": ["Dr."] }
        }));
        assert_eq!(entity.display_label(), "Caption");

        let entity = RawEntity::from(json!({
            "label": "",
            "properties": { "label": ["Property label"] }
        }));
        assert_eq!(entity.display_label(), "Property label");
    }

    #[test]
    fn test_scalar_property_is_accepted() {
        let entity = RawEntity::from(json!({
            "properties": { "member": "e1", "name": "Solo" }
        }));
        let properties = entity.properties().unwrap();
        assert_eq!(properties.first("name"), Some("Solo"));
        assert!(properties.contains("member", "e1"));
    }

    #[test]
    fn test_wrong_types_count_as_absent() {
        let entity = RawEntity::from(json!({
            "id": 7,
            "schema": null,
            "label": 42,
            "properties": ["not", "an", "object"]
        }));

        assert_eq!(entity.id(), None);
        assert!(entity.properties().is_none());

        let normalized = entity.normalize();
        assert_eq!(normalized.id, UNKNOWN_ID);
        assert_eq!(normalized.schema, UNKNOWN_SCHEMA);
        assert_eq!(normalized.label, NO_LABEL);
    }

    #[test]
    fn test_membership_referring_back_is_detected() {
        let membership = RawEntity::from(json!({
            "id": "m1",
            "schema": "Membership",
            "properties": { "member": ["e9", "e1"], "organization": ["o1"] }
        }));
        assert!(membership.refers_to("e1"));
        assert!(!membership.refers_to("o1"));

        let nested = RawEntity::from(json!({
            "id": "m2",
            "schema": "Membership",
            "properties": { "member": [{ "id": "e1", "schema": "Person" }] }
        }));
        assert!(nested.refers_to("e1"));
    }

    #[test]
    fn test_member_property_only_counts_for_memberships() {
        let directorship = RawEntity::from(json!({
            "id": "d1",
            "schema": "Directorship",
            "properties": { "member": ["e1"] }
        }));
        assert!(!directorship.refers_to("e1"));
        assert!(directorship.refers_to("d1"));
    }

    #[test]
    fn test_normalize_applies_defaults() {
        let normalized = RawEntity::from(json!({ "properties": { "name": ["Acme"] } })).normalize();
        assert_eq!(normalized.id, UNKNOWN_ID);
        assert_eq!(normalized.schema, UNKNOWN_SCHEMA);
        assert_eq!(normalized.label, "Acme");
        assert_eq!(normalized.property, None);
        assert_eq!(normalized.relation, None);
    }

    #[test]
    fn test_round_trip_keeps_nulls_and_unknown_fields() {
        let raw = json!({
            "id": "e1",
            "schema": "Person",
            "label": null,
            "properties": null,
            "collection": { "id": "7", "label": "Leaks" },
            "links": { "self": "https://aleph.occrp.org/api/2/entities/e1" }
        });
        let entity: RawEntity = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&entity).unwrap(), raw);
    }
}
