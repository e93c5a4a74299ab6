//! Tenant and profile records returned by sign-in.
//!
//! Both are opaque to the client apart from their `id`. Every other field is
//! kept verbatim so the record round-trips through durable storage unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::id::{EntityId, IndividualId};

/// Organization record that scopes inventory data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Authenticated user profile, distinct from the entity it acts on behalf of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IndividualId>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Entity {
    pub fn with_id(id: EntityId) -> Self {
        Self {
            id: Some(id),
            attributes: Map::new(),
        }
    }

    /// Decode from the JSON text kept in durable storage.
    pub fn from_json(raw: &str) -> CoreResult<Option<Self>> {
        decode_nullable(raw, "entity")
    }
}

impl Individual {
    pub fn with_id(id: IndividualId) -> Self {
        Self {
            id: Some(id),
            attributes: Map::new(),
        }
    }

    /// Decode from the JSON text kept in durable storage.
    pub fn from_json(raw: &str) -> CoreResult<Option<Self>> {
        decode_nullable(raw, "individual")
    }
}

/// Persisted records may be the literal `null`; that decodes to `None`.
fn decode_nullable<T>(raw: &str, what: &str) -> CoreResult<Option<T>>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str::<Option<T>>(raw)
        .map_err(|e| CoreError::malformed(format!("{what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_keeps_unknown_fields() {
        let raw = json!({ "id": 3, "name": "Acme", "plan": { "tier": "pro" } });
        let entity: Entity = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(entity.id, Some(EntityId::new(3)));
        assert_eq!(entity.attributes["name"], "Acme");
        assert_eq!(serde_json::to_value(&entity).unwrap(), raw);
    }

    #[test]
    fn entity_without_id_is_accepted() {
        let entity: Entity = serde_json::from_value(json!({ "name": "Acme" })).unwrap();
        assert_eq!(entity.id, None);
    }

    #[test]
    fn stored_null_decodes_to_none() {
        assert_eq!(Individual::from_json("null").unwrap(), None);
    }

    #[test]
    fn stored_garbage_is_malformed() {
        let err = Entity::from_json("{not json").unwrap_err();
        match err {
            CoreError::MalformedRecord(msg) => assert!(msg.starts_with("entity")),
            _ => panic!("Expected MalformedRecord"),
        }
    }
}
