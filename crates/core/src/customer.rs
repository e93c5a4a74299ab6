use serde::{Deserialize, Serialize};

use crate::id::{CustomerUuid, EntityId};

/// Customer record as listed by the backend.
///
/// Update/delete address a customer by `uuid`, never by the integer `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<CustomerUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Partial customer payload for create and update calls.
///
/// Absent fields are not serialized, so an update only touches what is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl CustomerDraft {
    /// Fill in the tenant scope unless the caller already chose one.
    pub fn scoped_to(mut self, entity_id: EntityId) -> Self {
        self.entity_id.get_or_insert(entity_id);
        self
    }
}
