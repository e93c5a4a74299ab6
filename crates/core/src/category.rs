use serde::{Deserialize, Serialize};

use crate::id::CategoryId;

/// Inventory category, scoped to an entity by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub category_name: String,
}

impl Category {
    pub fn new(id: CategoryId, category_name: impl Into<String>) -> Self {
        Self {
            id,
            category_name: category_name.into(),
        }
    }

    /// Rename in place. Identity is untouched.
    pub fn rename(&mut self, category_name: impl Into<String>) {
        self.category_name = category_name.into();
    }
}
