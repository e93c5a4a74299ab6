//! Category resource client.
//!
//! The local collection is kept in step by splicing: delete filters by id,
//! update patches the name in place. Only `list` replaces it wholesale.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use stockpad_auth::{Authorization, SessionStore};
use stockpad_core::{Category, CategoryId, EntityId};

use crate::dto::{self, CategoryListResponse, CategoryRename, NewCategory};
use crate::error::ClientResult;
use crate::http::{decode, ApiClient};
use crate::status::{OperationStatus, StatusSlot};

pub struct CategoryClient {
    api: ApiClient,
    session: Arc<SessionStore>,
    categories: RwLock<Vec<Category>>,
    status: StatusSlot,
}

impl CategoryClient {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            categories: RwLock::new(Vec::new()),
            status: StatusSlot::new(),
        }
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.categories.read().await.clone()
    }

    pub async fn status(&self) -> OperationStatus {
        self.status.current().await
    }

    /// Token and entity are both required before anything goes on the wire.
    async fn credentials(&self) -> ClientResult<(Authorization, EntityId)> {
        let auth = self.session.authorization().await?;
        let entity_id = auth.entity_id()?;
        Ok((auth, entity_id))
    }

    pub async fn add(&self, category_name: &str) -> ClientResult<Value> {
        self.status
            .track("category.add", "Error adding category", async {
                let (auth, entity_id) = self.credentials().await?;
                let body = self
                    .api
                    .post(
                        "inventory/category/add/",
                        Some(&auth),
                        &NewCategory {
                            category_name,
                            entity_id,
                        },
                    )
                    .await?;

                if let Some(created) = dto::created_category(&body) {
                    let mut categories = self.categories.write().await;
                    if !categories.iter().any(|c| c.id == created.id) {
                        categories.push(created);
                    }
                }
                Ok(body)
            })
            .await
    }

    pub async fn list(&self) -> ClientResult<Vec<Category>> {
        self.status
            .track("category.list", "Error fetching categories", async {
                let (auth, entity_id) = self.credentials().await?;
                let body = self
                    .api
                    .get(&format!("inventory/category/list/{entity_id}/"), Some(&auth))
                    .await?;
                let listed = decode::<CategoryListResponse>(body)?
                    .categories
                    .unwrap_or_default();

                *self.categories.write().await = listed.clone();
                Ok(listed)
            })
            .await
    }

    pub async fn update(&self, id: CategoryId, category_name: &str) -> ClientResult<Value> {
        self.status
            .track("category.update", "Error updating category", async {
                let (auth, _) = self.credentials().await?;
                let body = self
                    .api
                    .put(
                        &format!("inventory/category/{id}/update/"),
                        Some(&auth),
                        &CategoryRename { category_name },
                    )
                    .await?;

                let mut categories = self.categories.write().await;
                if let Some(existing) = categories.iter_mut().find(|c| c.id == id) {
                    existing.rename(category_name);
                }
                Ok(body)
            })
            .await
    }

    pub async fn delete(&self, id: CategoryId) -> ClientResult<Value> {
        self.status
            .track("category.delete", "Error deleting category", async {
                let (auth, _) = self.credentials().await?;
                let body = self
                    .api
                    .delete(&format!("inventory/category/{id}/delete/"), Some(&auth))
                    .await?;

                self.categories.write().await.retain(|c| c.id != id);
                Ok(body)
            })
            .await
    }
}
