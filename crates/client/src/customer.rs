//! Customer resource client.
//!
//! Every mutation is followed by exactly one full re-fetch, so after a
//! successful call the local collection is whatever the server listed. A
//! failed re-fetch does not fail the mutation: the write already landed, and
//! the collection keeps what it held before.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use stockpad_auth::{Authorization, SessionStore};
use stockpad_core::{Customer, CustomerDraft, CustomerUuid, EntityId};

use crate::dto::CustomerListResponse;
use crate::error::ClientResult;
use crate::http::{decode, ApiClient};
use crate::status::{OperationStatus, StatusSlot};

pub struct CustomerClient {
    api: ApiClient,
    session: Arc<SessionStore>,
    customers: RwLock<Vec<Customer>>,
    status: StatusSlot,
}

impl CustomerClient {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            customers: RwLock::new(Vec::new()),
            status: StatusSlot::new(),
        }
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.customers.read().await.clone()
    }

    pub async fn status(&self) -> OperationStatus {
        self.status.current().await
    }

    /// Mutations re-list afterwards, and listing is entity-scoped, so every
    /// customer call needs both.
    async fn credentials(&self) -> ClientResult<(Authorization, EntityId)> {
        let auth = self.session.authorization().await?;
        let entity_id = auth.entity_id()?;
        Ok((auth, entity_id))
    }

    async fn refresh(&self, auth: &Authorization, entity_id: EntityId) -> ClientResult<Vec<Customer>> {
        let body = self
            .api
            .get(&format!("inventory/customers/list/{entity_id}"), Some(auth))
            .await?;
        let listed = decode::<CustomerListResponse>(body)?
            .customer
            .unwrap_or_default();

        *self.customers.write().await = listed.clone();
        tracing::debug!(count = listed.len(), "customers refreshed");
        Ok(listed)
    }

    async fn refresh_after(&self, operation: &'static str, auth: &Authorization, entity_id: EntityId) {
        if let Err(err) = self.refresh(auth, entity_id).await {
            tracing::warn!(operation, error = %err, "re-fetch after mutation failed, collection is stale");
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<Customer>> {
        self.status
            .track("customer.list", "Failed to fetch customers.", async {
                let (auth, entity_id) = self.credentials().await?;
                self.refresh(&auth, entity_id).await
            })
            .await
    }

    pub async fn create(&self, draft: CustomerDraft) -> ClientResult<Value> {
        self.status
            .track("customer.create", "Failed to create customer.", async {
                let (auth, entity_id) = self.credentials().await?;
                let draft = draft.scoped_to(entity_id);
                let body = self
                    .api
                    .post("inventory/customers/add/", Some(&auth), &draft)
                    .await?;

                self.refresh_after("customer.create", &auth, entity_id).await;
                Ok(body)
            })
            .await
    }

    pub async fn update(&self, uuid: &CustomerUuid, draft: &CustomerDraft) -> ClientResult<Value> {
        self.status
            .track("customer.update", "Failed to update customer.", async {
                let (auth, entity_id) = self.credentials().await?;
                let body = self
                    .api
                    .put(&format!("inventory/customers/{uuid}/"), Some(&auth), draft)
                    .await?;

                self.refresh_after("customer.update", &auth, entity_id).await;
                Ok(body)
            })
            .await
    }

    pub async fn delete(&self, uuid: &CustomerUuid) -> ClientResult<Value> {
        self.status
            .track("customer.delete", "Failed to delete customer.", async {
                let (auth, entity_id) = self.credentials().await?;
                let body = self
                    .api
                    .delete(&format!("inventory/customers/{uuid}/"), Some(&auth))
                    .await?;

                self.refresh_after("customer.delete", &auth, entity_id).await;
                Ok(body)
            })
            .await
    }
}
