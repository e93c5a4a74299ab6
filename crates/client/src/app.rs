//! Application context: the one owner of session and clients.

use std::sync::Arc;

use stockpad_auth::{authorize_navigation, GateDecision, SessionStorage, SessionStore, StorageError};

use crate::category::CategoryClient;
use crate::config::ClientConfig;
use crate::customer::CustomerClient;
use crate::events::EventBus;
use crate::http::ApiClient;
use crate::identity::IdentityClient;
use crate::storage::SqliteStorage;

/// Everything a front end needs, wired to a single shared session.
pub struct AppContext {
    config: ClientConfig,
    session: Arc<SessionStore>,
    events: EventBus,
    identity: IdentityClient,
    categories: CategoryClient,
    customers: CustomerClient,
}

impl AppContext {
    /// Open durable storage from `config` and restore the previous session.
    pub async fn bootstrap(config: ClientConfig) -> anyhow::Result<Self> {
        let storage = SqliteStorage::open(&config.session_db_path()).await?;
        let ctx = Self::with_storage(config, Arc::new(storage)).await?;
        Ok(ctx)
    }

    /// Build over any storage backend. The session is restored exactly once,
    /// here, before any client can read it.
    pub async fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, StorageError> {
        let session = Arc::new(SessionStore::restore(storage).await?);
        let events = EventBus::default();
        let api = ApiClient::new(config.api_url.clone());

        tracing::info!(api_url = %config.api_url, "client context ready");

        Ok(Self {
            identity: IdentityClient::new(api.clone(), session.clone(), events.clone()),
            categories: CategoryClient::new(api.clone(), session.clone()),
            customers: CustomerClient::new(api, session.clone()),
            config,
            session,
            events,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn identity(&self) -> &IdentityClient {
        &self.identity
    }

    pub fn categories(&self) -> &CategoryClient {
        &self.categories
    }

    pub fn customers(&self) -> &CustomerClient {
        &self.customers
    }

    /// Run the gate for one navigation and announce where it lands.
    pub async fn navigate(&self, path: &str) -> GateDecision {
        let decision = authorize_navigation(path, self.session.is_authenticated().await);
        self.events.navigate(decision.route());
        decision
    }
}
