//! Session state holder mirrored to durable storage.
//!
//! Every mutation takes the writer lock, commits the storage batch, and only
//! then updates memory. A failed storage write leaves memory untouched, so the
//! two copies cannot drift apart.

use std::sync::Arc;

use tokio::sync::RwLock;

use stockpad_core::{Entity, EntityId, Individual};

use crate::session::{Authorization, Session, SessionError, SignedIn, Token};
use crate::storage::{
    ENTITY_KEY, INDIVIDUAL_KEY, SessionStorage, StorageError, StorageWrite, TOKEN_KEY,
};

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<Session>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Rehydrate from durable storage.
    ///
    /// This is the only place storage is read, so a store is always hydrated
    /// exactly once before its first read.
    pub async fn restore(storage: Arc<dyn SessionStorage>) -> Result<Self, StorageError> {
        let token = storage
            .get(TOKEN_KEY)
            .await?
            .and_then(|raw| Token::new(raw));

        let entity = match storage.get(ENTITY_KEY).await? {
            Some(raw) => Entity::from_json(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding unreadable stored entity");
                None
            }),
            None => None,
        };

        let individual = match storage.get(INDIVIDUAL_KEY).await? {
            Some(raw) => Individual::from_json(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding unreadable stored individual");
                None
            }),
            None => None,
        };

        let session = Session {
            individual,
            entity,
            token,
        };

        tracing::debug!(
            authenticated = session.is_authenticated(),
            entity_id = ?session.entity_id(),
            "session restored"
        );

        Ok(Self {
            storage,
            state: RwLock::new(session),
        })
    }

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn token(&self) -> Option<Token> {
        self.state.read().await.token.clone()
    }

    pub async fn entity_id(&self) -> Option<EntityId> {
        self.state.read().await.entity_id()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Capture credentials for one request, failing fast when signed out.
    pub async fn authorization(&self) -> Result<Authorization, SessionError> {
        let state = self.state.read().await;
        let token = state.token.clone().ok_or(SessionError::MissingToken)?;
        Ok(Authorization {
            token,
            entity_id: state.entity_id(),
        })
    }

    /// Commit a successful sign-in to storage and memory.
    pub async fn establish(&self, signed_in: SignedIn) -> Result<(), StorageError> {
        let mut state = self.state.write().await;

        let writes = vec![
            StorageWrite::Set {
                key: TOKEN_KEY,
                value: signed_in.token.as_str().to_string(),
            },
            StorageWrite::Set {
                key: ENTITY_KEY,
                value: encode(ENTITY_KEY, &signed_in.entity)?,
            },
            StorageWrite::Set {
                key: INDIVIDUAL_KEY,
                value: encode(INDIVIDUAL_KEY, &signed_in.individual)?,
            },
        ];
        self.storage.apply(writes).await?;

        *state = Session::from(signed_in);
        tracing::info!(entity_id = ?state.entity_id(), "session established");
        Ok(())
    }

    /// Forget the session, in storage and in memory.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().await;

        self.storage
            .apply(vec![
                StorageWrite::Remove { key: TOKEN_KEY },
                StorageWrite::Remove { key: INDIVIDUAL_KEY },
                StorageWrite::Remove { key: ENTITY_KEY },
            ])
            .await?;

        *state = Session::default();
        tracing::info!("session cleared");
        Ok(())
    }
}

fn encode<T: serde::Serialize>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use async_trait::async_trait;
    use serde_json::json;
    use stockpad_core::IndividualId;

    fn signed_in() -> SignedIn {
        SignedIn {
            token: Token::new("tok-1").unwrap(),
            entity: Some(serde_json::from_value(json!({ "id": 12, "name": "Acme" })).unwrap()),
            individual: Some(Individual::with_id(IndividualId::new(5))),
        }
    }

    /// Storage that refuses every write.
    struct ReadOnlyStorage;

    #[async_trait]
    impl SessionStorage for ReadOnlyStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn apply(&self, _writes: Vec<StorageWrite>) -> Result<(), StorageError> {
            Err(StorageError::Backend("read-only".to_string()))
        }
    }

    #[tokio::test]
    async fn restore_from_empty_storage_is_signed_out() {
        let store = SessionStore::restore(Arc::new(InMemoryStorage::new()))
            .await
            .unwrap();

        assert_eq!(store.snapshot().await, Session::default());
        assert_eq!(store.authorization().await, Err(SessionError::MissingToken));
    }

    #[tokio::test]
    async fn establish_persists_all_three_keys() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = SessionStore::restore(storage.clone()).await.unwrap();

        store.establish(signed_in()).await.unwrap();

        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-1"));
        let entity: serde_json::Value =
            serde_json::from_str(&storage.get(ENTITY_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(entity, json!({ "id": 12, "name": "Acme" }));
        let individual: serde_json::Value =
            serde_json::from_str(&storage.get(INDIVIDUAL_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(individual, json!({ "id": 5 }));

        let session = store.snapshot().await;
        assert_eq!(session, Session::from(signed_in()));
        assert_eq!(store.entity_id().await, Some(EntityId::new(12)));
    }

    #[tokio::test]
    async fn session_survives_restart() {
        let storage = Arc::new(InMemoryStorage::new());
        let first = SessionStore::restore(storage.clone()).await.unwrap();
        first.establish(signed_in()).await.unwrap();

        let second = SessionStore::restore(storage).await.unwrap();
        assert_eq!(second.snapshot().await, first.snapshot().await);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let storage = Arc::new(InMemoryStorage::new());
        let store = SessionStore::restore(storage.clone()).await.unwrap();
        store.establish(signed_in()).await.unwrap();

        store.clear().await.unwrap();

        assert!(storage.is_empty().await);
        assert_eq!(store.snapshot().await, Session::default());
    }

    #[tokio::test]
    async fn clear_on_signed_out_session_is_harmless() {
        let storage = Arc::new(InMemoryStorage::with_entries([(ENTITY_KEY, "null")]));
        let store = SessionStore::restore(storage.clone()).await.unwrap();

        store.clear().await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_untouched() {
        let store = SessionStore::restore(Arc::new(ReadOnlyStorage)).await.unwrap();

        let err = store.establish(signed_in()).await.unwrap_err();
        assert_eq!(err, StorageError::Backend("read-only".to_string()));
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn corrupted_records_are_dropped_on_restore() {
        let storage = Arc::new(InMemoryStorage::with_entries([
            (TOKEN_KEY, "tok-9"),
            (ENTITY_KEY, "{broken"),
            (INDIVIDUAL_KEY, "null"),
        ]));
        let store = SessionStore::restore(storage).await.unwrap();

        let session = store.snapshot().await;
        assert_eq!(session.token, Token::new("tok-9"));
        assert_eq!(session.entity, None);
        assert_eq!(session.individual, None);

        let auth = store.authorization().await.unwrap();
        assert_eq!(auth.entity_id(), Err(SessionError::MissingEntity));
    }

    #[tokio::test]
    async fn empty_stored_token_counts_as_signed_out() {
        let storage = Arc::new(InMemoryStorage::with_entries([(TOKEN_KEY, "")]));
        let store = SessionStore::restore(storage).await.unwrap();
        assert!(!store.is_authenticated().await);
    }
}
