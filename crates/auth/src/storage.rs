//! Durable key/value storage for the session (the client's "local storage").

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Storage key holding the raw token string.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the entity record as JSON.
pub const ENTITY_KEY: &str = "entity";
/// Storage key holding the individual record as JSON.
pub const INDIVIDUAL_KEY: &str = "individual";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("failed to encode value for '{key}': {message}")]
    Encode { key: String, message: String },
}

/// A single mutation inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageWrite {
    Set { key: &'static str, value: String },
    Remove { key: &'static str },
}

/// String key/value store that survives process restarts.
///
/// `apply` must be all-or-nothing: the session relies on it to keep its three
/// keys consistent with memory.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn apply(&self, writes: Vec<StorageWrite>) -> Result<(), StorageError>;
}

/// Process-local storage (tests, ephemeral runs).
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded storage, as if a previous run had written these keys.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn apply(&self, writes: Vec<StorageWrite>) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        for write in writes {
            match write {
                StorageWrite::Set { key, value } => {
                    entries.insert(key.to_string(), value);
                }
                StorageWrite::Remove { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}
