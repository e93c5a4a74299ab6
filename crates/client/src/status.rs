//! Per-module `loading`/`error` register.
//!
//! One slot per module, overwritten by every call. Overlapping calls on the
//! same module race on it and the last writer wins.

use std::future::Future;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::ClientResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct StatusSlot {
    inner: RwLock<OperationStatus>,
}

impl StatusSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> OperationStatus {
        self.inner.read().await.clone()
    }

    async fn begin(&self) {
        *self.inner.write().await = OperationStatus {
            loading: true,
            error: None,
        };
    }

    async fn finish(&self, error: Option<String>) {
        *self.inner.write().await = OperationStatus {
            loading: false,
            error,
        };
    }

    /// Run one operation under this slot.
    ///
    /// On failure the display message (server message, else `fallback`) is
    /// recorded and the original error is returned untouched.
    pub async fn track<T, F>(&self, operation: &'static str, fallback: &str, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        self.begin().await;
        match fut.await {
            Ok(value) => {
                self.finish(None).await;
                tracing::info!(operation, "operation succeeded");
                Ok(value)
            }
            Err(err) => {
                let message = err.display_message(fallback);
                tracing::warn!(operation, error = %err, message = %message, "operation failed");
                self.finish(Some(message)).await;
                Err(err)
            }
        }
    }
}
