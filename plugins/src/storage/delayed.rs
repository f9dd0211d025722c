use std::time::Duration;

use async_trait::async_trait;
use statesync_core::storage::StorageAdapter;

/// Adds a fixed latency before every operation of the wrapped backend.
#[derive(Debug, Clone)]
pub struct DelayedStorage<S> {
    inner: S,
    latency: Duration,
}

impl<S> DelayedStorage<S> {
    pub fn new(inner: S, latency: Duration) -> Self {
        Self { inner, latency }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: StorageAdapter> StorageAdapter for DelayedStorage<S> {
    fn name(&self) -> &str {
        "delayed"
    }

    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        tokio::time::sleep(self.latency).await;
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> anyhow::Result<()> {
        tokio::time::sleep(self.latency).await;
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        tokio::time::sleep(self.latency).await;
        self.inner.remove_item(key).await
    }
}
