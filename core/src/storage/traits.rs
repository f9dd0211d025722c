use async_trait::async_trait;

/// Async key-value backend. Implementations that are synchronous just
/// return immediately; the engine always awaits.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    fn name(&self) -> &str;
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set_item(&self, key: &str, value: String) -> anyhow::Result<()>;
    async fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}
