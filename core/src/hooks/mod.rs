//! `afterLoad` / `beforeSave` transform hooks.
//!
//! Every hook is awaited, whether the underlying work is synchronous or not.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

#[async_trait]
pub trait Transform: Send + Sync {
    async fn apply(&self, raw: String) -> anyhow::Result<String>;
}

/// Passes the value through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

#[async_trait]
impl Transform for Identity {
    async fn apply(&self, raw: String) -> anyhow::Result<String> {
        Ok(raw)
    }
}

/// Hook backed by an async closure.
pub struct FnTransform<F>(F);

#[async_trait]
impl<F, Fut> Transform for FnTransform<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<String>> + Send,
{
    async fn apply(&self, raw: String) -> anyhow::Result<String> {
        (self.0)(raw).await
    }
}

/// Hook backed by a plain closure.
pub struct SyncTransform<F>(F);

#[async_trait]
impl<F> Transform for SyncTransform<F>
where
    F: Fn(String) -> anyhow::Result<String> + Send + Sync,
{
    async fn apply(&self, raw: String) -> anyhow::Result<String> {
        (self.0)(raw)
    }
}

pub fn identity() -> Arc<dyn Transform> {
    Arc::new(Identity)
}

pub fn transform_fn<F, Fut>(f: F) -> Arc<dyn Transform>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    Arc::new(FnTransform(f))
}

pub fn sync_transform<F>(f: F) -> Arc<dyn Transform>
where
    F: Fn(String) -> anyhow::Result<String> + Send + Sync + 'static,
{
    Arc::new(SyncTransform(f))
}
