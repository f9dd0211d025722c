#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use statesync_core::hooks::{sync_transform, transform_fn, Transform};
use statesync_core::storage::{MemoryStorage, StorageAdapter, PROBE_KEY};

pub const PREFIX: &str = "<>";

/// Memory storage that records every write outside the probe key and can
/// simulate a slow backend.
#[derive(Clone, Default)]
pub struct RecordingStorage {
    pub inner: MemoryStorage,
    writes: Arc<Mutex<Vec<String>>>,
    latency: Option<Duration>,
    failing_reads: bool,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStorage::with_items([(key, value)]),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reads of any key other than the probe key fail.
    pub fn with_failing_reads(mut self) -> Self {
        self.failing_reads = true;
        self
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.inner.raw(key).await
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl StorageAdapter for RecordingStorage {
    fn name(&self) -> &str {
        "recording"
    }

    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.delay().await;
        if self.failing_reads && key != PROBE_KEY {
            anyhow::bail!("storage unavailable");
        }
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.delay().await;
        if key != PROBE_KEY {
            self.writes.lock().unwrap().push(value.clone());
        }
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.delay().await;
        self.inner.remove_item(key).await
    }
}

pub fn prefixed(s: &str) -> String {
    format!("{PREFIX}{s}")
}

pub fn add_prefix() -> Arc<dyn Transform> {
    sync_transform(|s| Ok(prefixed(&s)))
}

pub fn strip_prefix() -> Arc<dyn Transform> {
    sync_transform(|s| {
        s.strip_prefix(PREFIX)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("missing prefix"))
    })
}

pub fn add_prefix_async() -> Arc<dyn Transform> {
    transform_fn(|s: String| async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(prefixed(&s))
    })
}

pub fn strip_prefix_async() -> Arc<dyn Transform> {
    transform_fn(|s: String| async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        s.strip_prefix(PREFIX)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("missing prefix"))
    })
}

/// Identity hook whose delay grows by `step` on every call.
pub fn increasingly_slow(first: u64, step: u64) -> Arc<dyn Transform> {
    let delay = Arc::new(AtomicU64::new(first));
    transform_fn(move |s: String| {
        let ms = delay.fetch_add(step, Ordering::SeqCst);
        async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(s)
        }
    })
}

/// Route engine logs to the test output; `RUST_LOG=statesync_core=debug`
/// shows the write pipeline decisions.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Let spawned tasks run and move the paused clock forward by `ms`.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
