use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use statesync_core::storage::{MemoryStorage, StorageAdapter};
use statesync_core::{PersistConfig, PersistOptions};

use crate::storage::{DelayedStorage, FileStorage};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    Memory,
    File {
        root: PathBuf,
        /// Artificial latency per operation, for exercising slow backends.
        #[serde(default)]
        latency_ms: u64,
    },
}

pub fn build_storage(cfg: &StorageConfig) -> Arc<dyn StorageAdapter> {
    match cfg {
        StorageConfig::Memory => Arc::new(MemoryStorage::new()),
        StorageConfig::File { root, latency_ms: 0 } => Arc::new(FileStorage::new(root.clone())),
        StorageConfig::File { root, latency_ms } => Arc::new(DelayedStorage::new(
            FileStorage::new(root.clone()),
            Duration::from_millis(*latency_ms),
        )),
    }
}

pub fn build_options(storage: &StorageConfig, persist: PersistConfig) -> PersistOptions {
    PersistOptions::new(build_storage(storage)).with_config(persist)
}
