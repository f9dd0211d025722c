use std::sync::Arc;

use crate::config::{PersistConfig, ThrottleConfig};
use crate::hooks::{identity, Transform};
use crate::storage::StorageAdapter;

/// Everything the engine needs, fixed for the lifetime of an engine.
#[derive(Clone)]
pub struct PersistOptions {
    pub storage: Arc<dyn StorageAdapter>,
    pub config: PersistConfig,
    /// Turns the stored raw value into JSON text.
    pub after_load: Arc<dyn Transform>,
    /// Turns JSON text into the raw value to store.
    pub before_save: Arc<dyn Transform>,
}

impl PersistOptions {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            config: PersistConfig::default(),
            after_load: identity(),
            before_save: identity(),
        }
    }

    pub fn with_config(mut self, config: PersistConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.config.key = key.into();
        self
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_throttle(mut self, throttle_ms: u64, edges: ThrottleConfig) -> Self {
        self.config.throttle_ms = throttle_ms;
        self.config.throttle = edges;
        self
    }

    pub fn with_initial_set(mut self, initial_set: bool) -> Self {
        self.config.initial_set = initial_set;
        self
    }

    pub fn with_after_load(mut self, hook: Arc<dyn Transform>) -> Self {
        self.after_load = hook;
        self
    }

    pub fn with_before_save(mut self, hook: Arc<dyn Transform>) -> Self {
        self.before_save = hook;
        self
    }
}
