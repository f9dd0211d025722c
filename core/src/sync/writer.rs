//! Versioned, race-safe snapshot writes.
//!
//! Every write attempt mints a [`SaveToken`]. After its `beforeSave` hook
//! resolves, the attempt commits only if its token is still the newest and
//! the writer has not been disabled. Commits are serialized, so a write that
//! passed the check always lands before any later one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{Result, SyncError};
use crate::hooks::Transform;
use crate::storage::StorageAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaveToken(u64);

/// Version counter owned by one writer.
#[derive(Debug, Default)]
pub struct SaveVersions {
    current: AtomicU64,
    disabled: AtomicBool,
}

impl SaveVersions {
    /// Mint a token and make it the current one.
    pub fn mint(&self) -> SaveToken {
        SaveToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: SaveToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }

    pub fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Committed,
    /// A newer write was started before this one could commit.
    Superseded,
    /// The writer was disabled by teardown.
    Disabled,
}

/// A write that has its token and serialized payload but has not run the
/// `beforeSave` hook yet.
#[derive(Debug)]
pub struct PendingWrite {
    token: SaveToken,
    raw: String,
}

impl PendingWrite {
    pub fn token(&self) -> SaveToken {
        self.token
    }
}

pub struct SnapshotWriter {
    storage: Arc<dyn StorageAdapter>,
    key: String,
    before_save: Arc<dyn Transform>,
    versions: SaveVersions,
    commit_lock: Mutex<()>,
}

impl SnapshotWriter {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        key: impl Into<String>,
        before_save: Arc<dyn Transform>,
    ) -> Self {
        Self {
            storage,
            key: key.into(),
            before_save,
            versions: SaveVersions::default(),
            commit_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize `reduced` and mint the token for it. Runs synchronously so
    /// tokens follow the order in which writes were started.
    pub fn begin(&self, reduced: &Value) -> Result<PendingWrite> {
        let raw = serde_json::to_string(reduced).map_err(SyncError::Serialize)?;
        Ok(PendingWrite {
            token: self.versions.mint(),
            raw,
        })
    }

    pub async fn commit(&self, pending: PendingWrite) -> Result<WriteOutcome> {
        let PendingWrite { token, raw } = pending;
        let encoded = self
            .before_save
            .apply(raw)
            .await
            .map_err(SyncError::Encode)?;

        let _guard = self.commit_lock.lock().await;
        if self.versions.is_disabled() {
            tracing::debug!(key = %self.key, ?token, "write discarded: writer disabled");
            return Ok(WriteOutcome::Disabled);
        }
        if !self.versions.is_current(token) {
            tracing::debug!(key = %self.key, ?token, "write discarded: superseded");
            return Ok(WriteOutcome::Superseded);
        }
        self.storage
            .set_item(&self.key, encoded)
            .await
            .map_err(|e| SyncError::storage("set", &self.key, e))?;
        tracing::debug!(key = %self.key, ?token, "snapshot written");
        Ok(WriteOutcome::Committed)
    }

    pub async fn write(&self, reduced: &Value) -> Result<WriteOutcome> {
        let pending = self.begin(reduced)?;
        self.commit(pending).await
    }

    /// Turn every current and future commit into a no-op.
    pub fn disable(&self) {
        self.versions.disable();
    }

    pub fn is_disabled(&self) -> bool {
        self.versions.is_disabled()
    }

    /// Disable the writer and delete the stored snapshot. Waits for a commit
    /// that is already writing, so nothing lands after the removal.
    pub async fn remove(&self) -> Result<()> {
        self.disable();
        let _guard = self.commit_lock.lock().await;
        self.storage
            .remove_item(&self.key)
            .await
            .map_err(|e| SyncError::storage("remove", &self.key, e))
    }
}
