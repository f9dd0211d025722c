//! Snapshot loading and rehydration.

use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::hooks::Transform;
use crate::state::merge_snapshot;
use crate::storage::StorageAdapter;

/// Raw value some writers leave behind for a missing snapshot.
const UNDEFINED_LITERAL: &str = "undefined";

/// Read and decode the snapshot stored under `key`.
///
/// Absent keys, the `"undefined"` literal and a stored JSON `null` all mean
/// there is no snapshot.
pub async fn load_snapshot(
    storage: &dyn StorageAdapter,
    key: &str,
    after_load: &dyn Transform,
) -> Result<Option<Value>> {
    let raw = storage
        .get_item(key)
        .await
        .map_err(|e| SyncError::storage("get", key, e))?;
    let raw = match raw {
        Some(raw) if raw != UNDEFINED_LITERAL => raw,
        _ => return Ok(None),
    };
    let decoded = after_load.apply(raw).await.map_err(SyncError::Decode)?;
    let snapshot: Value = serde_json::from_str(&decoded)?;
    Ok(Some(snapshot).filter(|v| !v.is_null()))
}

/// State that should replace `current`, or `None` when the snapshot is a
/// scalar and nothing should change.
pub fn rehydrate(current: Value, snapshot: Value) -> Option<Value> {
    match snapshot {
        Value::Object(_) | Value::Array(_) => Some(merge_snapshot(current, snapshot)),
        other => {
            tracing::warn!(snapshot = %other, "ignoring non-container snapshot");
            None
        }
    }
}
