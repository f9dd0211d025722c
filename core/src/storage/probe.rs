use super::traits::StorageAdapter;

pub const PROBE_KEY: &str = "__statesync_probe__";

/// Checks that `storage` accepts writes by round-tripping a sentinel value.
///
/// Never errors: any failure or mismatch reports the backend as unusable.
pub async fn probe_storage(storage: &dyn StorageAdapter) -> bool {
    let sentinel = PROBE_KEY.to_string();
    if let Err(e) = storage.set_item(PROBE_KEY, sentinel.clone()).await {
        tracing::debug!(storage = storage.name(), error = %e, "storage probe write failed");
        return false;
    }
    let read_back = match storage.get_item(PROBE_KEY).await {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(storage = storage.name(), error = %e, "storage probe read failed");
            return false;
        }
    };
    if let Err(e) = storage.remove_item(PROBE_KEY).await {
        tracing::debug!(storage = storage.name(), error = %e, "storage probe remove failed");
        return false;
    }
    read_back.as_deref() == Some(sentinel.as_str())
}
