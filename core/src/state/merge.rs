//! Rehydration merge of a persisted snapshot over live state.

use serde_json::Value;

/// Deep-merge `snapshot` over `current`.
///
/// Objects merge key by key; every other snapshot value, arrays included,
/// replaces what was there. Both trees are consumed: subtrees the snapshot
/// does not touch are moved into the result as-is, and recursion only
/// follows the snapshot's own (parser-bounded) depth.
pub fn merge_snapshot(current: Value, snapshot: Value) -> Value {
    match (current, snapshot) {
        (Value::Object(mut target), Value::Object(source)) => {
            for (key, incoming) in source {
                let merged = match target.remove(&key) {
                    Some(existing) => merge_snapshot(existing, incoming),
                    None => incoming,
                };
                target.insert(key, merged);
            }
            Value::Object(target)
        }
        (_, snapshot) => snapshot,
    }
}
