//! Path-based reduction of the state tree to the persisted subset.

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::path::StatePath;

/// Sparse copy of `state` holding only the sub-trees addressed by `paths`.
///
/// With no paths the whole state is persisted and is borrowed unchanged.
/// Absent or null values leave their intermediate objects in place but
/// never produce a leaf.
pub fn reduce<'a>(state: &'a Value, paths: &[StatePath]) -> Cow<'a, Value> {
    if paths.is_empty() {
        return Cow::Borrowed(state);
    }
    let mut acc = Value::Object(Map::new());
    for path in paths {
        path.assign(&mut acc, path.lookup(state).cloned());
    }
    Cow::Owned(acc)
}
