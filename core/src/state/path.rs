//! Dotted addresses into the state tree.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::SyncError;

/// Separator used by namespaced mutation types.
pub const NAMESPACE_SEPARATOR: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatePath {
    segments: Vec<String>,
}

impl StatePath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path in mutation-type form: `"foo.bar"` becomes `"foo/bar"`.
    pub fn namespace(&self) -> String {
        self.segments.join(NAMESPACE_SEPARATOR)
    }

    /// Value addressed by this path. Array elements are reachable through
    /// numeric segments.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Write `value` at this path inside `root`, creating intermediate
    /// objects as needed. Missing intermediates are always created; the leaf
    /// is only set for a present, non-null value. Without such a value an
    /// existing non-object intermediate is left as it is.
    pub fn assign(&self, root: &mut Value, value: Option<Value>) {
        let Some((leaf, parents)) = self.segments.split_last() else {
            return;
        };
        let value = value.filter(|v| !v.is_null());
        let overwrite = value.is_some();
        let Some(mut node) = as_object(root, overwrite) else {
            return;
        };
        for segment in parents {
            let child = node
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            let Some(next) = as_object(child, overwrite) else {
                return;
            };
            node = next;
        }
        if let Some(value) = value {
            node.insert(leaf.clone(), value);
        }
    }
}

/// Object view of `value`, turning a non-object into `{}` only when
/// `overwrite` is set.
fn as_object(value: &mut Value, overwrite: bool) -> Option<&mut Map<String, Value>> {
    if !value.is_object() {
        if !overwrite {
            return None;
        }
        *value = Value::Object(Map::new());
    }
    value.as_object_mut()
}

impl FromStr for StatePath {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = s.split('.').map(str::to_string).collect();
        if s.is_empty() || segments.iter().any(String::is_empty) {
            return Err(SyncError::Config(format!(
                "path {s:?} has an empty segment"
            )));
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for StatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
