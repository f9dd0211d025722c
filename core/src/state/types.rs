//! Mutation notifications emitted by a state container.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Descriptor of a single mutation. `kind` is the namespaced mutation type,
/// e.g. `"cart/items/add"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Mutation {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// A mutation together with the state it produced.
#[derive(Debug, Clone)]
pub struct MutationEvent {
    pub mutation: Mutation,
    pub state: Arc<Value>,
}

impl MutationEvent {
    pub fn new(mutation: Mutation, state: Value) -> Self {
        Self {
            mutation,
            state: Arc::new(state),
        }
    }
}
