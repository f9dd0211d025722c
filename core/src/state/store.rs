//! Reference state container.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use super::container::{StateContainer, Subscription};
use super::types::{Mutation, MutationEvent};

const EVENT_CAPACITY: usize = 1000;

#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<Value>,
    event_tx: broadcast::Sender<MutationEvent>,
}

impl Store {
    pub fn new(state: Value) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let inner = StoreInner {
            state: RwLock::new(state),
            event_tx,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Apply a mutation and notify subscribers with the resulting state.
    pub async fn commit<F>(&self, kind: impl Into<String>, payload: Option<Value>, f: F)
    where
        F: FnOnce(&mut Value),
    {
        let mutation = Mutation {
            kind: kind.into(),
            payload,
        };
        // Emit under the write lock so events follow the order mutations
        // were applied in.
        let mut state = self.inner.state.write().await;
        f(&mut state);
        self.notify(mutation, state.clone());
    }

    /// Notify subscribers of a mutation without touching the held state.
    pub fn notify(&self, mutation: Mutation, state: Value) {
        let _ = self
            .inner
            .event_tx
            .send(MutationEvent::new(mutation, state));
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.event_tx.receiver_count()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Value::Object(Default::default()))
    }
}

#[async_trait]
impl StateContainer for Store {
    async fn state(&self) -> Value {
        self.inner.state.read().await.clone()
    }

    async fn replace_state(&self, state: Value) {
        *self.inner.state.write().await = state;
    }

    fn subscribe(&self) -> Subscription {
        Subscription::new(self.inner.event_tx.subscribe())
    }
}
