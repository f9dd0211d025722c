use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::types::MutationEvent;

/// The application state container the engine synchronizes.
#[async_trait]
pub trait StateContainer: Send + Sync {
    /// Snapshot of the current state tree.
    async fn state(&self) -> Value;

    /// Replace the whole state tree. Not a mutation: no event is emitted.
    async fn replace_state(&self, state: Value);

    fn subscribe(&self) -> Subscription;
}

/// Stream of mutation events with a single release point.
pub struct Subscription {
    rx: broadcast::Receiver<MutationEvent>,
}

impl Subscription {
    pub fn new(rx: broadcast::Receiver<MutationEvent>) -> Self {
        Self { rx }
    }

    /// Next event, or `None` once the container is gone.
    ///
    /// A lagging subscriber skips the events it missed; every event carries
    /// the full post-mutation state, so the next one still reflects them.
    pub async fn recv(&mut self) -> Option<MutationEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "mutation subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {
        drop(self.rx);
    }
}
