//! Activation, the mutation-driven sync loop and teardown.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::Instrument;
use uuid::Uuid;

use super::filter::MutationFilter;
use super::loader::{load_snapshot, rehydrate};
use super::options::PersistOptions;
use super::throttle::Throttle;
use super::writer::{SnapshotWriter, WriteOutcome};
use crate::error::{Result, SyncError};
use crate::state::{reduce, MutationEvent, StateContainer, StatePath, Subscription};
use crate::storage::probe_storage;

/// Keeps a state container synchronized with a persisted snapshot.
pub struct PersistedState {
    options: PersistOptions,
    paths: Arc<[StatePath]>,
}

impl PersistedState {
    pub fn new(options: PersistOptions) -> Result<Self> {
        options.config.validate()?;
        let paths = options
            .config
            .paths
            .iter()
            .map(|p| p.parse())
            .collect::<Result<Vec<StatePath>>>()?;
        Ok(Self {
            options,
            paths: paths.into(),
        })
    }

    pub fn options(&self) -> &PersistOptions {
        &self.options
    }

    /// Rehydrate `container` from storage and start persisting its
    /// mutations.
    ///
    /// Steps run in order and any failure aborts the activation before the
    /// container is touched: storage probe, snapshot load and merge,
    /// optional initial write, state replacement, subscription.
    pub async fn activate(&self, container: Arc<dyn StateContainer>) -> Result<SyncHandle> {
        let session_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("persisted_state", session = %session_id);
        self.activate_inner(container, session_id)
            .instrument(span)
            .await
    }

    async fn activate_inner(
        &self,
        container: Arc<dyn StateContainer>,
        session_id: String,
    ) -> Result<SyncHandle> {
        let cfg = &self.options.config;
        let storage = self.options.storage.clone();

        if !probe_storage(storage.as_ref()).await {
            return Err(SyncError::InvalidStorage(storage.name().to_string()));
        }

        let snapshot = load_snapshot(storage.as_ref(), &cfg.key, self.options.after_load.as_ref())
            .await?;
        let rehydrated = match snapshot {
            Some(snapshot) => rehydrate(container.state().await, snapshot),
            None => None,
        };
        tracing::debug!(key = %cfg.key, rehydrated = rehydrated.is_some(), "snapshot loaded");

        let writer = Arc::new(SnapshotWriter::new(
            storage.clone(),
            cfg.key.clone(),
            self.options.before_save.clone(),
        ));

        if cfg.initial_set {
            let outcome = match &rehydrated {
                Some(state) => writer.write(&reduce(state, &self.paths)).await?,
                None => {
                    let state = container.state().await;
                    writer.write(&reduce(&state, &self.paths)).await?
                }
            };
            tracing::debug!(?outcome, "initial state written");
        }

        if let Some(state) = rehydrated {
            container.replace_state(state).await;
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let sync_loop = SyncLoop {
            subscription: container.subscribe(),
            filter: MutationFilter::new(&self.paths),
            gate: Throttle::new(cfg.throttle_window(), cfg.throttle),
            writer: writer.clone(),
            paths: self.paths.clone(),
            shutdown_rx,
            detached: false,
        };
        let task = tokio::spawn(sync_loop.run().in_current_span());

        tracing::info!(
            key = %cfg.key,
            storage = storage.name(),
            paths = self.paths.len(),
            throttle_ms = cfg.throttle_ms,
            "state sync activated"
        );

        Ok(SyncHandle {
            session_id,
            container,
            writer,
            paths: self.paths.clone(),
            shutdown_tx,
            task,
        })
    }
}

/// Handle to an active sync session.
///
/// Dropping the handle without calling [`SyncHandle::teardown`] leaves the
/// session running until the container goes away.
pub struct SyncHandle {
    session_id: String,
    container: Arc<dyn StateContainer>,
    writer: Arc<SnapshotWriter>,
    paths: Arc<[StatePath]>,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Write the container's current state now, bypassing the throttle.
    pub async fn write_now(&self) -> Result<WriteOutcome> {
        let state = self.container.state().await;
        self.writer.write(&reduce(&state, &self.paths)).await
    }

    /// Stop synchronizing and delete the persisted snapshot.
    ///
    /// Resolves after the subscription is released, deferred throttled
    /// writes are dropped and the snapshot has been removed. Writes still in
    /// flight are discarded.
    pub async fn teardown(self) -> Result<()> {
        let SyncHandle {
            session_id,
            writer,
            shutdown_tx,
            task,
            ..
        } = self;

        writer.disable();
        let _ = shutdown_tx.send(());
        if let Err(e) = task.await {
            tracing::warn!(session = %session_id, error = %e, "sync loop ended abnormally");
        }
        writer.remove().await?;
        tracing::info!(session = %session_id, key = writer.key(), "state sync torn down");
        Ok(())
    }
}

struct SyncLoop {
    subscription: Subscription,
    filter: MutationFilter,
    gate: Throttle<MutationEvent>,
    writer: Arc<SnapshotWriter>,
    paths: Arc<[StatePath]>,
    shutdown_rx: oneshot::Receiver<()>,
    detached: bool,
}

impl SyncLoop {
    async fn run(mut self) {
        loop {
            let deadline = self.gate.deadline();
            tokio::select! {
                biased;

                signal = &mut self.shutdown_rx, if !self.detached => {
                    if signal.is_ok() {
                        break;
                    }
                    tracing::debug!("sync handle dropped, session detached");
                    self.detached = true;
                }

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(event) = self.gate.expire(Instant::now()) {
                        tracing::debug!(mutation = %event.mutation.kind, "trailing throttled write");
                        self.dispatch(event);
                    }
                }

                event = self.subscription.recv() => match event {
                    Some(event) => self.on_mutation(event),
                    None => {
                        tracing::debug!("state container closed");
                        if let Some(event) = self.gate.cancel() {
                            tracing::debug!(mutation = %event.mutation.kind, "flushing throttled write");
                            self.dispatch(event);
                        }
                        break;
                    }
                },
            }
        }

        if self.gate.cancel().is_some() {
            tracing::debug!("dropped deferred throttled write");
        }
        self.subscription.unsubscribe();
    }

    fn on_mutation(&mut self, event: MutationEvent) {
        if !self.filter.is_eligible(&event.mutation.kind) {
            tracing::debug!(mutation = %event.mutation.kind, "mutation outside persisted paths");
            return;
        }
        match self.gate.offer(event, Instant::now()) {
            Some(event) => self.dispatch(event),
            None => tracing::trace!("mutation deferred by throttle"),
        }
    }

    fn dispatch(&self, event: MutationEvent) {
        let pending = match self.writer.begin(&reduce(&event.state, &self.paths)) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "failed to prepare snapshot write");
                return;
            }
        };
        let writer = self.writer.clone();
        let kind = event.mutation.kind;
        tokio::spawn(
            async move {
                match writer.commit(pending).await {
                    Ok(WriteOutcome::Committed) => {}
                    Ok(outcome) => {
                        tracing::debug!(mutation = %kind, ?outcome, "stale write discarded")
                    }
                    Err(e) => tracing::warn!(mutation = %kind, error = %e, "snapshot write failed"),
                }
            }
            .in_current_span(),
        );
    }
}
