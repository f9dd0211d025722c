//! The synchronization pipeline: rehydration, filtering, throttling and
//! versioned writes.

pub mod engine;
pub mod filter;
pub mod loader;
pub mod options;
pub mod throttle;
pub mod writer;

pub use engine::{PersistedState, SyncHandle};
pub use filter::MutationFilter;
pub use loader::{load_snapshot, rehydrate};
pub use options::PersistOptions;
pub use throttle::Throttle;
pub use writer::{PendingWrite, SaveToken, SaveVersions, SnapshotWriter, WriteOutcome};
