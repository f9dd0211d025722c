//! State synchronization engine.
//!
//! Loads a persisted snapshot into a state container on activation, then
//! writes selected parts of the state back to an async key-value store on
//! every mutation, throttled and guarded against stale writes.

pub mod config;
pub mod error;
pub mod hooks;
pub mod state;
pub mod storage;
pub mod sync;

pub use config::PersistConfig;
pub use error::{Result, SyncError};
pub use hooks::Transform;
pub use state::{Mutation, MutationEvent, StateContainer, Store, Subscription};
pub use storage::{MemoryStorage, StorageAdapter};
pub use sync::{PersistOptions, PersistedState, SyncHandle, WriteOutcome};
