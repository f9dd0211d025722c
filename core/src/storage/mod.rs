//! Key-value storage the snapshot is persisted to.

pub mod memory;
pub mod probe;
pub mod traits;

pub use memory::MemoryStorage;
pub use probe::{probe_storage, PROBE_KEY};
pub use traits::StorageAdapter;
