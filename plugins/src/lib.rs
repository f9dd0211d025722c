//! Storage backends and transform hooks for `statesync-core`.

pub mod factory;
pub mod storage;
pub mod transform;

pub use factory::{build_options, build_storage, StorageConfig};
pub use storage::{DelayedStorage, FileStorage};
pub use transform::{Base64Codec, PrefixFraming};
