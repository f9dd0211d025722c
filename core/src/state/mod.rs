//! State tree, the container contract and the tree operations the engine
//! performs on it.

pub mod container;
pub mod merge;
pub mod path;
pub mod reducer;
pub mod store;
pub mod types;

pub use container::{StateContainer, Subscription};
pub use merge::merge_snapshot;
pub use path::StatePath;
pub use reducer::reduce;
pub use store::Store;
pub use types::{Mutation, MutationEvent};
