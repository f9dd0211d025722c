pub mod delayed;
pub mod file;

pub use delayed::DelayedStorage;
pub use file::FileStorage;
