pub mod load;
pub mod types;

pub use load::{apply_env_overrides, from_toml_str, load_from_path};
pub use types::{PersistConfig, ThrottleConfig, DEFAULT_KEY};
