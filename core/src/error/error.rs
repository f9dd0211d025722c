use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("invalid storage instance given: {0}")]
    InvalidStorage(String),
    #[error("afterLoad hook failed: {0}")]
    Decode(#[source] anyhow::Error),
    #[error("snapshot is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("beforeSave hook failed: {0}")]
    Encode(#[source] anyhow::Error),
    #[error("reduced snapshot could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("storage {op} failed for key {key}: {source}")]
    Storage {
        op: &'static str,
        key: String,
        source: anyhow::Error,
    },
    #[error("config error: {0}")]
    Config(String),
}

impl SyncError {
    pub(crate) fn storage(op: &'static str, key: &str, source: anyhow::Error) -> Self {
        SyncError::Storage {
            op,
            key: key.to_string(),
            source,
        }
    }
}
