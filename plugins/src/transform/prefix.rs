use std::sync::Arc;

use statesync_core::hooks::{sync_transform, Transform};
use statesync_core::PersistOptions;

/// Frames stored snapshots with a fixed marker, e.g. a format version tag.
/// Loading a value without the marker fails.
#[derive(Debug, Clone)]
pub struct PrefixFraming {
    marker: Arc<str>,
}

impl PrefixFraming {
    pub fn new(marker: impl Into<Arc<str>>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn before_save(&self) -> Arc<dyn Transform> {
        let marker = self.marker.clone();
        sync_transform(move |raw| Ok(format!("{marker}{raw}")))
    }

    pub fn after_load(&self) -> Arc<dyn Transform> {
        let marker = self.marker.clone();
        sync_transform(move |raw| {
            raw.strip_prefix(&*marker)
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("stored value is missing marker {marker:?}"))
        })
    }

    pub fn install(&self, options: PersistOptions) -> PersistOptions {
        options
            .with_before_save(self.before_save())
            .with_after_load(self.after_load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_and_unframes() {
        let framing = PrefixFraming::new("v1:");
        let framed = framing.before_save().apply("{}".to_string()).await.unwrap();
        assert_eq!(framed, "v1:{}");
        assert_eq!(framing.after_load().apply(framed).await.unwrap(), "{}");
        assert!(framing.after_load().apply("{}".to_string()).await.is_err());
    }
}
