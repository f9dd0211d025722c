use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use statesync_core::hooks::Transform;
use statesync_core::PersistOptions;

/// Stores snapshots base64-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

struct Encode;
struct Decode;

#[async_trait]
impl Transform for Encode {
    async fn apply(&self, raw: String) -> anyhow::Result<String> {
        Ok(STANDARD.encode(raw))
    }
}

#[async_trait]
impl Transform for Decode {
    async fn apply(&self, raw: String) -> anyhow::Result<String> {
        let bytes = STANDARD.decode(raw.trim())?;
        Ok(String::from_utf8(bytes)?)
    }
}

impl Base64Codec {
    pub fn before_save(&self) -> Arc<dyn Transform> {
        Arc::new(Encode)
    }

    pub fn after_load(&self) -> Arc<dyn Transform> {
        Arc::new(Decode)
    }

    pub fn install(&self, options: PersistOptions) -> PersistOptions {
        options
            .with_before_save(self.before_save())
            .with_after_load(self.after_load())
    }
}
