use std::path::Path;

use super::types::PersistConfig;
use crate::error::{Result, SyncError};

pub const ENV_KEY: &str = "STATESYNC_KEY";
pub const ENV_THROTTLE_MS: &str = "STATESYNC_THROTTLE_MS";

pub fn from_toml_str(s: &str) -> Result<PersistConfig> {
    let cfg: PersistConfig =
        toml::from_str(s).map_err(|e| SyncError::Config(format!("invalid toml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<PersistConfig> {
    load_from_path_with(path.as_ref(), |name| std::env::var(name).ok())
}

fn load_from_path_with<F>(path: &Path, lookup: F) -> Result<PersistConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let s = std::fs::read_to_string(path)
        .map_err(|e| SyncError::Config(format!("failed to read {}: {e}", path.display())))?;
    let mut cfg = from_toml_str(&s)?;
    apply_overrides(&mut cfg, lookup)?;
    Ok(cfg)
}

/// Environment variables take priority over file values.
pub fn apply_env_overrides(cfg: &mut PersistConfig) -> Result<()> {
    apply_overrides(cfg, |name| std::env::var(name).ok())
}

fn apply_overrides<F>(cfg: &mut PersistConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_KEY) {
        if !v.trim().is_empty() {
            cfg.key = v;
        }
    }
    if let Some(v) = lookup(ENV_THROTTLE_MS) {
        if !v.trim().is_empty() {
            cfg.throttle_ms = v
                .trim()
                .parse()
                .map_err(|e| SyncError::Config(format!("{ENV_THROTTLE_MS}={v:?}: {e}")))?;
        }
    }
    Ok(())
}
