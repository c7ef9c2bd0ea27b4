//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement. Every
//! consumer loads one immutable snapshot for its current run; watch mode
//! swaps in a new snapshot when `bloggy.toml` changes.

use super::Config;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
static CONFIG: LazyLock<ArcSwap<Config>> =
    LazyLock::new(|| ArcSwap::from_pointee(Config::default()));

/// Hash of the current config file content.
static CONFIG_HASH: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Load the current config snapshot.
#[inline]
pub fn cfg() -> Arc<Config> {
    CONFIG.load_full()
}

/// Install the initial config.
pub fn init_config(config: Config) -> Arc<Config> {
    if config.config_path.exists()
        && let Ok(content) = std::fs::read(&config.config_path)
    {
        let hash = crate::utils::hash::compute(&content);
        CONFIG_HASH.store(hash, std::sync::atomic::Ordering::Relaxed);
    }

    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

/// Reload config from disk if its content changed.
///
/// Returns `Ok(true)` if a new snapshot was installed, `Ok(false)` if the
/// file is unchanged or absent (the current snapshot stays valid).
pub fn reload_config() -> Result<bool> {
    let current = cfg();
    let path = current.config_path.clone();

    let Ok(content) = std::fs::read(&path) else {
        return Ok(false);
    };

    let new_hash = crate::utils::hash::compute(&content);
    let old_hash = CONFIG_HASH.load(std::sync::atomic::Ordering::Relaxed);
    if new_hash == old_hash {
        return Ok(false);
    }

    let new_config = Config::from_path(&path)?;
    CONFIG.store(Arc::new(new_config));
    CONFIG_HASH.store(new_hash, std::sync::atomic::Ordering::Relaxed);

    Ok(true)
}
