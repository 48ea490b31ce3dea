pub mod analyze;
pub mod clear;
pub mod progress;
pub mod report;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use film_diary_config::{Config, PathManager};
use film_diary_core::CacheStore;
use std::path::Path;

pub fn path_manager() -> Result<PathManager> {
    PathManager::new().map_err(|e| eyre!("Could not resolve the config directory: {}", e))
}

/// An explicit `--config` must exist; the default location may be missing,
/// in which case every setting takes its default.
pub fn load_config(paths: &PathManager, explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::load_from_file(path)
            .map_err(|e| eyre!("Failed to load config from {}: {}", path.display(), e))?,
        None => {
            let config_file = paths.config_file();
            Config::load_or_default(&config_file)
                .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?
        }
    };
    config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;
    Ok(config)
}

/// `[cache] dir` overrides the cache directory from the path manager
pub fn cache_store(config: &Config, paths: &PathManager) -> Result<CacheStore> {
    let root = match &config.cache.dir {
        Some(dir) => dir.clone(),
        None => paths.cache_dir().to_path_buf(),
    };
    CacheStore::new(root.clone()).map_err(|e| eyre!("Failed to open cache at {}: {}", root.display(), e))
}
