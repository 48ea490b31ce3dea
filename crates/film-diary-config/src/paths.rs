use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override, read from `REELRECAP_HOME` when set
pub fn home_override() -> Option<PathBuf> {
    std::env::var("REELRECAP_HOME").ok().map(PathBuf::from)
}

/// Resolves every directory the tool touches. The cache root is explicit
/// configuration handed to the cache store, never a process-wide default.
#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
    cache_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = match home_override() {
            Some(base) => base,
            None => dirs::config_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
                .join("reelrecap"),
        };
        Ok(Self::from_base(base_dir))
    }

    /// Lay everything out under one directory
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let data_dir = base.join("data");
        Self {
            config_dir: base.clone(),
            cache_dir: data_dir.join("cache"),
            log_dir: base.join("logs"),
            data_dir,
        }
    }

    /// Point the cache somewhere other than `<data>/cache`
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("reelrecap.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // Fall back to a local directory when the platform has no config dir
        Self::new().unwrap_or_else(|_| Self::from_base(".reelrecap"))
    }
}
