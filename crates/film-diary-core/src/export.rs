use crate::cache::{write_json, CacheFile, CacheStore};
use crate::stats::SnapshotPair;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the snapshot pair as `{"all": …, "full": …}` JSON
pub struct ReportExporter {
    cache: CacheStore,
}

impl ReportExporter {
    pub fn new(cache: CacheStore) -> Self {
        Self { cache }
    }

    /// Save to the `<user>_<year>_stats.json` cache blob
    pub fn export(&self, user: &str, year: i32, snapshots: &SnapshotPair) -> Result<PathBuf> {
        let path = self.cache.save(user, year, CacheFile::Stats, snapshots)?;
        info!("Saved stats JSON to {}", path.display());
        Ok(path)
    }

    /// Save to an explicit path instead of the cache
    pub fn export_to(&self, path: &Path, snapshots: &SnapshotPair) -> Result<PathBuf> {
        write_json(path, snapshots)?;
        info!("Saved stats JSON to {}", path.display());
        Ok(path.to_path_buf())
    }

    /// A previously exported pair, if the cache has a readable one
    pub fn load(&self, user: &str, year: i32) -> Option<SnapshotPair> {
        self.cache.load(user, year, CacheFile::Stats)
    }
}
