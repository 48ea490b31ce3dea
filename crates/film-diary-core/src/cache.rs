use anyhow::{anyhow, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The JSON blobs kept per (user, year)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheFile {
    Diary,
    Master,
    Cast,
    Directors,
    FullCast,
    FullDirectors,
    Stats,
}

impl CacheFile {
    pub fn file_name(self, user: &str, year: i32) -> String {
        match self {
            CacheFile::Diary => format!("diary_data_{}_{}.json", user, year),
            CacheFile::Master => format!("{}_{}_master.json", user, year),
            CacheFile::Cast => format!("{}_{}_cast.json", user, year),
            CacheFile::Directors => format!("{}_{}_director.json", user, year),
            CacheFile::FullCast => format!("{}_{}_full_cast.json", user, year),
            CacheFile::FullDirectors => format!("{}_{}_full_director.json", user, year),
            CacheFile::Stats => format!("{}_{}_stats.json", user, year),
        }
    }
}

/// Key-value store of JSON blobs under `<root>/<user>/<year>/<file>`.
///
/// A load never fails: missing, unreadable and malformed blobs all come back
/// as `None`. Saves overwrite. There is no locking between processes.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user: &str) -> PathBuf {
        self.root.join(sanitize(user))
    }

    pub fn path(&self, user: &str, year: i32, file: CacheFile) -> PathBuf {
        let user = sanitize(user);
        self.root
            .join(&user)
            .join(year.to_string())
            .join(file.file_name(&user, year))
    }

    pub fn exists(&self, user: &str, year: i32, file: CacheFile) -> bool {
        self.path(user, year, file).exists()
    }

    /// Typed read; `None` on miss, I/O error, bad JSON or schema mismatch
    pub fn load<T>(&self, user: &str, year: i32, file: CacheFile) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let value = self.load_value(user, year, file)?;
        match serde_json::from_value::<T>(value) {
            Ok(data) => {
                info!("Cache hit: {} {} {:?}", user, year, file);
                Some(data)
            }
            Err(e) => {
                warn!(
                    "Cache blob {:?} for {} {} does not match the expected shape: {}. Treating as a miss.",
                    file, user, year, e
                );
                None
            }
        }
    }

    /// Untyped read, for callers that salvage parts of a blob
    pub fn load_value(&self, user: &str, year: i32, file: CacheFile) -> Option<serde_json::Value> {
        let cache_path = self.path(user, year, file);

        if !cache_path.exists() {
            debug!("Cache miss: {} {} {:?} (file does not exist)", user, year, file);
            return None;
        }

        let content = match std::fs::read_to_string(&cache_path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read cache file {}: {}", cache_path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cache corruption detected in {}: {}. Treating as a miss.", cache_path.display(), e);
                None
            }
        }
    }

    pub fn save<T>(&self, user: &str, year: i32, file: CacheFile, data: &T) -> Result<PathBuf>
    where
        T: Serialize,
    {
        let cache_path = self.path(user, year, file);
        write_json(&cache_path, data)?;
        debug!("Cache saved: {}", cache_path.display());
        Ok(cache_path)
    }

    /// Remove one year, or every year when `year` is `None`. Returns whether anything was removed.
    pub fn clear(&self, user: &str, year: Option<i32>) -> Result<bool> {
        let target = match year {
            Some(year) => self.user_dir(user).join(year.to_string()),
            None => self.user_dir(user),
        };
        if !target.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(&target)?;
        info!("Cleared cache directory: {}", target.display());
        Ok(true)
    }
}

/// Pretty-print `data` to `path`, creating parent directories
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| anyhow!("Failed to serialize {}: {}", path.display(), e))?;
    std::fs::write(path, json).map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
    Ok(())
}

/// Keep user names from escaping the cache root
fn sanitize(component: &str) -> String {
    let cleaned: String = component
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use film_diary_models::{DiaryYear, PersonList};

    fn store() -> (tempfile::TempDir, CacheStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_file_names() {
        assert_eq!(CacheFile::Diary.file_name("ana", 2025), "diary_data_ana_2025.json");
        assert_eq!(CacheFile::Master.file_name("ana", 2025), "ana_2025_master.json");
        assert_eq!(CacheFile::Directors.file_name("ana", 2025), "ana_2025_director.json");
        assert_eq!(CacheFile::FullDirectors.file_name("ana", 2025), "ana_2025_full_director.json");
        assert_eq!(CacheFile::Stats.file_name("ana", 2025), "ana_2025_stats.json");
    }

    #[test]
    fn test_path_layout() {
        let (_dir, store) = store();
        let path = store.path("ana", 2025, CacheFile::Cast);
        assert!(path.ends_with("ana/2025/ana_2025_cast.json"));
    }

    #[test]
    fn test_miss_returns_none() {
        let (_dir, store) = store();
        assert!(store.load::<PersonList>("ana", 2025, CacheFile::Cast).is_none());
        assert!(!store.exists("ana", 2025, CacheFile::Cast));
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = store();
        let mut cast = PersonList::new();
        cast.record_credit("p", "Pat", "m", Some("Lead".to_string()));

        store.save("ana", 2025, CacheFile::Cast, &cast).unwrap();
        let loaded: PersonList = store.load("ana", 2025, CacheFile::Cast).unwrap();
        assert_eq!(loaded, cast);
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, store) = store();
        store.save("ana", 2025, CacheFile::Stats, &serde_json::json!({"v": 1})).unwrap();
        store.save("ana", 2025, CacheFile::Stats, &serde_json::json!({"v": 2})).unwrap();
        let value = store.load_value("ana", 2025, CacheFile::Stats).unwrap();
        assert_eq!(value["v"], 2);
    }

    #[test]
    fn test_corrupt_blob_is_a_miss() {
        let (_dir, store) = store();
        let path = store.path("ana", 2025, CacheFile::Master);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(store.load_value("ana", 2025, CacheFile::Master).is_none());
        assert!(store.load::<PersonList>("ana", 2025, CacheFile::Master).is_none());
    }

    #[test]
    fn test_schema_mismatch_is_a_miss() {
        let (_dir, store) = store();
        store.save("ana", 2025, CacheFile::Diary, &serde_json::json!({"Smarch": 1})).unwrap();
        assert!(store.load_value("ana", 2025, CacheFile::Diary).is_some());
        assert!(store.load::<DiaryYear>("ana", 2025, CacheFile::Diary).is_none());
    }

    #[test]
    fn test_clear() {
        let (_dir, store) = store();
        store.save("ana", 2024, CacheFile::Stats, &serde_json::json!({})).unwrap();
        store.save("ana", 2025, CacheFile::Stats, &serde_json::json!({})).unwrap();

        assert!(store.clear("ana", Some(2024)).unwrap());
        assert!(!store.exists("ana", 2024, CacheFile::Stats));
        assert!(store.exists("ana", 2025, CacheFile::Stats));

        assert!(store.clear("ana", None).unwrap());
        assert!(!store.exists("ana", 2025, CacheFile::Stats));
        assert!(!store.clear("ana", None).unwrap());
    }

    #[test]
    fn test_user_cannot_escape_root() {
        let (_dir, store) = store();
        let path = store.path("../evil", 2025, CacheFile::Stats);
        assert!(path.starts_with(store.root()));
    }
}
