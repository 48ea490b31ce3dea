use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Where the catalog gateway lives and how to talk to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Fan-out limits for the two fetch phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_diary_concurrency")]
    pub diary_concurrency: usize,
    #[serde(default = "default_movie_concurrency")]
    pub movie_concurrency: usize,
    /// Never contact the catalog on a cache miss; salvage months from the cached diary blob instead
    #[serde(default)]
    pub offline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum runtime (minutes) for the feature-length population
    #[serde(default = "default_feature_length_minutes")]
    pub feature_length_minutes: u32,
    /// A category label needs this many rated movies before it gets an average
    #[serde(default = "default_category_min_rated")]
    pub category_min_rated: usize,
    #[serde(default = "default_top_people")]
    pub top_people: usize,
    #[serde(default = "default_milestone_interval")]
    pub milestone_interval: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Overrides the platform cache directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:8787".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("reelrecap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_diary_concurrency() -> usize {
    6
}

fn default_movie_concurrency() -> usize {
    8
}

fn default_feature_length_minutes() -> u32 {
    75
}

fn default_category_min_rated() -> usize {
    4
}

fn default_top_people() -> usize {
    10
}

fn default_milestone_interval() -> u32 {
    25
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            diary_concurrency: default_diary_concurrency(),
            movie_concurrency: default_movie_concurrency(),
            offline: false,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            feature_length_minutes: default_feature_length_minutes(),
            category_min_rated: default_category_min_rated(),
            top_people: default_top_people(),
            milestone_interval: default_milestone_interval(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.base_url cannot be empty"));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(anyhow::anyhow!("catalog.timeout_secs must be positive"));
        }
        if self.fetch.diary_concurrency == 0 {
            return Err(anyhow::anyhow!("fetch.diary_concurrency must be at least 1"));
        }
        if self.fetch.movie_concurrency == 0 {
            return Err(anyhow::anyhow!("fetch.movie_concurrency must be at least 1"));
        }
        if self.analysis.milestone_interval == 0 {
            return Err(anyhow::anyhow!("analysis.milestone_interval must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.catalog.base_url = "https://catalog.example".to_string();
        config.fetch.movie_concurrency = 4;
        config.cache.dir = Some(PathBuf::from("/tmp/cache"));

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.catalog.base_url, "https://catalog.example");
        assert_eq!(loaded.fetch.movie_concurrency, 4);
        assert_eq!(loaded.fetch.diary_concurrency, 6);
        assert_eq!(loaded.cache.dir, Some(PathBuf::from("/tmp/cache")));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[fetch]\noffline = true\n").unwrap();
        assert!(config.fetch.offline);
        assert_eq!(config.fetch.movie_concurrency, 8);
        assert_eq!(config.analysis.feature_length_minutes, 75);
        assert_eq!(config.analysis.category_min_rated, 4);
        assert_eq!(config.analysis.milestone_interval, 25);
        assert_eq!(config.catalog.timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.fetch.diary_concurrency, 6);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.fetch.diary_concurrency = 0;
        assert!(config.validate().is_err());

        config.fetch.diary_concurrency = 6;
        config.analysis.milestone_interval = 0;
        assert!(config.validate().is_err());

        config.analysis.milestone_interval = 25;
        config.catalog.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
