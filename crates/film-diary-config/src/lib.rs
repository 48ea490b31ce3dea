pub mod config;
pub mod paths;

pub use config::{AnalysisConfig, CacheConfig, CatalogConfig, Config, FetchConfig};
pub use paths::{home_override, PathManager};
