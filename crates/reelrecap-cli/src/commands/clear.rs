use super::cache_store;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use film_diary_config::{Config, PathManager};

pub fn run_clear(user: &str, year: Option<i32>, config: &Config, paths: &PathManager, output: &Output) -> Result<()> {
    let cache = cache_store(config, paths)?;

    let cleared = cache
        .clear(user, year)
        .map_err(|e| eyre!("Failed to clear cache for {}: {}", user, e))?;

    let scope = match year {
        Some(year) => format!("{} ({})", user, year),
        None => format!("{} (all years)", user),
    };
    if cleared {
        output.success(format!("Cleared cached data for {}: {}", scope, cache.root().display()));
    } else {
        output.info(format!("No cached data found for {}", scope));
    }

    Ok(())
}
