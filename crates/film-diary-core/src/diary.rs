use crate::cache::{CacheFile, CacheStore};
use chrono::{Datelike, NaiveDate};
use film_diary_models::{DiaryEntry, DiaryYear, Month, MonthBucket};
use film_diary_sources::CatalogClient;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where a month task gets its bucket from
#[derive(Debug, Clone)]
pub enum MonthSource {
    /// Ask the catalog
    Catalog,
    /// Pull the month out of a previously cached (possibly damaged) diary blob
    CachedYear(serde_json::Value),
}

/// Builds a user's diary year from twelve concurrent month fetches.
pub struct DiaryAggregator {
    catalog: Arc<dyn CatalogClient>,
    cache: CacheStore,
    concurrency: usize,
    offline: bool,
}

impl DiaryAggregator {
    pub fn new(catalog: Arc<dyn CatalogClient>, cache: CacheStore, concurrency: usize) -> Self {
        Self {
            catalog,
            cache,
            concurrency: concurrency.max(1),
            offline: false,
        }
    }

    /// Never contact the catalog on a cache miss
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Return the diary for `year`, sorted by watch date.
    ///
    /// A non-empty cached year is returned as-is unless `force_refresh` is set.
    /// Months that fail to load become empty buckets; this never fails.
    #[instrument(skip(self))]
    pub async fn fetch(&self, user: &str, year: i32, force_refresh: bool) -> DiaryYear {
        if !force_refresh {
            match self.cache.load::<DiaryYear>(user, year, CacheFile::Diary) {
                Some(cached) if !cached.is_empty() => {
                    info!("Loaded cached diary for {} {} ({} entries)", user, year, cached.total_entries());
                    return cached;
                }
                Some(_) => debug!("Cached diary for {} {} is empty, rebuilding", user, year),
                None => {}
            }
        }

        let source = if self.offline && !force_refresh {
            info!("Offline mode: salvaging diary months for {} {} from cache", user, year);
            MonthSource::CachedYear(
                self.cache
                    .load_value(user, year, CacheFile::Diary)
                    .unwrap_or(serde_json::Value::Null),
            )
        } else {
            MonthSource::Catalog
        };

        let fetched = self.fetch_months(user, year, &source).await;
        let diary = merge_chronologically(&fetched, year);

        match self.cache.save(user, year, CacheFile::Diary, &diary) {
            Ok(path) => info!("Saved diary for {} {} to {}", user, year, path.display()),
            Err(e) => warn!("Failed to save diary cache for {} {}: {}", user, year, e),
        }

        diary
    }

    /// Run all twelve month tasks and wait for every one of them
    async fn fetch_months(&self, user: &str, year: i32, source: &MonthSource) -> DiaryYear {
        let results: Vec<(Month, MonthBucket)> = stream::iter(Month::ALL)
            .map(|month| async move { (month, self.fetch_month(user, year, month, source).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut diary = DiaryYear::new();
        for (month, bucket) in results {
            diary.set_month(month, bucket);
        }
        diary
    }

    async fn fetch_month(&self, user: &str, year: i32, month: Month, source: &MonthSource) -> MonthBucket {
        match source {
            MonthSource::Catalog => match self.catalog.fetch_diary_month(user, year, month).await {
                Ok(bucket) => {
                    debug!("Fetched {} {} from {} ({} entries)", month, year, self.catalog.source_name(), bucket.entries.len());
                    bucket
                }
                Err(e) => {
                    warn!("Failed to fetch diary month {} {} for {}: {}", month, year, user, e);
                    MonthBucket::empty()
                }
            },
            MonthSource::CachedYear(blob) => salvage_month(blob, month),
        }
    }
}

/// Decode one month from a raw diary blob; anything unusable is an empty bucket
fn salvage_month(blob: &serde_json::Value, month: Month) -> MonthBucket {
    let Some(raw) = blob.get(month.name()) else {
        return MonthBucket::empty();
    };
    match serde_json::from_value::<MonthBucket>(raw.clone()) {
        Ok(bucket) => bucket,
        Err(e) => {
            warn!("Discarding unreadable cached month {}: {}", month, e);
            MonthBucket::empty()
        }
    }
}

/// Flatten every entry, stable-sort by month and day within `year` and rebuild
/// the twelve buckets with recomputed counts. The entry's own year is ignored
/// for ordering. Equal dates keep scan order (month order, then each bucket's
/// own order). Entries whose month and day are not a real date in `year` are
/// dropped.
pub fn merge_chronologically(diary: &DiaryYear, year: i32) -> DiaryYear {
    let mut dated: Vec<(NaiveDate, &String, &DiaryEntry)> = Vec::with_capacity(diary.total_entries());
    for (entry_id, entry) in diary.entries_in_order() {
        match NaiveDate::from_ymd_opt(year, entry.date.month, entry.date.day) {
            Some(date) => dated.push((date, entry_id, entry)),
            None => warn!(
                "Skipping diary entry {} ({}) with invalid date {:?}",
                entry_id, entry.slug, entry.date
            ),
        }
    }

    dated.sort_by_key(|(date, _, _)| *date);

    let mut merged = DiaryYear::new();
    for (date, entry_id, entry) in dated {
        let month = Month::ALL[date.month0() as usize];
        merged.month_mut(month).push(entry_id.clone(), entry.clone());
    }
    merged
}
