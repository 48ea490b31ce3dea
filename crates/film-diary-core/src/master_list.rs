use crate::cache::{CacheFile, CacheStore};
use crate::progress::ProgressTracker;
use film_diary_models::{
    names_of_kind, DetailKind, DiaryEntry, DiaryYear, MovieDetail, MovieList, MovieRecord, PersonList,
};
use film_diary_sources::{CatalogClient, CatalogError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The five artifacts built from one diary year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasterLists {
    pub movies: MovieList,
    pub cast: PersonList,
    pub directors: PersonList,
    /// Cast of feature-length movies only
    pub full_cast: PersonList,
    /// Directors of feature-length movies only
    pub full_directors: PersonList,
}

struct FetchedMovie {
    detail: MovieDetail,
    members: u64,
}

/// Enriches every diary entry with catalog metadata and builds the
/// sequence-numbered movie list plus the cast and director aggregates.
pub struct MasterListBuilder {
    catalog: Arc<dyn CatalogClient>,
    cache: CacheStore,
    concurrency: usize,
    feature_length_minutes: u32,
}

impl MasterListBuilder {
    pub fn new(catalog: Arc<dyn CatalogClient>, cache: CacheStore, concurrency: usize, feature_length_minutes: u32) -> Self {
        Self {
            catalog,
            cache,
            concurrency: concurrency.max(1),
            feature_length_minutes,
        }
    }

    /// Build (or load) the master lists for `diary`.
    ///
    /// The cache is all-or-nothing: unless every one of the five blobs loads,
    /// everything is fetched again. Movies whose fetch fails are left out and
    /// consume no sequence number.
    #[instrument(skip(self, diary), fields(entries = diary.total_entries()))]
    pub async fn build(&self, user: &str, year: i32, diary: &DiaryYear, force_refresh: bool) -> MasterLists {
        if !force_refresh {
            if let Some(lists) = self.load_cached(user, year) {
                info!("Loaded cached master lists for {} {} ({} movies)", user, year, lists.movies.len());
                return lists;
            }
        }

        let entries: Vec<&DiaryEntry> = diary.entries_in_order().map(|(_, entry)| entry).collect();
        let fetched = self.fetch_all(&entries).await;
        let lists = assemble(&entries, fetched, self.feature_length_minutes);

        info!(
            "Built master lists for {} {}: {} movies, {} cast, {} directors",
            user,
            year,
            lists.movies.len(),
            lists.cast.len(),
            lists.directors.len()
        );

        self.save(user, year, &lists);
        lists
    }

    fn load_cached(&self, user: &str, year: i32) -> Option<MasterLists> {
        let movies = self.cache.load::<MovieList>(user, year, CacheFile::Master);
        let cast = self.cache.load::<PersonList>(user, year, CacheFile::Cast);
        let directors = self.cache.load::<PersonList>(user, year, CacheFile::Directors);
        let full_cast = self.cache.load::<PersonList>(user, year, CacheFile::FullCast);
        let full_directors = self.cache.load::<PersonList>(user, year, CacheFile::FullDirectors);

        match (movies, cast, directors, full_cast, full_directors) {
            (Some(movies), Some(cast), Some(directors), Some(full_cast), Some(full_directors)) => Some(MasterLists {
                movies,
                cast,
                directors,
                full_cast,
                full_directors,
            }),
            _ => {
                debug!("Master list cache for {} {} is incomplete, rebuilding all five artifacts", user, year);
                None
            }
        }
    }

    fn save(&self, user: &str, year: i32, lists: &MasterLists) {
        let results = [
            (CacheFile::Master, self.cache.save(user, year, CacheFile::Master, &lists.movies)),
            (CacheFile::Cast, self.cache.save(user, year, CacheFile::Cast, &lists.cast)),
            (CacheFile::Directors, self.cache.save(user, year, CacheFile::Directors, &lists.directors)),
            (CacheFile::FullCast, self.cache.save(user, year, CacheFile::FullCast, &lists.full_cast)),
            (
                CacheFile::FullDirectors,
                self.cache.save(user, year, CacheFile::FullDirectors, &lists.full_directors),
            ),
        ];
        for (file, result) in results {
            if let Err(e) = result {
                warn!("Failed to save {:?} cache for {} {}: {}", file, user, year, e);
            }
        }
    }

    /// One task per entry; each writes only its own slot. Waits for all.
    async fn fetch_all(&self, entries: &[&DiaryEntry]) -> Vec<Option<FetchedMovie>> {
        let mut slots: Vec<Option<FetchedMovie>> = entries.iter().map(|_| None).collect();
        let mut progress = ProgressTracker::new(entries.len(), 10);

        let mut results = stream::iter(entries.iter().enumerate())
            .map(|(index, entry)| async move { (index, self.fetch_movie(&entry.slug).await) })
            .buffer_unordered(self.concurrency);

        while let Some((index, result)) = results.next().await {
            match result {
                Ok(movie) => {
                    progress.record_fetched();
                    slots[index] = Some(movie);
                }
                Err(e) => {
                    warn!("Error fetching '{}' ({}): {}", entries[index].name, entries[index].slug, e);
                    progress.record_failed(error_category(&e));
                }
            }
        }

        progress.log_summary("Movie detail fetch");
        slots
    }

    async fn fetch_movie(&self, slug: &str) -> Result<FetchedMovie, CatalogError> {
        let (detail, popularity) =
            futures::try_join!(self.catalog.fetch_movie_detail(slug), self.catalog.fetch_popularity(slug))?;
        Ok(FetchedMovie {
            detail,
            members: popularity.members,
        })
    }
}

fn error_category(error: &CatalogError) -> &'static str {
    match error {
        CatalogError::Http { .. } => "http",
        CatalogError::Status { .. } => "status",
        CatalogError::Decode { .. } => "decode",
        CatalogError::NotFound(_) => "not_found",
        CatalogError::Config(_) => "config",
    }
}

/// 10-point diary rating to a half-star rating
fn half_stars(entry: &DiaryEntry) -> Option<f64> {
    match entry.actions.rating {
        Some(points) if (1..=10).contains(&points) => Some(f64::from(points) / 2.0),
        Some(points) => {
            warn!("Ignoring out-of-range rating {} on '{}'", points, entry.slug);
            None
        }
        None => None,
    }
}

/// Single pass over the entries in diary order. Sequence numbers go only to
/// fetched movies; feature-length credits are counted in the same pass.
fn assemble(entries: &[&DiaryEntry], fetched: Vec<Option<FetchedMovie>>, feature_length_minutes: u32) -> MasterLists {
    let mut lists = MasterLists::default();

    for (entry, slot) in entries.iter().zip(fetched) {
        let Some(FetchedMovie { detail, members }) = slot else {
            continue;
        };

        let record = MovieRecord {
            sequence_number: 0,
            slug: entry.slug.clone(),
            name: entry.name.clone(),
            rating: half_stars(entry),
            rewatched: entry.actions.rewatched,
            reviewed: entry.actions.reviewed,
            liked: entry.actions.liked,
            date: entry.date,
            release_year: detail.release_year,
            runtime_minutes: detail.runtime_minutes,
            popularity_members: members,
            average_rating: detail.average_rating,
            genres: names_of_kind(&detail.genres, DetailKind::Genre),
            countries: names_of_kind(&detail.details, DetailKind::Country),
            languages: names_of_kind(&detail.details, DetailKind::Language),
            studios: names_of_kind(&detail.details, DetailKind::Studio),
        };
        let feature_length = record.is_feature_length(feature_length_minutes);
        lists.movies.push(record);

        for member in &detail.cast {
            let (Some(slug), Some(name)) = (member.slug.as_deref(), member.name.as_deref()) else {
                continue;
            };
            lists.cast.record_credit(slug, name, &entry.slug, member.role.clone());
            if feature_length {
                lists.full_cast.record_credit(slug, name, &entry.slug, member.role.clone());
            }
        }

        for director in detail.directors() {
            let (Some(slug), Some(name)) = (director.slug.as_deref(), director.name.as_deref()) else {
                continue;
            };
            lists.directors.record_credit(slug, name, &entry.slug, None);
            if feature_length {
                lists.full_directors.record_credit(slug, name, &entry.slug, None);
            }
        }
    }

    lists.cast.sort_by_appearances();
    lists.directors.sort_by_appearances();
    lists.full_cast.sort_by_appearances();
    lists.full_directors.sort_by_appearances();
    lists
}
