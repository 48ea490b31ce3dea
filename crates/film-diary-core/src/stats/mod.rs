//! Year-in-review statistics.
//!
//! Everything here is synchronous and pure: the engine reads the diary and the
//! master lists and produces two snapshots with the same schema, one over every
//! movie and one over the feature-length subset.

mod calendar;
mod categories;
mod counts;
mod rankings;
mod streaks;

pub use calendar::{broadcast_weeks, days_in_year, CalendarPartitions, CalendarStats, PeakStats, Week, WeekBucket};
pub use categories::{Breakdown, CategoryStats, ReleaseStats};
pub use counts::{CountStats, EngagementStats, FlagStats, RatingStats, RuntimeStats};
pub use rankings::{Milestone, MovieRef, PopularityStats, RankedMovie};
pub use streaks::StreakStats;

use crate::master_list::MasterLists;
use film_diary_config::AnalysisConfig;
use film_diary_models::{DiaryYear, FavoriteFilm, MovieRecord, PersonList, SequenceNumber, UserProfile};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("no movies to analyze for {year}")]
    InsufficientData { year: i32 },

    #[error("year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}

/// Header of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub username: String,
    pub display_name: Option<String>,
    pub year: i32,
    pub avatar_url: Option<String>,
    pub favorites: Vec<FavoriteFilm>,
}

impl SnapshotInfo {
    pub fn new(username: &str, year: i32, profile: UserProfile) -> Self {
        Self {
            username: username.to_string(),
            display_name: profile.display_name,
            year,
            avatar_url: profile.avatar_url,
            favorites: profile.favorites,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearStats {
    pub counts: CountStats,
    pub engagement: EngagementStats,
    pub ratings: RatingStats,
    pub runtime: RuntimeStats,
    pub milestones: Vec<Milestone>,
    /// Every movie sharing the highest rating
    pub top_rated: Vec<MovieRef>,
    /// Name → appearances. People sharing a display name collapse into one entry.
    pub top_actors: IndexMap<String, u32>,
    pub top_directors: IndexMap<String, u32>,
    /// Slug → sequence numbers, for movies watched more than once
    pub multiwatches: IndexMap<String, Vec<SequenceNumber>>,
    pub calendar: CalendarStats,
    pub categories: CategoryStats,
    pub releases: ReleaseStats,
    pub popularity: PopularityStats,
    pub peaks: PeakStats,
    pub streaks: StreakStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub info: SnapshotInfo,
    pub stats: YearStats,
}

/// The two populations: every movie, and feature-length movies only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPair {
    pub all: StatsSnapshot,
    pub full: StatsSnapshot,
}

/// One population of movies with the person lists that go with it
struct Population<'a> {
    movies: Vec<&'a MovieRecord>,
    cast: &'a PersonList,
    directors: &'a PersonList,
}

pub struct StatsEngine {
    config: AnalysisConfig,
}

impl StatsEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Compute both snapshots.
    ///
    /// Fails with [`StatsError::InsufficientData`] when there are no movies.
    /// An empty feature-length subset is not an error; its snapshot is all zeros.
    pub fn compute(
        &self,
        diary: &DiaryYear,
        lists: &MasterLists,
        year: i32,
        info: SnapshotInfo,
    ) -> Result<SnapshotPair, StatsError> {
        if lists.movies.is_empty() {
            return Err(StatsError::InsufficientData { year });
        }

        let diary_entries = diary.total_entries();
        if diary_entries != lists.movies.len() {
            debug!(
                "{} diary entries but {} movies; the rest had no catalog metadata",
                diary_entries,
                lists.movies.len()
            );
        }

        let partitions = CalendarPartitions::build(year, &lists.movies).ok_or(StatsError::InvalidYear(year))?;

        let all = Population {
            movies: lists.movies.iter().collect(),
            cast: &lists.cast,
            directors: &lists.directors,
        };
        let full = Population {
            movies: lists
                .movies
                .iter()
                .filter(|movie| movie.is_feature_length(self.config.feature_length_minutes))
                .collect(),
            cast: &lists.full_cast,
            directors: &lists.full_directors,
        };

        let all_stats = self.year_stats(&all, &partitions, diary_entries, year);
        let full_stats = self.year_stats(&full, &partitions, diary_entries, year);

        info!(
            "Computed stats for {} {}: {} movies, {} feature length",
            info.username,
            year,
            all.movies.len(),
            full.movies.len()
        );

        Ok(SnapshotPair {
            all: StatsSnapshot {
                info: info.clone(),
                stats: all_stats,
            },
            full: StatsSnapshot { info, stats: full_stats },
        })
    }

    fn year_stats(
        &self,
        population: &Population<'_>,
        partitions: &CalendarPartitions,
        diary_entries: usize,
        year: i32,
    ) -> YearStats {
        let config = &self.config;
        let movies = &population.movies;

        let members: HashSet<SequenceNumber> = movies.iter().map(|movie| movie.sequence_number).collect();
        let feature_members: HashSet<SequenceNumber> = movies
            .iter()
            .filter(|movie| movie.is_feature_length(config.feature_length_minutes))
            .map(|movie| movie.sequence_number)
            .collect();

        // Partitions are built once; each population filters them.
        let own = partitions.filtered(|sequence| members.contains(&sequence));
        let feature = partitions.filtered(|sequence| feature_members.contains(&sequence));

        YearStats {
            counts: counts::count_stats(movies, config.feature_length_minutes, diary_entries),
            engagement: counts::engagement_stats(movies),
            ratings: counts::rating_stats(movies),
            runtime: counts::runtime_stats(movies),
            milestones: rankings::milestones(movies, config.milestone_interval),
            top_rated: rankings::top_rated(movies),
            top_actors: rankings::top_people(population.cast, config.top_people),
            top_directors: rankings::top_people(population.directors, config.top_people),
            multiwatches: rankings::multiwatches(movies),
            calendar: own.stats(),
            categories: categories::category_stats(movies, config.category_min_rated),
            releases: categories::release_stats(movies, year),
            popularity: rankings::popularity(movies),
            peaks: calendar::peaks(&own, &feature),
            streaks: streaks::streak_stats(&own),
        }
    }
}

/// Round half away from zero to `places` decimals
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `round(part / total, 2)`, or 0.0 when `total` is zero
pub(crate) fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to(part as f64 / total as f64, 2)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{list, record};
    use super::*;
    use film_diary_models::Month;

    fn info() -> SnapshotInfo {
        SnapshotInfo::new("ana", 2025, UserProfile::fallback("ana"))
    }

    fn lists(records: Vec<MovieRecord>) -> MasterLists {
        let mut lists = MasterLists {
            movies: list(records),
            ..MasterLists::default()
        };
        lists.cast.record_credit("pat", "Pat", "a", None);
        lists.full_cast.record_credit("pat", "Pat", "a", None);
        lists
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(1.25, 1), 1.3);
        assert_eq!(round_to(7.0 / 12.0, 1), 0.6);
        assert_eq!(ratio(1, 3), 0.33);
        assert_eq!(ratio(5, 0), 0.0);
    }

    #[test]
    fn test_empty_movie_list_is_insufficient_data() {
        let engine = StatsEngine::new(AnalysisConfig::default());
        let result = engine.compute(&DiaryYear::new(), &MasterLists::default(), 2025, info());
        assert_eq!(result.unwrap_err(), StatsError::InsufficientData { year: 2025 });
    }

    #[test]
    fn test_full_population_is_subset() {
        let mut short = record("short", 2, 1);
        short.runtime_minutes = Some(20);
        let mut unknown = record("unknown", 2, 2);
        unknown.runtime_minutes = None;
        let lists = lists(vec![record("a", 1, 1), short, unknown, record("b", 3, 1)]);

        let engine = StatsEngine::new(AnalysisConfig::default());
        let pair = engine.compute(&DiaryYear::new(), &lists, 2025, info()).unwrap();

        assert_eq!(pair.all.stats.counts.yearly, 4);
        assert_eq!(pair.all.stats.counts.full_yearly, 2);
        assert_eq!(pair.full.stats.counts.yearly, 2);

        let full_days: Vec<SequenceNumber> =
            pair.full.stats.calendar.per_day.values().flatten().copied().collect();
        assert_eq!(full_days, vec![1, 4]);
        assert_eq!(pair.full.stats.peaks.most_movies_daily.len(), 2);
    }

    #[test]
    fn test_monthly_counts_sum_to_total() {
        let lists = lists(vec![record("a", 1, 1), record("b", 1, 9), record("c", 6, 1), record("d", 12, 31)]);
        let engine = StatsEngine::new(AnalysisConfig::default());
        let pair = engine.compute(&DiaryYear::new(), &lists, 2025, info()).unwrap();

        let counts = &pair.all.stats.counts;
        assert_eq!(counts.monthly.values().sum::<u32>(), counts.yearly);
        assert_eq!(counts.monthly[Month::January.name()], 2);
        assert_eq!(counts.average_monthly, round_to(4.0 / 12.0, 1));
        assert_eq!(counts.average_weekly, round_to(4.0 / 52.0, 1));
    }

    #[test]
    fn test_snapshot_serializes_with_info_header() {
        let lists = lists(vec![record("a", 1, 1)]);
        let engine = StatsEngine::new(AnalysisConfig::default());
        let pair = engine.compute(&DiaryYear::new(), &lists, 2025, info()).unwrap();

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["all"]["info"]["username"], "ana");
        assert_eq!(json["full"]["info"]["year"], 2025);
        assert_eq!(json["all"]["stats"]["top_actors"]["Pat"], 1);

        let restored: SnapshotPair = serde_json::from_value(json).unwrap();
        assert_eq!(restored, pair);
    }
}
