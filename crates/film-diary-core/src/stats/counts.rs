use super::round_to;
use film_diary_models::{Month, MovieRecord};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountStats {
    pub monthly: IndexMap<String, u32>,
    pub full_monthly: IndexMap<String, u32>,
    pub yearly: u32,
    pub full_yearly: u32,
    pub average_monthly: f64,
    pub full_average_monthly: f64,
    pub average_weekly: f64,
    pub full_average_weekly: f64,
    /// Diary entries before enrichment; larger than `yearly` when fetches failed
    pub diary_entries: u32,
}

/// Monthly and yearly tally of one boolean action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagStats {
    pub monthly: IndexMap<String, u32>,
    pub yearly: u32,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementStats {
    pub rewatched: FlagStats,
    pub reviewed: FlagStats,
    pub liked: FlagStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    /// Half-star bucket ("0.5" … "5.0") → count
    pub yearly_counts: IndexMap<String, u32>,
    pub monthly_counts: IndexMap<String, IndexMap<String, u32>>,
    pub monthly_average: IndexMap<String, f64>,
    pub yearly_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeStats {
    pub monthly_minutes: IndexMap<String, u64>,
    pub yearly_minutes: u64,
    /// Total minutes / movie count. A movie with unknown runtime adds no minutes but is counted.
    pub monthly_average_length: IndexMap<String, f64>,
    pub yearly_average_length: f64,
}

/// A fresh zeroed value for each of the twelve months
fn month_map<T: Default>() -> IndexMap<String, T> {
    Month::ALL.iter().map(|month| (month.name().to_string(), T::default())).collect()
}

fn month_name(movie: &MovieRecord) -> Option<&'static str> {
    movie.date.month().map(Month::name)
}

fn tally<F>(movies: &[&MovieRecord], keep: F) -> IndexMap<String, u32>
where
    F: Fn(&MovieRecord) -> bool,
{
    let mut monthly = month_map::<u32>();
    for movie in movies.iter().copied().filter(|movie| keep(*movie)) {
        if let Some(count) = month_name(movie).and_then(|name| monthly.get_mut(name)) {
            *count += 1;
        }
    }
    monthly
}

pub(crate) fn count_stats(movies: &[&MovieRecord], feature_length_minutes: u32, diary_entries: usize) -> CountStats {
    let monthly = tally(movies, |_| true);
    let full_monthly = tally(movies, |movie| movie.is_feature_length(feature_length_minutes));
    let yearly: u32 = monthly.values().sum();
    let full_yearly: u32 = full_monthly.values().sum();

    CountStats {
        monthly,
        full_monthly,
        yearly,
        full_yearly,
        average_monthly: round_to(f64::from(yearly) / 12.0, 1),
        full_average_monthly: round_to(f64::from(full_yearly) / 12.0, 1),
        average_weekly: round_to(f64::from(yearly) / 52.0, 1),
        full_average_weekly: round_to(f64::from(full_yearly) / 52.0, 1),
        diary_entries: diary_entries as u32,
    }
}

fn flag_stats<F>(movies: &[&MovieRecord], flag: F) -> FlagStats
where
    F: Fn(&MovieRecord) -> bool,
{
    let monthly = tally(movies, flag);
    let yearly: u32 = monthly.values().sum();
    FlagStats {
        percent: super::ratio(yearly as usize, movies.len()),
        monthly,
        yearly,
    }
}

pub(crate) fn engagement_stats(movies: &[&MovieRecord]) -> EngagementStats {
    EngagementStats {
        rewatched: flag_stats(movies, |movie| movie.rewatched),
        reviewed: flag_stats(movies, |movie| movie.reviewed),
        liked: flag_stats(movies, |movie| movie.liked),
    }
}

/// "0.5", "1.0", … "5.0"
fn rating_key(half_stars: u32) -> String {
    format!("{:.1}", f64::from(half_stars) / 2.0)
}

fn rating_buckets() -> IndexMap<String, u32> {
    (1..=10).map(|half_stars| (rating_key(half_stars), 0)).collect()
}

/// Bucket of a half-star rating, or `None` for anything off the 0.5 grid
fn bucket_of(rating: f64) -> Option<String> {
    let half_stars = (rating * 2.0).round();
    if (1.0..=10.0).contains(&half_stars) && (rating * 2.0 - half_stars).abs() < 1e-9 {
        Some(rating_key(half_stars as u32))
    } else {
        None
    }
}

/// `round(Σ(rating × count) / Σ count, 1)`, 0.0 with no votes
fn average_from_counts(counts: &IndexMap<String, u32>) -> f64 {
    let votes: u32 = counts.values().sum();
    if votes == 0 {
        return 0.0;
    }
    let score: f64 = counts
        .iter()
        .filter_map(|(key, count)| key.parse::<f64>().ok().map(|rating| rating * f64::from(*count)))
        .sum();
    round_to(score / f64::from(votes), 1)
}

pub(crate) fn rating_stats(movies: &[&MovieRecord]) -> RatingStats {
    let mut monthly_counts: IndexMap<String, IndexMap<String, u32>> =
        Month::ALL.iter().map(|month| (month.name().to_string(), rating_buckets())).collect();

    for movie in movies {
        let (Some(name), Some(rating)) = (month_name(movie), movie.rating) else {
            continue;
        };
        let Some(key) = bucket_of(rating) else {
            continue;
        };
        if let Some(count) = monthly_counts.get_mut(name).and_then(|buckets| buckets.get_mut(&key)) {
            *count += 1;
        }
    }

    let mut yearly_counts = rating_buckets();
    for buckets in monthly_counts.values() {
        for (key, count) in buckets {
            if let Some(total) = yearly_counts.get_mut(key) {
                *total += count;
            }
        }
    }

    RatingStats {
        monthly_average: monthly_counts
            .iter()
            .map(|(month, buckets)| (month.clone(), average_from_counts(buckets)))
            .collect(),
        yearly_average: average_from_counts(&yearly_counts),
        yearly_counts,
        monthly_counts,
    }
}

pub(crate) fn runtime_stats(movies: &[&MovieRecord]) -> RuntimeStats {
    let mut monthly_minutes = month_map::<u64>();
    let monthly_movies = tally(movies, |_| true);

    for movie in movies {
        let (Some(name), Some(runtime)) = (month_name(movie), movie.runtime_minutes) else {
            continue;
        };
        if let Some(minutes) = monthly_minutes.get_mut(name) {
            *minutes += u64::from(runtime);
        }
    }

    let average = |minutes: u64, count: u32| {
        if count == 0 {
            0.0
        } else {
            round_to(minutes as f64 / f64::from(count), 1)
        }
    };

    let yearly_minutes: u64 = monthly_minutes.values().sum();
    let yearly_movies: u32 = monthly_movies.values().sum();

    RuntimeStats {
        monthly_average_length: monthly_minutes
            .iter()
            .zip(monthly_movies.values())
            .map(|((month, minutes), count)| (month.clone(), average(*minutes, *count)))
            .collect(),
        yearly_average_length: average(yearly_minutes, yearly_movies),
        monthly_minutes,
        yearly_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::record;

    #[test]
    fn test_zero_months_are_present() {
        let movie = record("a", 3, 1);
        let stats = count_stats(&[&movie], 75, 1);
        assert_eq!(stats.monthly.len(), 12);
        assert_eq!(stats.monthly["March"], 1);
        assert_eq!(stats.monthly["April"], 0);
        assert_eq!(stats.diary_entries, 1);
    }

    #[test]
    fn test_flag_percentages() {
        let mut a = record("a", 1, 1);
        a.rewatched = true;
        a.liked = true;
        let mut b = record("b", 2, 1);
        b.liked = true;
        let c = record("c", 2, 2);

        let stats = engagement_stats(&[&a, &b, &c]);
        assert_eq!(stats.rewatched.yearly, 1);
        assert_eq!(stats.rewatched.percent, 0.33);
        assert_eq!(stats.liked.monthly["February"], 1);
        assert_eq!(stats.liked.percent, 0.67);
        assert_eq!(stats.reviewed.percent, 0.0);

        let empty = engagement_stats(&[]);
        assert_eq!(empty.liked.percent, 0.0);
    }

    #[test]
    fn test_rating_histogram_and_average() {
        let mut a = record("a", 1, 1);
        a.rating = Some(4.5);
        let mut b = record("b", 1, 2);
        b.rating = Some(3.0);
        let mut c = record("c", 5, 2);
        c.rating = Some(3.0);
        let d = record("d", 5, 3);

        let stats = rating_stats(&[&a, &b, &c, &d]);
        assert_eq!(stats.yearly_counts.len(), 10);
        assert_eq!(stats.yearly_counts["3.0"], 2);
        assert_eq!(stats.yearly_counts["4.5"], 1);
        assert_eq!(stats.monthly_counts["January"]["4.5"], 1);
        assert_eq!(stats.monthly_average["January"], 3.8);
        assert_eq!(stats.monthly_average["May"], 3.0);
        assert_eq!(stats.monthly_average["June"], 0.0);
        assert_eq!(stats.yearly_average, 3.5);
    }

    #[test]
    fn test_unrated_year_averages_zero() {
        let a = record("a", 1, 1);
        assert_eq!(rating_stats(&[&a]).yearly_average, 0.0);
    }

    #[test]
    fn test_runtime_average_counts_every_movie() {
        let mut a = record("a", 1, 1);
        a.runtime_minutes = Some(90);
        let mut b = record("b", 1, 2);
        b.runtime_minutes = None;
        let mut c = record("c", 2, 2);
        c.runtime_minutes = Some(121);

        let stats = runtime_stats(&[&a, &b, &c]);
        assert_eq!(stats.monthly_minutes["January"], 90);
        // Unknown runtime adds no minutes but still counts as a movie
        assert_eq!(stats.monthly_average_length["January"], 45.0);
        assert_eq!(stats.monthly_average_length["February"], 121.0);
        assert_eq!(stats.yearly_minutes, 211);
        assert_eq!(stats.yearly_average_length, 70.3);
        assert_eq!(stats.monthly_average_length["March"], 0.0);
    }
}
