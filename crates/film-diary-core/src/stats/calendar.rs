use chrono::{Datelike, Days, NaiveDate};
use film_diary_models::{MovieList, SequenceNumber};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// One broadcast week: week 1 runs from Jan 1 to the first Saturday, every
/// later week runs Sunday to Saturday, and the last one stops at Dec 31.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub number: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub movies: Vec<SequenceNumber>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarStats {
    /// "week N" → bucket
    pub per_week: IndexMap<String, WeekBucket>,
    /// "day N" (day of year) → sequence numbers
    pub per_day: IndexMap<String, Vec<SequenceNumber>>,
    /// Monday … Sunday → sequence numbers
    pub per_weekday: IndexMap<String, Vec<SequenceNumber>>,
}

/// Busiest buckets; ties are all reported, and an idle year reports nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakStats {
    pub most_movies_daily: IndexMap<String, Vec<SequenceNumber>>,
    pub most_full_movies_daily: IndexMap<String, Vec<SequenceNumber>>,
    pub most_movies_weekly: IndexMap<String, Vec<SequenceNumber>>,
    pub most_full_movies_weekly: IndexMap<String, Vec<SequenceNumber>>,
}

pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

pub fn broadcast_weeks(year: i32) -> Option<Vec<Week>> {
    let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
    let mut start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let mut weeks = Vec::with_capacity(54);

    loop {
        let to_saturday = 6 - start.weekday().num_days_from_sunday();
        let end = start.checked_add_days(Days::new(u64::from(to_saturday)))?.min(last);
        weeks.push(Week {
            number: weeks.len() as u32 + 1,
            start,
            end,
            label: week_label(start, end),
        });
        if end >= last {
            break;
        }
        start = end.succ_opt()?;
    }

    Some(weeks)
}

/// "Jan 1–4", "Jan 26–Feb 1", or "Jan 1" for a one-day week
fn week_label(start: NaiveDate, end: NaiveDate) -> String {
    if start == end {
        format!("{} {}", start.format("%b"), start.day())
    } else if start.month() == end.month() {
        format!("{} {}–{}", start.format("%b"), start.day(), end.day())
    } else {
        format!("{} {}–{} {}", start.format("%b"), start.day(), end.format("%b"), end.day())
    }
}

pub(crate) fn day_key(index: usize) -> String {
    format!("day {}", index + 1)
}

pub(crate) fn week_key(index: usize) -> String {
    format!("week {}", index + 1)
}

/// Day, week and weekday buckets of sequence numbers for one analysis year.
///
/// Built once from every movie; populations narrow it with [`filtered`](Self::filtered).
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarPartitions {
    weeks: Vec<Week>,
    week_movies: Vec<Vec<SequenceNumber>>,
    day_movies: Vec<Vec<SequenceNumber>>,
    weekday_movies: Vec<Vec<SequenceNumber>>,
}

impl CalendarPartitions {
    /// `None` only when `year` is outside chrono's range.
    /// Movies watched in another year are left out with a warning.
    pub fn build(year: i32, movies: &MovieList) -> Option<Self> {
        let weeks = broadcast_weeks(year)?;
        let first_offset = weeks.first()?.start.weekday().num_days_from_sunday() as usize;

        let mut partitions = Self {
            week_movies: vec![Vec::new(); weeks.len()],
            day_movies: vec![Vec::new(); days_in_year(year) as usize],
            weekday_movies: vec![Vec::new(); WEEKDAYS.len()],
            weeks,
        };

        for movie in movies {
            let sequence = movie.sequence_number;
            let Some(date) = movie.date.to_naive_date() else {
                warn!("Movie {} ({}) has an invalid watch date; left out of calendar buckets", sequence, movie.slug);
                continue;
            };
            if date.year() != year {
                warn!("Movie {} ({}) was watched on {}, outside {}; left out of calendar buckets", sequence, movie.slug, date, year);
                continue;
            }

            let day = date.ordinal0() as usize;
            if let Some(bucket) = partitions.day_movies.get_mut(day) {
                bucket.push(sequence);
            }
            if let Some(bucket) = partitions.week_movies.get_mut((day + first_offset) / 7) {
                bucket.push(sequence);
            }
            if let Some(bucket) = partitions.weekday_movies.get_mut(date.weekday().num_days_from_monday() as usize) {
                bucket.push(sequence);
            }
        }

        Some(partitions)
    }

    /// Same buckets, keeping only the sequence numbers `keep` accepts
    pub fn filtered<F>(&self, keep: F) -> Self
    where
        F: Fn(SequenceNumber) -> bool,
    {
        let narrow = |buckets: &[Vec<SequenceNumber>]| -> Vec<Vec<SequenceNumber>> {
            buckets
                .iter()
                .map(|bucket| bucket.iter().copied().filter(|sequence| keep(*sequence)).collect())
                .collect()
        };
        Self {
            weeks: self.weeks.clone(),
            week_movies: narrow(&self.week_movies),
            day_movies: narrow(&self.day_movies),
            weekday_movies: narrow(&self.weekday_movies),
        }
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub(crate) fn day_buckets(&self) -> &[Vec<SequenceNumber>] {
        &self.day_movies
    }

    pub(crate) fn week_buckets(&self) -> &[Vec<SequenceNumber>] {
        &self.week_movies
    }

    pub fn stats(&self) -> CalendarStats {
        CalendarStats {
            per_week: self
                .weeks
                .iter()
                .zip(&self.week_movies)
                .enumerate()
                .map(|(index, (week, movies))| {
                    (
                        week_key(index),
                        WeekBucket {
                            label: week.label.clone(),
                            start: week.start,
                            end: week.end,
                            movies: movies.clone(),
                        },
                    )
                })
                .collect(),
            per_day: self
                .day_movies
                .iter()
                .enumerate()
                .map(|(index, movies)| (day_key(index), movies.clone()))
                .collect(),
            per_weekday: WEEKDAYS
                .iter()
                .zip(&self.weekday_movies)
                .map(|(name, movies)| (name.to_string(), movies.clone()))
                .collect(),
        }
    }
}

/// Every bucket whose `counted` size is the maximum, reported with its
/// `stored` movies. Both slices index the same buckets.
fn busiest<K>(
    counted: &[Vec<SequenceNumber>],
    stored: &[Vec<SequenceNumber>],
    key: K,
) -> IndexMap<String, Vec<SequenceNumber>>
where
    K: Fn(usize) -> String,
{
    let most = counted.iter().map(Vec::len).max().unwrap_or(0);
    if most == 0 {
        return IndexMap::new();
    }
    counted
        .iter()
        .zip(stored)
        .enumerate()
        .filter(|(_, (bucket, _))| bucket.len() == most)
        .map(|(index, (_, movies))| (key(index), movies.clone()))
        .collect()
}

/// `own` is the population's partition, `feature` its feature-length narrowing.
/// The feature-length peaks are ranked by feature-length count but list every
/// movie of the winning bucket.
pub(crate) fn peaks(own: &CalendarPartitions, feature: &CalendarPartitions) -> PeakStats {
    PeakStats {
        most_movies_daily: busiest(own.day_buckets(), own.day_buckets(), day_key),
        most_full_movies_daily: busiest(feature.day_buckets(), own.day_buckets(), day_key),
        most_movies_weekly: busiest(own.week_buckets(), own.week_buckets(), week_key),
        most_full_movies_weekly: busiest(feature.week_buckets(), own.week_buckets(), week_key),
    }
}
