use super::calendar::{day_key, week_key, CalendarPartitions};
use film_diary_models::SequenceNumber;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// "streak N" → bucket labels ("day 3", "week 12", …)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakStats {
    pub consecutive_days: IndexMap<String, Vec<String>>,
    pub longest_daily_streak: IndexMap<String, Vec<String>>,
    pub consecutive_weeks: IndexMap<String, Vec<String>>,
    pub longest_weekly_streak: IndexMap<String, Vec<String>>,
}

/// Maximal runs of consecutive non-empty buckets longer than one, in index order
fn find_runs(buckets: &[Vec<SequenceNumber>]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut index = 0;
    while index < buckets.len() {
        if buckets[index].is_empty() {
            index += 1;
            continue;
        }
        let start = index;
        while index < buckets.len() && !buckets[index].is_empty() {
            index += 1;
        }
        if index - start > 1 {
            runs.push(start..index);
        }
    }
    runs
}

fn label_runs<K>(runs: Vec<Range<usize>>, key: K) -> IndexMap<String, Vec<String>>
where
    K: Fn(usize) -> String,
{
    runs.into_iter()
        .enumerate()
        .map(|(number, run)| (format!("streak {}", number + 1), run.map(&key).collect()))
        .collect()
}

/// All streaks sharing the maximum length
fn longest(streaks: &IndexMap<String, Vec<String>>) -> IndexMap<String, Vec<String>> {
    let Some(max) = streaks.values().map(Vec::len).max() else {
        return IndexMap::new();
    };
    streaks
        .iter()
        .filter(|(_, buckets)| buckets.len() == max)
        .map(|(name, buckets)| (name.clone(), buckets.clone()))
        .collect()
}

pub(crate) fn streak_stats(partitions: &CalendarPartitions) -> StreakStats {
    let consecutive_days = label_runs(find_runs(partitions.day_buckets()), day_key);
    let consecutive_weeks = label_runs(find_runs(partitions.week_buckets()), week_key);
    StreakStats {
        longest_daily_streak: longest(&consecutive_days),
        longest_weekly_streak: longest(&consecutive_weeks),
        consecutive_days,
        consecutive_weeks,
    }
}
